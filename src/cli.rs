use crate::report::{PhotoQuality, ReportFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soil-audit")]
#[command(about = "水土保持現場查核表・報告書生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 提出JSONから報告書を生成し、ログへ追記
    Submit {
        /// 提出JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (html/pdf/both)
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,

        /// 出力フォルダ（デフォルト: 設定の output_dir）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 写真画質 (high/medium/low)（デフォルト: 設定の photo_quality）
        #[arg(short, long)]
        quality: Option<PhotoQuality>,

        /// フォントをダウンロードしない
        #[arg(long)]
        offline: bool,

        /// ログへ追記しない
        #[arg(long)]
        no_log: bool,
    },

    /// 空の提出JSONを出力
    Template {
        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 査核項目の一覧を表示
    Checklist,

    /// 査核ログの確認・エクスポート
    Log {
        /// ログ情報を表示
        #[arg(long)]
        info: bool,

        /// Excelへ書き出す
        #[arg(long)]
        export_xlsx: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// フォント取得URLを設定
        #[arg(long)]
        set_font_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
    Both,
}

impl OutputFormat {
    /// 生成する形式（PDFを先に）
    pub fn formats(&self) -> Vec<ReportFormat> {
        match self {
            OutputFormat::Html => vec![ReportFormat::Html],
            OutputFormat::Pdf => vec![ReportFormat::Pdf],
            OutputFormat::Both => vec![ReportFormat::Pdf, ReportFormat::Html],
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "both" => Ok(OutputFormat::Both),
            _ => Err(format!("Unknown format: {}. Use html, pdf, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "soil-audit", "submit", "in.json", "--format", "both", "--quality", "low", "--offline",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit { input, format, quality, offline, no_log, output } => {
                assert_eq!(input, PathBuf::from("in.json"));
                assert_eq!(format, OutputFormat::Both);
                assert_eq!(quality, Some(PhotoQuality::Low));
                assert!(offline);
                assert!(!no_log);
                assert!(output.is_none());
            }
            _ => panic!("submit として解析されていない"),
        }
    }

    #[test]
    fn test_output_format() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert!("docx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Both.formats(), vec![ReportFormat::Pdf, ReportFormat::Html]);
    }
}
