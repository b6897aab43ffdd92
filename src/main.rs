use anyhow::Context;
use chrono::Local;
use clap::Parser;
use soil_audit::audit_log::AuditLog;
use soil_audit::cli::{Cli, Commands, OutputFormat};
use soil_audit::config::Config;
use soil_audit::error::SoilAuditError;
use soil_audit::font::FontStore;
use soil_audit::input;
use soil_audit::report::{GeneratedReport, ReportEngine, ReportFormat};
use soil_audit_common::{InspectionRecord, CHECKLIST};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Submit { input, format, output, quality, offline, no_log } => {
            println!("📋 soil-audit - 查核報告書生成\n");

            // 1. 読み込み・入力チェック
            println!("[1/3] 提出データを読み込み中...");
            let record = input::load_submission(&input)?;
            validate(&record)?;
            println!(
                "✔ {} / {} / 写真{}枚\n",
                record.metadata.project_name,
                record.metadata.inspector,
                record.photos.len()
            );

            // 2. ログ追記
            if no_log {
                println!("[2/3] ログ追記をスキップ\n");
            } else {
                println!("[2/3] ログへ追記中...");
                let log = AuditLog::new(&config.log_path);
                log.append(&record).map_err(SoilAuditError::from)?;
                println!("✔ {} に追記しました\n", log.path().display());
            }

            // 3. 報告書生成
            println!("[3/3] 報告書を生成中...");
            let quality = match quality {
                Some(q) => q,
                None => config.photo_quality()?,
            };
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let engine = ReportEngine::new(FontStore::new(config.font_source(offline)?), quality);
            generate_reports(&engine, &record, format, &output_dir)?;

            println!("\n✅ 提出完了");
        }

        Commands::Template { output } => {
            let template = input::template(Local::now().date_naive());
            let json = serde_json::to_string_pretty(&template)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("書き込みに失敗しました: {}", path.display()))?;
                    println!("✔ テンプレートを保存: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Checklist => {
            for (si, section) in CHECKLIST.iter().enumerate() {
                println!("{}", section.title);
                for (ii, item) in section.items.iter().enumerate() {
                    let tag = if soil_audit_common::checklist::is_critical(item.label) { " ⚠" } else { "" };
                    println!("  [{}-{}] {}{}", si + 1, ii + 1, item.label, tag);
                    println!("        {}", item.standard);
                }
            }
        }

        Commands::Log { info, export_xlsx } => {
            let log = AuditLog::new(&config.log_path);

            if info || export_xlsx.is_none() {
                if log.path().exists() {
                    println!("ログ情報:");
                    println!("  パス: {}", log.path().display());
                    println!("  件数: {}", log.row_count().map_err(SoilAuditError::from)?);
                    println!("  列数: {}", AuditLog::header().len());
                } else {
                    println!("ログファイルが存在しません: {}", log.path().display());
                }
            }

            if let Some(path) = export_xlsx {
                let rows = log.export_xlsx(&path).map_err(SoilAuditError::from)?;
                println!("✔ {}件をExcelへ書き出しました: {}", rows, path.display());
            }
        }

        Commands::Config { set_font_url, show } => {
            let mut config = config;

            if let Some(url) = set_font_url {
                config.set_font_url(url)?;
                println!("✔ フォント取得URLを設定しました");
            }

            if show {
                let store = FontStore::new(config.font_source(true)?);
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  フォントURL: {}", config.font_url);
                println!("  フォントキャッシュ: {}", store.source().cache_path.display());
                println!("  ログ: {}", config.log_path.display());
                println!("  出力フォルダ: {}", config.output_dir.display());
                println!("  写真画質: {}", config.photo_quality);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate(record: &InspectionRecord) -> Result<(), SoilAuditError> {
    record.validate().map_err(|e| match e {
        soil_audit_common::Error::Validation(msg) => SoilAuditError::Validation(msg),
        other => SoilAuditError::Checklist(other),
    })
}

/// 指定形式で生成して書き出す。PDFが失敗した場合はHTMLで代替する
fn generate_reports(
    engine: &ReportEngine,
    record: &InspectionRecord,
    format: OutputFormat,
    output_dir: &Path,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("出力フォルダを作成できません: {}", output_dir.display()))?;

    let formats = format.formats();
    for target in &formats {
        match engine.generate_record(record, *target) {
            Ok(report) => {
                let path = write_report(&report, record, output_dir)?;
                println!("✔ {}: {}", report.format, path.display());
                print_diagnostics(&report);
            }
            Err(e) if *target == ReportFormat::Pdf => {
                println!("⚠ PDF生成に失敗しました: {}", e);
                if !formats.contains(&ReportFormat::Html) {
                    println!("  HTMLで出力します");
                    let report = engine.generate_record(record, ReportFormat::Html)?;
                    let path = write_report(&report, record, output_dir)?;
                    println!("✔ {}: {}", report.format, path.display());
                    print_diagnostics(&report);
                }
            }
            Err(e) => return Err(SoilAuditError::from(e).into()),
        }
    }
    Ok(())
}

fn write_report(
    report: &GeneratedReport,
    record: &InspectionRecord,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let path = output_dir.join(report.file_name(&record.metadata));
    std::fs::write(&path, &report.bytes)
        .with_context(|| format!("書き込みに失敗しました: {}", path.display()))?;
    Ok(path)
}

fn print_diagnostics(report: &GeneratedReport) {
    for skipped in &report.skipped_photos {
        println!("  ⚠ 照片 {} を除外: {}", skipped.index + 1, skipped.reason);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
}
