//! 査核レポート生成
//!
//! 1回分の提出データ（基本資料・5区分・写真）から HTML または PDF を生成する。
//!
//! - photo: 写真の正規化（RGB化・JPEG再エンコード・表示サイズ計算）
//! - sections: 査核表の行記述子
//! - html: 単一HTML（写真はbase64埋め込み）
//! - pdf: A4ページ割りPDF

pub mod html;
pub mod pdf;
pub mod photo;
pub mod sections;

use crate::font::{FontResource, FontStore};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use soil_audit_common::{InspectionMetadata, InspectionRecord, Section};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use self::photo::{NormalizedPhoto, PhotoQuality};
pub use self::sections::{ResultStyle, RowDescriptor};

/// レポート表題
pub const REPORT_TITLE: &str = "水土保持處理與維護現場查核表";
/// 写真記録の見出し
pub const PHOTO_HEADING: &str = "現場照片紀錄";
/// 写真なしの表示
pub const NO_PHOTOS_NOTICE: &str = "本次無上傳照片";
/// 査核表の列見出し
pub const COLUMN_HEADERS: [&str; 2] = ["檢查項目與標準", "檢查結果"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("画像読み込みエラー: {0}")]
    AssetDecode(String),

    #[error("PDF生成エラー: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// 出力形式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ReportFormat::Html => "text/html",
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "pdf" | "paginated" => Ok(ReportFormat::Pdf),
            _ => Err(format!("Unknown format: {}. Use html or pdf", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 読み込めずに除外された写真
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPhoto {
    /// 入力リスト上の位置（0始まり）
    pub index: usize,
    pub reason: String,
}

/// 生成は成功したが品質が落ちている旨の通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReportWarning {
    /// 中文フォントが使えず標準フォントで出力した（文字が欠ける可能性あり）
    FallbackFont { reason: String },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::FallbackFont { reason } => {
                write!(f, "中文フォントが利用できないため標準フォントで出力しました（一部の文字が表示されない可能性があります）: {}", reason)
            }
        }
    }
}

/// 写真欄の1枚分（入力位置と説明）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoEntry {
    pub index: usize,
    pub caption: String,
}

/// レポートの論理内容
///
/// 出力形式に依存しない内容（基本資料・査核表・写真順）。
/// PDFは生成IDや日時が埋め込まれるため、同一性の比較はこちらで行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportContent {
    pub title: String,
    pub project_name: String,
    /// (見出し, 値) の4項目: 檢查日期・檢查人員・天氣狀況・施工狀態
    pub metadata_fields: Vec<(String, String)>,
    pub rows: Vec<RowDescriptor>,
    /// PDF表で2列結合する行位置（0行目は列見出し）
    pub merged_rows: Vec<usize>,
    pub photos: Vec<PhotoEntry>,
}

impl ReportContent {
    pub fn build(metadata: &InspectionMetadata, sections: &[Section], photos: Vec<PhotoEntry>) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            project_name: metadata.project_name.clone(),
            metadata_fields: vec![
                ("檢查日期".to_string(), metadata.date_string()),
                ("檢查人員".to_string(), metadata.inspector.clone()),
                ("天氣狀況".to_string(), metadata.weather.label().to_string()),
                ("施工狀態".to_string(), metadata.status.label().to_string()),
            ],
            rows: sections::render_rows(sections),
            merged_rows: sections::section_header_indices(sections),
            photos,
        }
    }

    /// 論理内容のSHA-256（16進）
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&json))
    }
}

/// 正規化済みの写真
#[derive(Debug, Clone)]
pub struct PreparedPhoto {
    pub index: usize,
    pub caption: String,
    pub photo: NormalizedPhoto,
}

/// 生成結果
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    pub content: ReportContent,
    pub skipped_photos: Vec<SkippedPhoto>,
    pub warnings: Vec<ReportWarning>,
}

impl GeneratedReport {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `report_<date>_<inspector>.<ext>`
    pub fn file_name(&self, metadata: &InspectionMetadata) -> String {
        report_file_name(metadata, self.format)
    }
}

/// 出力ファイル名（パスに使えない文字は `_` に置換）
pub fn report_file_name(metadata: &InspectionMetadata, format: ReportFormat) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\s]+"#).expect("static regex")
    });
    let inspector = unsafe_chars.replace_all(metadata.inspector.trim(), "_");
    format!("report_{}_{}.{}", metadata.date_string(), inspector, format.extension())
}

/// レポートエンジン
///
/// 呼び出しごとに独立。フォントだけはプロセス内で一度読み込んで共有する。
pub struct ReportEngine {
    fonts: FontStore,
    quality: PhotoQuality,
}

impl ReportEngine {
    pub fn new(fonts: FontStore, quality: PhotoQuality) -> Self {
        Self { fonts, quality }
    }

    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    /// 基本資料・査核区分・写真・説明から指定形式のレポートを生成
    ///
    /// 説明が写真より少ない場合、不足分は空文字として扱う。
    /// 入力内容の妥当性（検査者名など）は呼び出し側で確認済みであること。
    pub fn generate(
        &self,
        metadata: &InspectionMetadata,
        sections: &[Section],
        photos: &[Vec<u8>],
        captions: &[String],
        format: ReportFormat,
    ) -> Result<GeneratedReport> {
        let inputs = photos.iter().enumerate().map(|(i, bytes)| {
            let caption = captions.get(i).map(String::as_str).unwrap_or("");
            (bytes.as_slice(), caption)
        });
        self.generate_from(metadata, sections, inputs, format)
    }

    /// 提出データ1件からレポートを生成
    pub fn generate_record(&self, record: &InspectionRecord, format: ReportFormat) -> Result<GeneratedReport> {
        let inputs = record
            .photos
            .iter()
            .map(|p| (p.image.as_slice(), p.caption.as_str()));
        self.generate_from(&record.metadata, &record.sections, inputs, format)
    }

    fn generate_from<'a>(
        &self,
        metadata: &InspectionMetadata,
        sections: &[Section],
        photos: impl Iterator<Item = (&'a [u8], &'a str)>,
        format: ReportFormat,
    ) -> Result<GeneratedReport> {
        let (prepared, mut skipped) = self.prepare_photos(photos);
        let entries = prepared
            .iter()
            .map(|p| PhotoEntry { index: p.index, caption: p.caption.clone() })
            .collect();
        let content = ReportContent::build(metadata, sections, entries);
        let mut warnings = Vec::new();

        let bytes = match format {
            ReportFormat::Html => html::render(&content, &prepared).into_bytes(),
            ReportFormat::Pdf => {
                if let FontResource::Fallback { reason } = self.fonts.get() {
                    warnings.push(ReportWarning::FallbackFont { reason: reason.clone() });
                }
                let plan = pdf::plan(&content, &prepared);
                let rendered = pdf::render(&plan, &content.title, &prepared, self.fonts.get())?;
                if let Some(reason) = rendered.font_fallback {
                    warnings.push(ReportWarning::FallbackFont { reason });
                }
                skipped.extend(rendered.skipped_photos);
                rendered.bytes
            }
        };

        for warning in &warnings {
            warn!(%warning, "degraded report output");
        }
        info!(
            format = %format,
            bytes = bytes.len(),
            rows = content.rows.len(),
            photos = content.photos.len(),
            skipped = skipped.len(),
            "report generated"
        );

        Ok(GeneratedReport {
            format,
            bytes,
            content,
            skipped_photos: skipped,
            warnings,
        })
    }

    /// 写真を正規化。読めない写真は除外して記録する
    fn prepare_photos<'a>(
        &self,
        photos: impl Iterator<Item = (&'a [u8], &'a str)>,
    ) -> (Vec<PreparedPhoto>, Vec<SkippedPhoto>) {
        let mut prepared = Vec::new();
        let mut skipped = Vec::new();
        for (index, (bytes, caption)) in photos.enumerate() {
            match photo::normalize(bytes, self.quality) {
                Ok(photo) => {
                    debug!(index, width = photo.pixel_width, height = photo.pixel_height, "photo normalized");
                    prepared.push(PreparedPhoto {
                        index,
                        caption: caption.to_string(),
                        photo,
                    });
                }
                Err(e) => {
                    warn!(index, error = %e, "photo skipped");
                    skipped.push(SkippedPhoto { index, reason: e.to_string() });
                }
            }
        }
        (prepared, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use soil_audit_common::{SiteStatus, Weather};

    fn metadata(inspector: &str) -> InspectionMetadata {
        InspectionMetadata {
            project_name: "Test Site".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            inspector: inspector.to_string(),
            weather: Weather::Sunny,
            status: SiteStatus::Active,
        }
    }

    #[test]
    fn test_format_parse_and_mime() {
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("docx".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Html.mime(), "text/html");
        assert_eq!(ReportFormat::Pdf.mime(), "application/pdf");
    }

    #[test]
    fn test_report_file_name() {
        let meta = metadata("Alice");
        assert_eq!(report_file_name(&meta, ReportFormat::Html), "report_2024-01-01_Alice.html");
        assert_eq!(report_file_name(&meta, ReportFormat::Pdf), "report_2024-01-01_Alice.pdf");
    }

    #[test]
    fn test_report_file_name_sanitizes_inspector() {
        let meta = metadata("王 小明/../x");
        assert_eq!(report_file_name(&meta, ReportFormat::Pdf), "report_2024-01-01_王_小明_.._x.pdf");
    }

    #[test]
    fn test_content_fingerprint_changes_with_results() {
        let meta = metadata("Alice");
        let mut sections = soil_audit_common::blank_sections();
        let a = ReportContent::build(&meta, &sections, vec![]);
        let b = ReportContent::build(&meta, &sections, vec![]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        sections[0].items[0].result = soil_audit_common::CheckResult::Fail;
        let c = ReportContent::build(&meta, &sections, vec![]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_content_metadata_fields() {
        let content = ReportContent::build(&metadata("Alice"), &[], vec![]);
        assert_eq!(content.metadata_fields[0], ("檢查日期".to_string(), "2024-01-01".to_string()));
        assert_eq!(content.metadata_fields[1].1, "Alice");
        assert_eq!(content.metadata_fields[2].1, "晴");
        assert_eq!(content.metadata_fields[3].1, "施工中");
    }
}
