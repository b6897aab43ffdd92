//! 査核紀錄ログ（追記専用CSV）
//!
//! 1提出 = 1行。列は 基本資料5列 + 査核項目ごとの結果列。
//! 初回書き込み時のみ BOM付きUTF-8 でヘッダ行を出力し、以降は行だけを追記する。

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use soil_audit_common::checklist::item_labels;
use soil_audit_common::InspectionRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 既定のログファイル名
pub const DEFAULT_LOG_FILE: &str = "inspection_log.csv";

/// 基本資料の列名
pub const METADATA_COLUMNS: [&str; 5] = ["專案名稱", "日期", "人員", "天氣", "狀態"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const SHEET_NAME: &str = "查核紀錄";

#[derive(Error, Debug)]
pub enum AuditLogError {
    #[error("ログファイルIOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("ログの列構成が一致しません（既存: {found} 列 / 今回: {expected} 列）")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Excel出力エラー: {0}")]
    Xlsx(#[from] XlsxError),
}

pub type Result<T> = std::result::Result<T, AuditLogError>;

/// 追記専用ログ
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 現行の査核表に対応するヘッダ
    pub fn header() -> Vec<String> {
        METADATA_COLUMNS
            .iter()
            .copied()
            .chain(item_labels())
            .map(str::to_string)
            .collect()
    }

    /// 1件追記
    ///
    /// 既存ファイルのヘッダが今回の列構成と異なる場合は何も書かずに `SchemaMismatch`。
    pub fn append(&self, record: &InspectionRecord) -> Result<()> {
        let header = record_header(record);
        let row = record_row(record);

        let existing = self.read_header()?;
        let is_new = existing.is_none();
        // BOMだけのファイルにはBOMを重ねない
        let write_bom = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        if let Some(found) = existing {
            if found != header {
                return Err(AuditLogError::SchemaMismatch {
                    expected: header.len(),
                    found: found.len(),
                });
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if write_bom {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(&header)?;
        }
        writer.write_record(&row)?;
        writer.flush()?;

        info!(path = %self.path.display(), new_file = is_new, "inspection logged");
        Ok(())
    }

    /// ヘッダを含む全行（BOMは除去）
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path)?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body);
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        debug!(path = %self.path.display(), rows = rows.len(), "log read");
        Ok(rows)
    }

    /// データ行数（ヘッダを除く）
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.read_rows()?.len().saturating_sub(1))
    }

    /// ログ全体をExcelブックへ書き出す
    pub fn export_xlsx(&self, output: &Path) -> Result<usize> {
        let rows = self.read_rows()?;

        let mut workbook = Workbook::new();
        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xE9ECEF))
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(0xCCCCCC));

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if r == 0 {
                    worksheet.write_string_with_format(r as u32, c as u16, value, &header_format)?;
                } else {
                    worksheet.write_string(r as u32, c as u16, value)?;
                }
            }
        }
        if !rows.is_empty() {
            worksheet.set_freeze_panes(1, 0)?;
        }

        workbook.save(output)?;
        info!(path = %output.display(), rows = rows.len(), "log exported");
        Ok(rows.len().saturating_sub(1))
    }

    /// 先頭行だけを読む
    fn read_header(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut reader = BufReader::new(File::open(&self.path)?);
        if reader.fill_buf()?.starts_with(UTF8_BOM) {
            reader.consume(UTF8_BOM.len());
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut record = csv::StringRecord::new();
        if !csv_reader.read_record(&mut record)? {
            return Ok(None);
        }
        Ok(Some(record.iter().map(str::to_string).collect()))
    }
}

fn record_header(record: &InspectionRecord) -> Vec<String> {
    METADATA_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(record.flatten_results().into_iter().map(|(label, _)| label.to_string()))
        .collect()
}

fn record_row(record: &InspectionRecord) -> Vec<String> {
    let meta = &record.metadata;
    [
        meta.project_name.clone(),
        meta.date_string(),
        meta.inspector.clone(),
        meta.weather.label().to_string(),
        meta.status.label().to_string(),
    ]
    .into_iter()
    .chain(
        record
            .flatten_results()
            .into_iter()
            .map(|(_, result)| result.label().to_string()),
    )
    .collect()
}
