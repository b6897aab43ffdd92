use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilAuditError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("査核表エラー: {0}")]
    Checklist(#[from] soil_audit_common::Error),

    #[error("レポート生成エラー: {0}")]
    Report(#[from] crate::report::ReportError),

    #[error("ログ書き込みエラー: {0}")]
    AuditLog(#[from] crate::audit_log::AuditLogError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SoilAuditError>;
