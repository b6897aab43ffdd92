//! 水土保持現場查核表
//!
//! 提出データ（基本資料・査核結果・写真）からHTML/PDF報告書を生成し、
//! 追記専用のCSVログへ記録する。

pub mod audit_log;
pub mod cli;
pub mod config;
pub mod error;
pub mod font;
pub mod input;
pub mod report;
