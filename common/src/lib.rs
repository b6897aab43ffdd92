//! Soil Audit Common Library
//!
//! レポートエンジンとCLIで共有される型・査核表・レイアウト定数

pub mod types;
pub mod checklist;
pub mod layout;
pub mod error;

pub use types::{
    CheckResult, ChecklistItem, InspectionMetadata, InspectionRecord, ItemId, PhotoRecord,
    Section, SiteStatus, Weather,
};
pub use checklist::{blank_sections, sections_with_results, CHECKLIST};
pub use error::{Error, Result};
