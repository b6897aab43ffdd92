//! 査核データの型定義
//!
//! CLIとレポートエンジンで共有される型:
//! - InspectionMetadata: 基本情報（工程名稱・日期・人員・天氣・狀態）
//! - Section / ChecklistItem: 固定5区分の査核項目と結果
//! - PhotoRecord: 写真と説明文のペア
//! - InspectionRecord: 1回分の提出データ

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 日付の表示形式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 工程名稱の初期値
pub const DEFAULT_PROJECT_NAME: &str = "金崙地熱電廠新建工程 (多良段449地號)";

/// 天氣狀況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Unset,
    Sunny,
    Cloudy,
    Rainy,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Unset, Weather::Sunny, Weather::Cloudy, Weather::Rainy];

    pub fn label(&self) -> &'static str {
        match self {
            Weather::Unset => "請選擇",
            Weather::Sunny => "晴",
            Weather::Cloudy => "陰",
            Weather::Rainy => "雨",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 施工狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    #[default]
    Unset,
    Active,
    Halted,
}

impl SiteStatus {
    pub const ALL: [SiteStatus; 3] = [SiteStatus::Unset, SiteStatus::Active, SiteStatus::Halted];

    pub fn label(&self) -> &'static str {
        match self {
            SiteStatus::Unset => "請選擇",
            SiteStatus::Active => "施工中",
            SiteStatus::Halted => "停工中",
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 査核結果（3値）
///
/// 入力フォームの先頭選択肢が「符合」なので、既定値は `Pass`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    #[default]
    Pass,
    Fail,
    NotApplicable,
}

impl CheckResult {
    pub const ALL: [CheckResult; 3] = [CheckResult::Pass, CheckResult::Fail, CheckResult::NotApplicable];

    pub fn label(&self) -> &'static str {
        match self {
            CheckResult::Pass => "符合",
            CheckResult::Fail => "不符合",
            CheckResult::NotApplicable => "無此項",
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CheckResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pass" | "符合" => Ok(CheckResult::Pass),
            "fail" | "不符合" => Ok(CheckResult::Fail),
            "not_applicable" | "na" | "無此項" => Ok(CheckResult::NotApplicable),
            other => Err(Error::Validation(format!("unknown result: {}", other))),
        }
    }
}

/// 査核項目の安定ID（0始まり）
///
/// 表示・入力では `"<区分番号>-<項目番号>"`（1始まり）で表す。
/// 項目名をキーにすると同名項目が衝突するため、位置で識別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    pub section: usize,
    pub item: usize,
}

impl ItemId {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section + 1, self.item + 1)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (section, item) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::UnknownItem(s.to_string()))?;
        let section: usize = section.parse().map_err(|_| Error::UnknownItem(s.to_string()))?;
        let item: usize = item.parse().map_err(|_| Error::UnknownItem(s.to_string()))?;
        if section == 0 || item == 0 {
            return Err(Error::UnknownItem(s.to_string()));
        }
        Ok(Self::new(section - 1, item - 1))
    }
}

impl TryFrom<String> for ItemId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

/// 基本資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionMetadata {
    pub project_name: String,
    pub date: NaiveDate,
    pub inspector: String,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub status: SiteStatus,
}

impl InspectionMetadata {
    /// "YYYY-MM-DD" 形式の検査日
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// 査核項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ItemId,
    pub label: String,
    pub standard: String,
    /// 関鍵項目（容量・裸露・土砂・暢通 を含む）
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub result: CheckResult,
}

/// 査核区分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

/// 写真と説明文
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoRecord {
    pub image: Vec<u8>,
    pub caption: String,
}

impl PhotoRecord {
    /// 写真リストと説明リストを位置で対応付け
    ///
    /// 説明が足りない写真は空文字、余った説明は捨てる。
    pub fn pair(photos: Vec<Vec<u8>>, captions: &[String]) -> Vec<PhotoRecord> {
        photos
            .into_iter()
            .enumerate()
            .map(|(i, image)| PhotoRecord {
                image,
                caption: captions.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// 1回分の提出データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionRecord {
    pub metadata: InspectionMetadata,
    pub sections: Vec<Section>,
    pub photos: Vec<PhotoRecord>,
}

impl InspectionRecord {
    /// 提出前チェック（レポート生成前に呼び出し側で実行する）
    pub fn validate(&self) -> Result<()> {
        if self.metadata.inspector.trim().is_empty() {
            return Err(Error::Validation("請輸入檢查人員姓名".into()));
        }
        if self.metadata.project_name.trim().is_empty() {
            return Err(Error::Validation("請輸入工程名稱".into()));
        }
        Ok(())
    }

    /// ログ用に (項目名, 結果) を表示順に平坦化
    pub fn flatten_results(&self) -> Vec<(&str, CheckResult)> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .map(|item| (item.label.as_str(), item.result))
            .collect()
    }

    pub fn captions(&self) -> Vec<String> {
        self.photos.iter().map(|p| p.caption.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> InspectionMetadata {
        InspectionMetadata {
            project_name: "Test Site".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            inspector: "Alice".to_string(),
            weather: Weather::Sunny,
            status: SiteStatus::Active,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Weather::Rainy.to_string(), "雨");
        assert_eq!(SiteStatus::Halted.to_string(), "停工中");
        assert_eq!(CheckResult::Fail.to_string(), "不符合");
        assert_eq!(CheckResult::default(), CheckResult::Pass);
    }

    #[test]
    fn test_check_result_from_str() {
        assert_eq!("fail".parse::<CheckResult>().unwrap(), CheckResult::Fail);
        assert_eq!("無此項".parse::<CheckResult>().unwrap(), CheckResult::NotApplicable);
        assert!("maybe".parse::<CheckResult>().is_err());
    }

    #[test]
    fn test_item_id_display_and_parse() {
        let id = ItemId::new(1, 2);
        assert_eq!(id.to_string(), "2-3");
        assert_eq!("2-3".parse::<ItemId>().unwrap(), id);
        assert!("0-1".parse::<ItemId>().is_err());
        assert!("abc".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_item_id_serde_as_string() {
        let json = serde_json::to_string(&ItemId::new(0, 0)).expect("シリアライズ失敗");
        assert_eq!(json, "\"1-1\"");
        let id: ItemId = serde_json::from_str("\"5-3\"").expect("デシリアライズ失敗");
        assert_eq!(id, ItemId::new(4, 2));
    }

    #[test]
    fn test_metadata_deserialize() {
        let json = r#"{
            "projectName": "Test Site",
            "date": "2024-01-01",
            "inspector": "Alice",
            "weather": "sunny"
        }"#;
        let meta: InspectionMetadata = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(meta.date_string(), "2024-01-01");
        assert_eq!(meta.weather, Weather::Sunny);
        assert_eq!(meta.status, SiteStatus::Unset); // デフォルト値
    }

    #[test]
    fn test_photo_pair_pads_missing_captions() {
        let photos = vec![vec![1], vec![2], vec![3]];
        let captions = vec!["A池".to_string(), "B池".to_string()];
        let paired = PhotoRecord::pair(photos, &captions);
        assert_eq!(paired.len(), 3);
        assert_eq!(paired[0].caption, "A池");
        assert_eq!(paired[1].caption, "B池");
        assert_eq!(paired[2].caption, "");
        assert_eq!(paired[2].image, vec![3]);
    }

    #[test]
    fn test_photo_pair_ignores_surplus_captions() {
        let captions = vec!["a".to_string(), "b".to_string()];
        let paired = PhotoRecord::pair(vec![vec![0]], &captions);
        assert_eq!(paired.len(), 1);
    }

    #[test]
    fn test_validate_requires_inspector() {
        let mut record = InspectionRecord {
            metadata: sample_metadata(),
            sections: vec![],
            photos: vec![],
        };
        assert!(record.validate().is_ok());

        record.metadata.inspector = "   ".to_string();
        let err = record.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
