//! 固定査核表
//!
//! 5区分の項目名・合格標準は静的テーブルとして保持する。
//! 文言の修正はこのテーブルだけで完結し、描画ロジックには影響しない。

use crate::error::{Error, Result};
use crate::types::{CheckResult, ChecklistItem, ItemId, Section};
use std::collections::HashMap;

/// 査核項目の定義
#[derive(Debug, Clone, Copy)]
pub struct ItemTemplate {
    pub label: &'static str,
    pub standard: &'static str,
}

/// 査核区分の定義
#[derive(Debug, Clone, Copy)]
pub struct SectionTemplate {
    pub title: &'static str,
    pub items: &'static [ItemTemplate],
}

/// 関鍵項目を判定するキーワード
pub const CRITICAL_KEYWORDS: &[&str] = &["容量", "裸露", "土砂", "暢通"];

/// 査核表（表示順）
pub const CHECKLIST: &[SectionTemplate] = &[
    SectionTemplate {
        title: "一、裸露區域防護檢查",
        items: &[
            ItemTemplate { label: "1. 裸露區域是否全面覆蓋防沖蝕網", standard: "設計面積900m²，無大面積裸露" },
            ItemTemplate { label: "2. 防沖蝕網是否牢固無破損", standard: "無掀開、破損，固定良好" },
            ItemTemplate { label: "3. 未施工區域是否有臨時防護", standard: "表3-1未施工項目有適當防護" },
        ],
    },
    SectionTemplate {
        title: "二、臨時滯洪沉砂池檢查",
        items: &[
            ItemTemplate { label: "1. #A臨時池容量是否足夠(340m³)", standard: "尺寸：40m×5m×1.7m，無嚴重淤積" },
            ItemTemplate { label: "2. #B臨時池容量是否足夠(172.4m³)", standard: "尺寸：30.8m×7m×0.8m，無嚴重淤積" },
            ItemTemplate { label: "3. 總容量是否大於257.25m³", standard: "總容量512.4m³ > 257.25m³" },
            ItemTemplate { label: "4. 池體結構是否穩固", standard: "土堤無崩塌、滲漏現象" },
        ],
    },
    SectionTemplate {
        title: "三、排水系統檢查",
        items: &[
            ItemTemplate { label: "1. U1、U2臨時土溝是否暢通", standard: "無堵塞，能有效導排水" },
            ItemTemplate { label: "2. 已完成排水設施是否功能正常", standard: "集水井、排水管無堵塞" },
            ItemTemplate { label: "3. L1防災土堤是否完好", standard: "長20m×高0.8m，能有效截導" },
        ],
    },
    SectionTemplate {
        title: "四、已完成設施檢查",
        items: &[
            ItemTemplate { label: "1. W1擋土牆狀況是否良好", standard: "無龜裂、變形、滑動" },
            ItemTemplate { label: "2. #1永久滯洪沉砂池功能正常", standard: "池體完整，無嚴重淤積" },
            ItemTemplate { label: "3. 集水井是否暢通", standard: "T2、T3、T10等井無堵塞" },
        ],
    },
    SectionTemplate {
        title: "五、安全與防災措施",
        items: &[
            ItemTemplate { label: "1. 是否有土砂外流至下游", standard: "無土砂外流造成環境污染" },
            ItemTemplate { label: "2. 是否備有防災土砂包", standard: "適當地點儲放緊急材料" },
            ItemTemplate { label: "3. 是否有安全警示設施", standard: "施工區設有適當警示" },
        ],
    },
];

/// 関鍵項目か
pub fn is_critical(label: &str) -> bool {
    CRITICAL_KEYWORDS.iter().any(|k| label.contains(k))
}

/// 全項目数
pub fn item_count() -> usize {
    CHECKLIST.iter().map(|s| s.items.len()).sum()
}

/// IDから項目定義を引く
pub fn lookup(id: ItemId) -> Option<&'static ItemTemplate> {
    CHECKLIST.get(id.section).and_then(|s| s.items.get(id.item))
}

/// 全項目のID（表示順）
pub fn item_ids() -> Vec<ItemId> {
    CHECKLIST
        .iter()
        .enumerate()
        .flat_map(|(si, s)| (0..s.items.len()).map(move |ii| ItemId::new(si, ii)))
        .collect()
}

/// 全項目名（表示順、ログの列順）
pub fn item_labels() -> Vec<&'static str> {
    CHECKLIST
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.label))
        .collect()
}

/// 結果が既定値の査核区分
pub fn blank_sections() -> Vec<Section> {
    build_sections(|_| CheckResult::default())
}

/// 指定された結果を適用した査核区分
///
/// 未指定の項目は既定値（符合）。テーブルにないIDはエラー。
pub fn sections_with_results(results: &HashMap<ItemId, CheckResult>) -> Result<Vec<Section>> {
    if let Some(unknown) = results.keys().find(|id| lookup(**id).is_none()) {
        return Err(Error::UnknownItem(unknown.to_string()));
    }
    Ok(build_sections(|id| results.get(&id).copied().unwrap_or_default()))
}

fn build_sections(result_for: impl Fn(ItemId) -> CheckResult) -> Vec<Section> {
    CHECKLIST
        .iter()
        .enumerate()
        .map(|(si, template)| Section {
            title: template.title.to_string(),
            items: template
                .items
                .iter()
                .enumerate()
                .map(|(ii, item)| {
                    let id = ItemId::new(si, ii);
                    ChecklistItem {
                        id,
                        label: item.label.to_string(),
                        standard: item.standard.to_string(),
                        critical: is_critical(item.label),
                        result: result_for(id),
                    }
                })
                .collect(),
        })
        .collect()
}
