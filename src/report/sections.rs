//! 査核表の行記述子
//!
//! 区分ごとに見出し行1行 + 項目行。結果セルの表示スタイルは結果値だけで決まる。

use serde::Serialize;
use soil_audit_common::{CheckResult, ItemId, Section};

/// 結果セルの表示スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultStyle {
    /// 不符合: 赤・強調
    Emphasized,
    /// 符合: 通常
    Default,
    /// 無此項: 淡色
    Muted,
}

impl ResultStyle {
    /// HTML の class 名
    pub fn css_class(&self) -> &'static str {
        match self {
            ResultStyle::Emphasized => "fail",
            ResultStyle::Default => "pass",
            ResultStyle::Muted => "na",
        }
    }
}

pub fn style_for(result: CheckResult) -> ResultStyle {
    match result {
        CheckResult::Fail => ResultStyle::Emphasized,
        CheckResult::Pass => ResultStyle::Default,
        CheckResult::NotApplicable => ResultStyle::Muted,
    }
}

/// 表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowDescriptor {
    /// 区分見出し（2列結合）
    SectionHeader { title: String },
    /// 項目行: 左=項目名(太字)+標準(淡色)、右=結果
    Item {
        id: ItemId,
        label: String,
        standard: String,
        critical: bool,
        result: CheckResult,
        style: ResultStyle,
    },
}

impl RowDescriptor {
    pub fn is_header(&self) -> bool {
        matches!(self, RowDescriptor::SectionHeader { .. })
    }
}

/// 区分リストから行記述子を生成
///
/// 項目のない区分は見出し行のみ。
pub fn render_rows(sections: &[Section]) -> Vec<RowDescriptor> {
    let mut rows = Vec::with_capacity(sections.iter().map(|s| s.items.len() + 1).sum());
    for section in sections {
        rows.push(RowDescriptor::SectionHeader { title: section.title.clone() });
        rows.extend(section.items.iter().map(|item| RowDescriptor::Item {
            id: item.id,
            label: item.label.clone(),
            standard: item.standard.clone(),
            critical: item.critical,
            result: item.result,
            style: style_for(item.result),
        }));
    }
    rows
}

/// PDF表で2列結合する行の位置
///
/// 表の0行目は列見出し。k番目の区分見出しは 1 + Σ(前の区分の項目数 + 1)。
pub fn section_header_indices(sections: &[Section]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(sections.len());
    let mut row = 1;
    for section in sections {
        indices.push(row);
        row += section.items.len() + 1;
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use soil_audit_common::{blank_sections, ChecklistItem};

    fn section(title: &str, results: &[CheckResult]) -> Section {
        Section {
            title: title.to_string(),
            items: results
                .iter()
                .enumerate()
                .map(|(i, r)| ChecklistItem {
                    id: ItemId::new(0, i),
                    label: format!("{}. item", i + 1),
                    standard: "std".to_string(),
                    critical: false,
                    result: *r,
                })
                .collect(),
        }
    }

    #[test]
    fn test_row_counts_per_section() {
        let sections = blank_sections();
        let rows = render_rows(&sections);
        let headers = rows.iter().filter(|r| r.is_header()).count();
        let items = rows.len() - headers;
        assert_eq!(headers, sections.len());
        assert_eq!(items, sections.iter().map(|s| s.items.len()).sum::<usize>());
    }

    #[test]
    fn test_empty_section_yields_header_only() {
        let rows = render_rows(&[section("空", &[])]);
        assert_eq!(rows, vec![RowDescriptor::SectionHeader { title: "空".to_string() }]);
    }

    #[test]
    fn test_style_depends_only_on_result() {
        assert_eq!(style_for(CheckResult::Fail), ResultStyle::Emphasized);
        assert_eq!(style_for(CheckResult::Pass), ResultStyle::Default);
        assert_eq!(style_for(CheckResult::NotApplicable), ResultStyle::Muted);
        assert_eq!(ResultStyle::Emphasized.css_class(), "fail");
        assert_ne!(ResultStyle::Default.css_class(), "fail");
        assert_ne!(ResultStyle::Muted.css_class(), "fail");
    }

    #[test]
    fn test_fail_row_is_emphasized() {
        let rows = render_rows(&[section("S", &[CheckResult::Pass, CheckResult::Fail, CheckResult::NotApplicable])]);
        let styles: Vec<ResultStyle> = rows
            .iter()
            .filter_map(|r| match r {
                RowDescriptor::Item { style, .. } => Some(*style),
                _ => None,
            })
            .collect();
        assert_eq!(styles, vec![ResultStyle::Default, ResultStyle::Emphasized, ResultStyle::Muted]);
    }

    #[test]
    fn test_header_indices_match_flattened_rows() {
        let sections = vec![
            section("A", &[CheckResult::Pass; 3]),
            section("B", &[]),
            section("C", &[CheckResult::Fail; 2]),
        ];
        // 列見出し行を先頭に置いた表での位置
        let table: Vec<bool> = std::iter::once(false)
            .chain(render_rows(&sections).iter().map(|r| r.is_header()))
            .collect();
        let expected: Vec<usize> = table
            .iter()
            .enumerate()
            .filter(|(_, h)| **h)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(section_header_indices(&sections), expected);
        assert_eq!(expected, vec![1, 5, 6]);
    }
}
