//! HTMLレポート
//!
//! 単一ファイルで完結するHTML。写真はbase64でインライン埋め込み。
//! ページ割りは行わず、印刷時のレイアウトはブラウザ側に任せる。

use super::{
    PreparedPhoto, ReportContent, RowDescriptor, COLUMN_HEADERS, NO_PHOTOS_NOTICE, PHOTO_HEADING,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

const STYLE: &str = r#"
    body { font-family: "Microsoft JhengHei", "Heiti TC", "Noto Sans TC", sans-serif; padding: 20px; max-width: 800px; margin: 0 auto; color: #333; }
    .header { text-align: center; border-bottom: 3px solid #0056b3; padding-bottom: 15px; margin-bottom: 20px; }
    h1 { color: #0056b3; margin: 0; font-size: 22px; }
    h2 { color: #666; margin: 5px 0; font-size: 16px; font-weight: normal; }
    h3 { color: #0056b3; }
    .info-box { background: #f4f8fb; padding: 15px; border-radius: 5px; margin-bottom: 20px; border: 1px solid #dcebf7; }
    .info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 30px; font-size: 14px; }
    th { background: #0056b3; color: white; padding: 8px; text-align: left; }
    td { border-bottom: 1px solid #eee; padding: 10px 8px; vertical-align: top; }
    .section-header td { background-color: #e9ecef; color: #0056b3; font-weight: bold; padding: 8px; border-top: 2px solid #ccc; }
    .item-title { font-weight: bold; margin-bottom: 4px; }
    .item-std { font-size: 12px; color: #666; }
    .critical-tag { color: #dc3545; font-weight: bold; font-size: 0.8em; border: 1px solid #dc3545; padding: 1px 4px; border-radius: 4px; margin-left: 4px; }
    .pass { color: #333; }
    .fail { color: #dc3545; font-weight: bold; background: #fff5f5; }
    .na { color: #999; }
    .photo-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; page-break-inside: avoid; }
    .photo-item { border: 1px solid #ddd; background: white; break-inside: avoid; display: flex; flex-direction: column; }
    .photo-header { background: #f0f0f0; padding: 5px; text-align: center; font-size: 12px; font-weight: bold; color: #555; border-bottom: 1px solid #ddd; }
    .photo-img-container { padding: 5px; text-align: center; }
    .photo-item img { max-width: 100%; height: auto; display: block; margin: 0 auto; max-height: 250px; }
    .photo-caption { padding: 8px; font-size: 13px; color: #333; background: #fff; border-top: 1px solid #eee; min-height: 40px; }
    .no-photos { text-align: center; color: #999; padding: 20px; }
    @media print {
        body { padding: 0; }
        .photo-grid { display: block; }
        .photo-item { width: 48%; display: inline-block; vertical-align: top; margin-bottom: 15px; margin-right: 1%; }
    }
"#;

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self {
        Self { buf: String::with_capacity(16 * 1024) }
    }

    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// HTMLレポートを生成
pub fn render(content: &ReportContent, photos: &[PreparedPhoto]) -> String {
    let mut w = Html::new();

    w.push("<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"UTF-8\">\n");
    w.push(format!("<title>{}</title>\n", esc(&content.title)));
    w.push("<style>");
    w.push(STYLE);
    w.push("</style>\n</head>\n<body>\n");

    // 表題
    w.push("<div class=\"header\">\n");
    w.push(format!("  <h1>{}</h1>\n", esc(&content.title)));
    w.push(format!("  <h2>{}</h2>\n", esc(&content.project_name)));
    w.push("</div>\n");

    // 基本資料
    w.push("<div class=\"info-box\"><div class=\"info-grid\">\n");
    for (label, value) in &content.metadata_fields {
        w.push(format!("  <div><strong>{}：</strong> {}</div>\n", esc(label), esc(value)));
    }
    w.push("</div></div>\n");

    // 査核表
    w.push("<table>\n<thead>\n");
    w.push(format!(
        "  <tr><th width=\"75%\">{}</th><th width=\"25%\">{}</th></tr>\n",
        COLUMN_HEADERS[0], COLUMN_HEADERS[1]
    ));
    w.push("</thead>\n<tbody>\n");
    for row in &content.rows {
        push_row(&mut w, row);
    }
    w.push("</tbody>\n</table>\n");

    // 写真
    w.push("<div style=\"page-break-before: always;\"></div>\n");
    w.push(format!("<h3>📷 {}</h3>\n", PHOTO_HEADING));
    if photos.is_empty() {
        w.push(format!("<p class=\"no-photos\">{}</p>\n", NO_PHOTOS_NOTICE));
    } else {
        w.push("<div class=\"photo-grid\">\n");
        for photo in photos {
            push_photo(&mut w, photo);
        }
        w.push("</div>\n");
    }

    w.push("</body>\n</html>\n");
    w.finish()
}

fn push_row(w: &mut Html, row: &RowDescriptor) {
    match row {
        RowDescriptor::SectionHeader { title } => {
            w.push(format!(
                "  <tr class=\"section-header\"><td colspan=\"2\">{}</td></tr>\n",
                esc(title)
            ));
        }
        RowDescriptor::Item { label, standard, critical, result, style, .. } => {
            w.push("  <tr>\n    <td>\n");
            w.push(format!("      <div class=\"item-title\">{}", esc(label)));
            if *critical {
                w.push("<span class=\"critical-tag\">⚠ 關鍵項目</span>");
            }
            w.push("</div>\n");
            w.push(format!("      <div class=\"item-std\">{}</div>\n", esc(standard)));
            w.push("    </td>\n");
            w.push(format!(
                "    <td class=\"{}\">{}</td>\n  </tr>\n",
                style.css_class(),
                result.label()
            ));
        }
    }
}

fn push_photo(w: &mut Html, photo: &PreparedPhoto) {
    w.push("  <div class=\"photo-item\">\n");
    w.push(format!("    <div class=\"photo-header\">照片 {}</div>\n", photo.index + 1));
    w.push(format!(
        "    <div class=\"photo-img-container\"><img src=\"data:image/jpeg;base64,{}\"></div>\n",
        STANDARD.encode(&photo.photo.jpeg)
    ));
    w.push(format!("    <div class=\"photo-caption\">{}</div>\n", esc(&photo.caption)));
    w.push("  </div>\n");
}

fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
