//! PDFレポート（A4ページ割り）
//!
//! 2段階で生成する。
//! 1. `plan`: 配置計算のみ（mm単位、上端基準）。ページ送り・セル結合・写真表の割り付け
//! 2. `render`: printpdf で描画してバイト列にする
//!
//! 配置計算を分けておくことで、PDFを解析せずに内容と改ページを検証できる。

use super::{
    PreparedPhoto, ReportContent, ReportError, Result, ResultStyle, RowDescriptor, SkippedPhoto,
    COLUMN_HEADERS, PHOTO_HEADING,
};
use crate::font::FontResource;
use printpdf::image_crate;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use soil_audit_common::layout::{
    line_height_mm, pt_to_mm, A4_HEIGHT_MM, A4_WIDTH_MM, BODY_FONT_PT, CELL_PADDING_MM,
    ITEM_COL_WIDTH_MM, MARGIN_MM, PHOTO_COLUMNS, PHOTO_COL_WIDTH_MM, PHOTO_SPACER_MM,
    RESULT_COL_WIDTH_MM, SMALL_FONT_PT, SUBTITLE_FONT_PT, TITLE_FONT_PT, USABLE_HEIGHT_MM,
    USABLE_WIDTH_MM,
};
use tracing::{debug, warn};

/// 画像埋め込み時の基準解像度
const IMAGE_DPI: f32 = 300.0;
/// 罫線の太さ（pt）
const RULE_THICKNESS_PT: f32 = 0.5;
/// 文字のベースライン位置（行高さに対する割合）
const BASELINE_RATIO: f32 = 0.78;
/// 省略記号
const ELLIPSIS: &str = "…";

/// 8bit RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    fn to_color(self) -> Color {
        Color::Rgb(Rgb::new(
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            None,
        ))
    }
}

pub const ACCENT: Rgb8 = Rgb8(0x00, 0x56, 0xb3);
pub const TEXT: Rgb8 = Rgb8(0x33, 0x33, 0x33);
pub const SECONDARY: Rgb8 = Rgb8(0x66, 0x66, 0x66);
pub const MUTED: Rgb8 = Rgb8(0x99, 0x99, 0x99);
pub const FAIL: Rgb8 = Rgb8(0xdc, 0x35, 0x45);
pub const FAIL_BG: Rgb8 = Rgb8(0xff, 0xf5, 0xf5);
pub const SECTION_BG: Rgb8 = Rgb8(0xe9, 0xec, 0xef);
pub const INFO_BG: Rgb8 = Rgb8(0xf4, 0xf8, 0xfb);
pub const BORDER: Rgb8 = Rgb8(0xdd, 0xdd, 0xdd);
pub const WHITE: Rgb8 = Rgb8(0xff, 0xff, 0xff);

fn result_color(style: ResultStyle) -> Rgb8 {
    match style {
        ResultStyle::Emphasized => FAIL,
        ResultStyle::Default => TEXT,
        ResultStyle::Muted => MUTED,
    }
}

/// 描画要素（座標はmm、yはページ上端からの距離）
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// y はベースライン
    Text { x: f32, y: f32, size: f32, color: Rgb8, text: String },
    /// y は上辺
    Rect { x: f32, y: f32, w: f32, h: f32, fill: Rgb8 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb8 },
    /// index は入力リスト上の写真位置。y は上辺
    Photo { index: usize, x: f32, y: f32, w: f32, h: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedPage {
    pub elements: Vec<Element>,
}

impl PlannedPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// 配置計算の結果
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPlan {
    pub pages: Vec<PlannedPage>,
    /// 2列結合で描いた表の行位置（0行目は列見出し）
    pub merged_rows: Vec<usize>,
    /// 写真記録の開始ページ（写真なしなら None）
    pub photo_page_start: Option<usize>,
    /// 写真表のセル（左上から順、None は空きセル）
    pub photo_cells: Vec<Option<usize>>,
}

impl PdfPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 全ページの文字列（描画順）
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|p| p.texts()).collect()
    }
}

// ============================================
// 文字幅の見積もり
// ============================================

/// 1文字の幅（em）。全角は1em、半角は概算
fn char_width_em(c: char) -> f32 {
    if !c.is_ascii() {
        return 1.0;
    }
    match c {
        ' ' => 0.28,
        'M' | 'W' | 'm' | 'w' => 0.8,
        'A'..='Z' => 0.65,
        _ => 0.52,
    }
}

/// 文字列の幅（mm）
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    let em = pt_to_mm(size_pt);
    text.chars().map(|c| char_width_em(c) * em).sum()
}

/// 指定幅で折り返す。空文字は空行1行
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32) -> Vec<String> {
    let em = pt_to_mm(size_pt);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;
        for c in paragraph.chars() {
            let cw = char_width_em(c) * em;
            if width + cw > max_width_mm && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                if c == ' ' {
                    continue;
                }
            }
            line.push(c);
            width += cw;
        }
        lines.push(line);
    }
    lines
}

// ============================================
// 配置計算
// ============================================

/// 高さ `room` に入る行数（最低1行）
fn max_lines(room: f32, size_pt: f32) -> usize {
    ((room / line_height_mm(size_pt)).floor() as usize).max(1)
}

/// 折り返した上で `max` 行を超える分を切り捨て、最終行の末尾を「…」にする
fn wrap_clamped(text: &str, max_width_mm: f32, size_pt: f32, max: usize) -> Vec<String> {
    let mut lines = wrap_text(text, max_width_mm, size_pt);
    if lines.len() <= max {
        return lines;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        let ellipsis = text_width_mm(ELLIPSIS, size_pt);
        while !last.is_empty() && text_width_mm(last, size_pt) + ellipsis > max_width_mm {
            last.pop();
        }
        last.push_str(ELLIPSIS);
    }
    lines
}

struct Planner {
    pages: Vec<PlannedPage>,
    y: f32,
}

impl Planner {
    fn new() -> Self {
        Self {
            pages: vec![PlannedPage::default()],
            y: MARGIN_MM,
        }
    }

    fn push(&mut self, element: Element) {
        let last = self.pages.len() - 1;
        self.pages[last].elements.push(element);
    }

    fn new_page(&mut self) {
        self.pages.push(PlannedPage::default());
        self.y = MARGIN_MM;
    }

    fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    /// 残り高さが足りなければ改ページ。ページ先頭では改ページしない
    fn ensure(&mut self, height: f32) -> bool {
        let bottom = A4_HEIGHT_MM - MARGIN_MM;
        if self.y + height > bottom && self.y > MARGIN_MM {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn text(&mut self, x: f32, top: f32, size: f32, color: Rgb8, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(Element::Text {
            x,
            y: top + line_height_mm(size) * BASELINE_RATIO,
            size,
            color,
            text: text.to_string(),
        });
    }

    /// 複数行を上から順に置き、使った高さを返す
    fn lines(&mut self, x: f32, top: f32, size: f32, color: Rgb8, lines: &[String]) -> f32 {
        let lh = line_height_mm(size);
        for (i, line) in lines.iter().enumerate() {
            self.text(x, top + lh * i as f32, size, color, line);
        }
        lh * lines.len() as f32
    }

    fn centered(&mut self, size: f32, color: Rgb8, text: &str) {
        for line in wrap_text(text, USABLE_WIDTH_MM, size) {
            let width = text_width_mm(&line, size).min(USABLE_WIDTH_MM);
            let x = MARGIN_MM + (USABLE_WIDTH_MM - width) / 2.0;
            self.text(x, self.y, size, color, &line);
            self.y += line_height_mm(size);
        }
    }

    fn hline(&mut self, y: f32, color: Rgb8) {
        self.push(Element::Line {
            x1: MARGIN_MM,
            y1: y,
            x2: MARGIN_MM + USABLE_WIDTH_MM,
            y2: y,
            color,
        });
    }

    fn vline(&mut self, x: f32, y1: f32, y2: f32, color: Rgb8) {
        self.push(Element::Line { x1: x, y1, x2: x, y2, color });
    }

    fn outline(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb8) {
        self.push(Element::Line { x1: x, y1: y, x2: x + w, y2: y, color });
        self.push(Element::Line { x1: x, y1: y + h, x2: x + w, y2: y + h, color });
        self.vline(x, y, y + h, color);
        self.vline(x + w, y, y + h, color);
    }
}

/// 配置計算
pub fn plan(content: &ReportContent, photos: &[PreparedPhoto]) -> PdfPlan {
    let mut p = Planner::new();

    plan_title(&mut p, content);
    plan_metadata(&mut p, content);
    let merged_rows = plan_table(&mut p, content);

    let mut photo_page_start = None;
    let mut photo_cells = Vec::new();
    if !photos.is_empty() {
        p.new_page();
        photo_page_start = Some(p.current_page());
        photo_cells = plan_photos(&mut p, photos);
    }

    debug!(pages = p.pages.len(), merged = merged_rows.len(), "pdf layout planned");

    PdfPlan {
        pages: p.pages,
        merged_rows,
        photo_page_start,
        photo_cells,
    }
}

fn plan_title(p: &mut Planner, content: &ReportContent) {
    p.centered(TITLE_FONT_PT, ACCENT, &content.title);
    p.y += 1.5;
    p.centered(SUBTITLE_FONT_PT, SECONDARY, &content.project_name);
    p.y += 2.0;
    let y = p.y;
    p.push(Element::Rect { x: MARGIN_MM, y, w: USABLE_WIDTH_MM, h: 0.8, fill: ACCENT });
    p.y += 5.0;
}

/// 基本資料（2×2）
fn plan_metadata(p: &mut Planner, content: &ReportContent) {
    let half = USABLE_WIDTH_MM / 2.0;
    let row_h = line_height_mm(BODY_FONT_PT) + CELL_PADDING_MM * 2.0;
    let top = p.y;
    p.push(Element::Rect { x: MARGIN_MM, y: top, w: USABLE_WIDTH_MM, h: row_h * 2.0, fill: INFO_BG });

    for (i, (label, value)) in content.metadata_fields.iter().enumerate() {
        let x = MARGIN_MM + (i % 2) as f32 * half + CELL_PADDING_MM;
        let y = top + (i / 2) as f32 * row_h + CELL_PADDING_MM;
        let text = format!("{}：{}", label, value);
        let line = wrap_text(&text, half - CELL_PADDING_MM * 2.0, BODY_FONT_PT)
            .into_iter()
            .next()
            .unwrap_or_default();
        p.text(x, y, BODY_FONT_PT, TEXT, &line);
    }

    p.outline(MARGIN_MM, top, USABLE_WIDTH_MM, row_h * 2.0, BORDER);
    p.hline(top + row_h, BORDER);
    p.vline(MARGIN_MM + half, top, top + row_h * 2.0, BORDER);
    p.y = top + row_h * 2.0 + 6.0;
}

fn column_header_height() -> f32 {
    line_height_mm(BODY_FONT_PT) + CELL_PADDING_MM * 2.0
}

fn plan_column_header(p: &mut Planner) {
    let h = column_header_height();
    let top = p.y;
    p.push(Element::Rect { x: MARGIN_MM, y: top, w: USABLE_WIDTH_MM, h, fill: ACCENT });
    p.text(MARGIN_MM + CELL_PADDING_MM, top + CELL_PADDING_MM, BODY_FONT_PT, WHITE, COLUMN_HEADERS[0]);
    p.text(
        MARGIN_MM + ITEM_COL_WIDTH_MM + CELL_PADDING_MM,
        top + CELL_PADDING_MM,
        BODY_FONT_PT,
        WHITE,
        COLUMN_HEADERS[1],
    );
    p.y += h;
}

/// 査核表。改ページ時は列見出しを繰り返す。結合した行位置を返す
fn plan_table(p: &mut Planner, content: &ReportContent) -> Vec<usize> {
    let mut merged = Vec::new();
    let inner_item = ITEM_COL_WIDTH_MM - CELL_PADDING_MM * 2.0;
    let inner_result = RESULT_COL_WIDTH_MM - CELL_PADDING_MM * 2.0;
    // 1行が列見出しと同じページに収まる高さ
    let row_room = USABLE_HEIGHT_MM - column_header_height() - CELL_PADDING_MM * 2.0;

    p.ensure(column_header_height() * 2.0);
    plan_column_header(p);

    for (i, row) in content.rows.iter().enumerate() {
        let table_index = i + 1;

        match row {
            // 区分見出しは常に2列結合
            RowDescriptor::SectionHeader { title } => {
                let lines = wrap_clamped(
                    title,
                    USABLE_WIDTH_MM - CELL_PADDING_MM * 2.0,
                    BODY_FONT_PT,
                    max_lines(row_room, BODY_FONT_PT),
                );
                let h = line_height_mm(BODY_FONT_PT) * lines.len() as f32 + CELL_PADDING_MM * 2.0;
                if p.ensure(h) {
                    plan_column_header(p);
                }
                let top = p.y;
                p.push(Element::Rect { x: MARGIN_MM, y: top, w: USABLE_WIDTH_MM, h, fill: SECTION_BG });
                p.lines(MARGIN_MM + CELL_PADDING_MM, top + CELL_PADDING_MM, BODY_FONT_PT, ACCENT, &lines);
                merged.push(table_index);
                p.hline(top + h, BORDER);
                p.y = top + h;
            }
            RowDescriptor::Item { label, standard, result, style, .. } => {
                // 標準は最低1行残す
                let label_room = row_room - line_height_mm(SMALL_FONT_PT);
                let label_lines =
                    wrap_clamped(label, inner_item, BODY_FONT_PT, max_lines(label_room, BODY_FONT_PT));
                let room = row_room - line_height_mm(BODY_FONT_PT) * label_lines.len() as f32;
                let std_lines =
                    wrap_clamped(standard, inner_item, SMALL_FONT_PT, max_lines(room, SMALL_FONT_PT));
                let result_lines = wrap_text(result.label(), inner_result, BODY_FONT_PT);
                let left_h = line_height_mm(BODY_FONT_PT) * label_lines.len() as f32
                    + line_height_mm(SMALL_FONT_PT) * std_lines.len() as f32;
                let right_h = line_height_mm(BODY_FONT_PT) * result_lines.len() as f32;
                let h = left_h.max(right_h) + CELL_PADDING_MM * 2.0;
                if p.ensure(h) {
                    plan_column_header(p);
                }

                let top = p.y;
                let result_x = MARGIN_MM + ITEM_COL_WIDTH_MM;
                if *style == ResultStyle::Emphasized {
                    p.push(Element::Rect { x: result_x, y: top, w: RESULT_COL_WIDTH_MM, h, fill: FAIL_BG });
                }
                let x = MARGIN_MM + CELL_PADDING_MM;
                let used = p.lines(x, top + CELL_PADDING_MM, BODY_FONT_PT, TEXT, &label_lines);
                p.lines(x, top + CELL_PADDING_MM + used, SMALL_FONT_PT, SECONDARY, &std_lines);
                p.lines(
                    result_x + CELL_PADDING_MM,
                    top + CELL_PADDING_MM,
                    BODY_FONT_PT,
                    result_color(*style),
                    &result_lines,
                );
                p.vline(result_x, top, top + h, BORDER);
                p.hline(top + h, BORDER);
                p.y = top + h;
            }
        }
    }
    merged
}

/// 写真表（1行2枚）。奇数枚の最後は空きセルで埋める
fn plan_photos(p: &mut Planner, photos: &[PreparedPhoto]) -> Vec<Option<usize>> {
    let mut cells = Vec::new();

    let heading_h = line_height_mm(SUBTITLE_FONT_PT) + 3.0;
    p.text(MARGIN_MM, p.y, SUBTITLE_FONT_PT, ACCENT, PHOTO_HEADING);
    p.y += heading_h;

    let caption_width = PHOTO_COL_WIDTH_MM - CELL_PADDING_MM * 2.0;
    for pair in photos.chunks(PHOTO_COLUMNS) {
        let captions: Vec<Vec<String>> = pair
            .iter()
            .map(|photo| {
                if photo.caption.is_empty() {
                    Vec::new()
                } else {
                    // 写真セルが見出しと同じページに収まる行数まで
                    let room = USABLE_HEIGHT_MM
                        - heading_h
                        - CELL_PADDING_MM * 2.0
                        - photo.photo.display_height_mm
                        - PHOTO_SPACER_MM;
                    wrap_clamped(&photo.caption, caption_width, BODY_FONT_PT, max_lines(room, BODY_FONT_PT))
                }
            })
            .collect();
        let h = pair
            .iter()
            .zip(&captions)
            .map(|(photo, lines)| {
                photo.photo.display_height_mm
                    + PHOTO_SPACER_MM
                    + line_height_mm(BODY_FONT_PT) * lines.len() as f32
            })
            .fold(0.0_f32, f32::max)
            + CELL_PADDING_MM * 2.0;
        p.ensure(h);
        let top = p.y;

        for col in 0..PHOTO_COLUMNS {
            let cell_x = MARGIN_MM + col as f32 * PHOTO_COL_WIDTH_MM;
            p.outline(cell_x, top, PHOTO_COL_WIDTH_MM, h, BORDER);
            match (pair.get(col), captions.get(col)) {
                (Some(photo), Some(lines)) => {
                    let w = photo.photo.display_width_mm;
                    let ph = photo.photo.display_height_mm;
                    p.push(Element::Photo {
                        index: photo.index,
                        x: cell_x + (PHOTO_COL_WIDTH_MM - w) / 2.0,
                        y: top + CELL_PADDING_MM,
                        w,
                        h: ph,
                    });
                    let caption_top = top + CELL_PADDING_MM + ph + PHOTO_SPACER_MM;
                    p.lines(cell_x + CELL_PADDING_MM, caption_top, BODY_FONT_PT, TEXT, lines);
                    cells.push(Some(photo.index));
                }
                _ => cells.push(None),
            }
        }
        p.y = top + h;
    }
    cells
}

// ============================================
// 描画
// ============================================

/// 描画結果
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    /// 埋め込みに失敗して省いた写真
    pub skipped_photos: Vec<SkippedPhoto>,
    /// フォント埋め込みに失敗して標準フォントに切り替えた理由
    pub font_fallback: Option<String>,
}

/// 配置計算の結果をPDFに描画
pub fn render(
    plan: &PdfPlan,
    title: &str,
    photos: &[PreparedPhoto],
    font: &FontResource,
) -> Result<RenderedPdf> {
    let (doc, page1, layer1) = PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");

    let mut font_fallback = None;
    let (font_ref, ascii_only) = match font {
        FontResource::Embedded { bytes, .. } => match doc.add_external_font(bytes.as_slice()) {
            Ok(font_ref) => (font_ref, false),
            Err(e) => {
                let reason = format!("フォント埋め込みエラー: {:?}", e);
                warn!(%reason, "falling back to builtin font");
                font_fallback = Some(reason);
                (builtin_font(&doc)?, true)
            }
        },
        FontResource::Fallback { .. } => (builtin_font(&doc)?, true),
    };

    let mut skipped_photos = Vec::new();
    for (i, page) in plan.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page_index, layer_index) = doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        for element in &page.elements {
            match element {
                Element::Text { x, y, size, color, text } => {
                    let text = if ascii_only { ascii_fallback(text) } else { text.clone() };
                    layer.set_fill_color(color.to_color());
                    layer.use_text(text, *size, Mm(*x), Mm(flip(*y)), &font_ref);
                }
                Element::Rect { x, y, w, h, fill } => {
                    layer.set_fill_color(fill.to_color());
                    let rect = Rect::new(Mm(*x), Mm(flip(*y + *h)), Mm(*x + *w), Mm(flip(*y)))
                        .with_mode(PaintMode::Fill);
                    layer.add_rect(rect);
                }
                Element::Line { x1, y1, x2, y2, color } => {
                    layer.set_outline_color(color.to_color());
                    layer.set_outline_thickness(RULE_THICKNESS_PT);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), Mm(flip(*y1))), false),
                            (Point::new(Mm(*x2), Mm(flip(*y2))), false),
                        ],
                        is_closed: false,
                    });
                }
                Element::Photo { index, x, y, w, h } => {
                    let embedded = photos
                        .iter()
                        .find(|p| p.index == *index)
                        .ok_or_else(|| "写真データがありません".to_string())
                        .and_then(|p| embed_photo(&layer, p, *x, flip(*y + *h), *w, *h));
                    if let Err(reason) = embedded {
                        warn!(index, %reason, "photo skipped in pdf");
                        skipped_photos.push(SkippedPhoto { index: *index, reason });
                    }
                }
            }
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ReportError::Generation(format!("PDF保存エラー: {:?}", e)))?;

    Ok(RenderedPdf {
        bytes,
        skipped_photos,
        font_fallback,
    })
}

/// 上端基準のyをPDF座標（下端基準）へ
fn flip(y_from_top: f32) -> f32 {
    A4_HEIGHT_MM - y_from_top
}

fn builtin_font(doc: &PdfDocumentReference) -> Result<IndirectFontRef> {
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Generation(format!("フォント追加エラー: {:?}", e)))
}

/// 標準フォントで描けない文字は `?` に置換
fn ascii_fallback(text: &str) -> String {
    text.chars().map(|c| if c.is_ascii() { c } else { '?' }).collect()
}

fn embed_photo(
    layer: &PdfLayerReference,
    photo: &PreparedPhoto,
    x: f32,
    y_bottom: f32,
    w: f32,
    h: f32,
) -> std::result::Result<(), String> {
    let (pw, ph) = photo.photo.rgb.dimensions();
    if pw == 0 || ph == 0 {
        return Err("画像サイズが0です".into());
    }
    let buffer = image_crate::RgbImage::from_raw(pw, ph, photo.photo.rgb.as_raw().clone())
        .ok_or_else(|| "画素データの長さが不正です".to_string())?;
    let image = Image::from_dynamic_image(&image_crate::DynamicImage::ImageRgb8(buffer));

    // IMAGE_DPI での原寸（mm）から拡大率を求める
    let natural_w = pw as f32 / IMAGE_DPI * 25.4;
    let natural_h = ph as f32 / IMAGE_DPI * 25.4;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y_bottom)),
            scale_x: Some(w / natural_w),
            scale_y: Some(h / natural_h),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}
