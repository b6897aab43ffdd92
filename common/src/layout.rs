//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義（Source of Truth）
//! HTML版の表示比率（75% / 25%、写真2列）と同一の設計思想

// ============================================
// mm基準レイアウト（Source of Truth）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白設定（mm）
pub const MARGIN_MM: f32 = 15.0;

/// 利用可能幅（mm）
pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 180mm

/// 利用可能高さ（mm）
pub const USABLE_HEIGHT_MM: f32 = A4_HEIGHT_MM - MARGIN_MM * 2.0; // 267mm

/// 査核表の列比率（項目と標準 / 結果）
pub const ITEM_COL_RATIO: f32 = 0.75;
pub const RESULT_COL_RATIO: f32 = 0.25;
pub const ITEM_COL_WIDTH_MM: f32 = USABLE_WIDTH_MM * ITEM_COL_RATIO; // 135mm
pub const RESULT_COL_WIDTH_MM: f32 = USABLE_WIDTH_MM * RESULT_COL_RATIO; // 45mm

/// セル内余白（mm）
pub const CELL_PADDING_MM: f32 = 2.0;

/// 写真の最大表示サイズ（8cm × 10cm）
pub const PHOTO_MAX_WIDTH_MM: f32 = 80.0;
pub const PHOTO_MAX_HEIGHT_MM: f32 = 100.0;

/// 写真表の列数と、写真と説明の間隔（mm）
pub const PHOTO_COLUMNS: usize = 2;
pub const PHOTO_SPACER_MM: f32 = 3.0;
pub const PHOTO_COL_WIDTH_MM: f32 = USABLE_WIDTH_MM / PHOTO_COLUMNS as f32; // 90mm

// ============================================
// 文字サイズ（pt）
// ============================================

pub const TITLE_FONT_PT: f32 = 16.0;
pub const SUBTITLE_FONT_PT: f32 = 12.0;
pub const BODY_FONT_PT: f32 = 10.0;
pub const SMALL_FONT_PT: f32 = 8.0;

/// 行送り（文字サイズに対する倍率）
pub const LINE_HEIGHT_RATIO: f32 = 1.35;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

/// 1行の高さ（mm）
#[inline]
pub fn line_height_mm(font_pt: f32) -> f32 {
    pt_to_mm(font_pt * LINE_HEIGHT_RATIO)
}

/// 写真の表示サイズを計算
///
/// 幅を `max_w` に合わせ、高さが `max_h` を超える場合は高さ基準で縮小する。
/// 縦横比は保持される。
pub fn fit_within(width_px: u32, height_px: u32, max_w: f32, max_h: f32) -> (f32, f32) {
    if width_px == 0 || height_px == 0 {
        return (0.0, 0.0);
    }
    let aspect = height_px as f32 / width_px as f32;
    let mut w = max_w;
    let mut h = max_w * aspect;
    if h > max_h {
        h = max_h;
        w = max_h / aspect;
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert!((USABLE_WIDTH_MM - 180.0).abs() < 0.01);
        assert!((ITEM_COL_WIDTH_MM - 135.0).abs() < 0.01);
        assert!((RESULT_COL_WIDTH_MM - 45.0).abs() < 0.01);
        assert!((PHOTO_COL_WIDTH_MM - 90.0).abs() < 0.01);
        assert!(PHOTO_MAX_WIDTH_MM <= PHOTO_COL_WIDTH_MM);
    }

    #[test]
    fn test_ratios() {
        let total = ITEM_COL_RATIO + RESULT_COL_RATIO;
        assert!((total - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((pt_to_mm(mm_to_pt(42.0)) - 42.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_landscape_uses_full_width() {
        let (w, h) = fit_within(4000, 3000, PHOTO_MAX_WIDTH_MM, PHOTO_MAX_HEIGHT_MM);
        assert!((w - 80.0).abs() < 0.001);
        assert!((h - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_tall_portrait_clamps_height() {
        let (w, h) = fit_within(1000, 3000, PHOTO_MAX_WIDTH_MM, PHOTO_MAX_HEIGHT_MM);
        assert!((h - 100.0).abs() < 0.001);
        assert!((w - 100.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        for (pw, ph) in [(640u32, 480u32), (480, 640), (1, 1000), (1000, 1), (333, 777)] {
            let (w, h) = fit_within(pw, ph, PHOTO_MAX_WIDTH_MM, PHOTO_MAX_HEIGHT_MM);
            assert!(w <= PHOTO_MAX_WIDTH_MM + 1e-3);
            assert!(h <= PHOTO_MAX_HEIGHT_MM + 1e-3);
            let expected = pw as f32 / ph as f32;
            assert!((w / h - expected).abs() / expected < 1e-4, "{}x{}", pw, ph);
        }
    }

    #[test]
    fn test_fit_zero_size() {
        assert_eq!(fit_within(0, 10, 80.0, 100.0), (0.0, 0.0));
    }
}
