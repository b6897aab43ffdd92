//! 写真の正規化
//!
//! PDFは透過を扱えないため、RGB 3チャンネルに変換してJPEGで再エンコードする。
//! 表示サイズは最大 8cm × 10cm の枠に縦横比を保って収める。

use super::{ReportError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbImage;
use soil_audit_common::layout::{fit_within, PHOTO_MAX_HEIGHT_MM, PHOTO_MAX_WIDTH_MM};
use std::fmt;
use std::str::FromStr;

/// 写真画質設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhotoQuality {
    /// 高品質: 1400px, 85%
    High,
    /// 中品質: 800px, 75%（デフォルト）
    #[default]
    Medium,
    /// 低品質: 500px, 60%
    Low,
}

impl PhotoQuality {
    /// 最大ピクセル幅
    pub fn max_width(&self) -> u32 {
        match self {
            PhotoQuality::High => 1400,
            PhotoQuality::Medium => 800,
            PhotoQuality::Low => 500,
        }
    }

    /// JPEG品質 (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PhotoQuality::High => 85,
            PhotoQuality::Medium => 75,
            PhotoQuality::Low => 60,
        }
    }
}

impl FromStr for PhotoQuality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PhotoQuality::High),
            "medium" | "med" | "m" => Ok(PhotoQuality::Medium),
            "low" | "l" => Ok(PhotoQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl fmt::Display for PhotoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoQuality::High => write!(f, "high"),
            PhotoQuality::Medium => write!(f, "medium"),
            PhotoQuality::Low => write!(f, "low"),
        }
    }
}

/// 正規化済み写真
#[derive(Debug, Clone)]
pub struct NormalizedPhoto {
    /// 再エンコード済みJPEG
    pub jpeg: Vec<u8>,
    /// RGB画素（PDF埋め込み用）
    pub rgb: RgbImage,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// 表示サイズ（mm）
    pub display_width_mm: f32,
    pub display_height_mm: f32,
}

/// 画像バイト列を正規化
///
/// 読めない画像は `ReportError::AssetDecode`。呼び出し側はその写真だけを除外する。
pub fn normalize(bytes: &[u8], quality: PhotoQuality) -> Result<NormalizedPhoto> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ReportError::AssetDecode(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ReportError::AssetDecode("画像サイズが0です".into()));
    }

    // 表示サイズは縮小前の縦横比で決める
    let (source_width, source_height) = (decoded.width(), decoded.height());
    let (display_width_mm, display_height_mm) =
        fit_within(source_width, source_height, PHOTO_MAX_WIDTH_MM, PHOTO_MAX_HEIGHT_MM);

    // 画素数だけ縮小
    let max_width = quality.max_width();
    let decoded = if source_width > max_width {
        let height = (source_height as f64 * max_width as f64 / source_width as f64).round();
        decoded.resize_exact(max_width, (height as u32).max(1), FilterType::Triangle)
    } else {
        decoded
    };

    // アルファ・グレースケール・16bit等はすべて RGB8 へ
    let rgb = decoded.to_rgb8();
    let (pixel_width, pixel_height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality())
        .encode_image(&rgb)
        .map_err(|e| ReportError::AssetDecode(format!("JPEGエンコード失敗: {}", e)))?;

    Ok(NormalizedPhoto {
        jpeg,
        rgb,
        pixel_width,
        pixel_height,
        display_width_mm,
        display_height_mm,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// テスト用PNG（半透明）
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([30, 120, 200, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .expect("PNGエンコード失敗");
        buf.into_inner()
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("HIGH".parse::<PhotoQuality>().unwrap(), PhotoQuality::High);
        assert_eq!("l".parse::<PhotoQuality>().unwrap(), PhotoQuality::Low);
        assert!("best".parse::<PhotoQuality>().is_err());
    }

    #[test]
    fn test_normalize_png_with_alpha_to_jpeg() {
        let photo = normalize(&png_bytes(40, 30), PhotoQuality::Medium).unwrap();
        assert_eq!(&photo.jpeg[..2], &[0xFF, 0xD8]); // JPEG SOI
        assert_eq!((photo.pixel_width, photo.pixel_height), (40, 30));
        assert_eq!(photo.rgb.as_raw().len(), 40 * 30 * 3);
    }

    #[test]
    fn test_normalize_downsizes_pixels() {
        let photo = normalize(&png_bytes(1000, 500), PhotoQuality::Low).unwrap();
        assert_eq!(photo.pixel_width, 500);
        assert_eq!(photo.pixel_height, 250);
    }

    #[test]
    fn test_display_size_within_bounds() {
        for (w, h) in [(40, 30), (30, 40), (10, 90), (90, 10)] {
            let photo = normalize(&png_bytes(w, h), PhotoQuality::Medium).unwrap();
            assert!(photo.display_width_mm <= PHOTO_MAX_WIDTH_MM + 1e-3);
            assert!(photo.display_height_mm <= PHOTO_MAX_HEIGHT_MM + 1e-3);
            let input = w as f32 / h as f32;
            let output = photo.display_width_mm / photo.display_height_mm;
            assert!((input - output).abs() < 1e-3, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_extreme_aspect_keeps_source_ratio() {
        // 縮小後の画素は 500x2 / 500x1 になるが、表示比率は元画像のまま
        for (w, h, pixel_h) in [(1000, 3, 2), (2000, 3, 1)] {
            let photo = normalize(&png_bytes(w, h), PhotoQuality::Low).unwrap();
            assert_eq!((photo.pixel_width, photo.pixel_height), (500, pixel_h));
            let input = w as f32 / h as f32;
            let output = photo.display_width_mm / photo.display_height_mm;
            assert!((input - output).abs() / input < 1e-3, "{}x{}: {}", w, h, output);
            assert!((photo.display_width_mm - PHOTO_MAX_WIDTH_MM).abs() < 1e-3);
        }
    }

    #[test]
    fn test_downsized_height_is_rounded() {
        let photo = normalize(&png_bytes(1000, 999), PhotoQuality::Low).unwrap();
        assert_eq!(photo.pixel_height, 500);
    }

    #[test]
    fn test_normalize_corrupt_bytes() {
        let err = normalize(b"not an image", PhotoQuality::Medium).unwrap_err();
        assert!(matches!(err, ReportError::AssetDecode(_)));
    }
}
