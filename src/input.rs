//! 提出データの読み込み
//!
//! 提出JSON（基本資料・査核結果・写真パス）を読み込み、`InspectionRecord` を組み立てる。
//! 写真の相対パスはJSONファイルのあるフォルダを基準に解決する。

use crate::error::{Result, SoilAuditError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use soil_audit_common::checklist::item_ids;
use soil_audit_common::types::DEFAULT_PROJECT_NAME;
use soil_audit_common::{
    sections_with_results, CheckResult, InspectionMetadata, InspectionRecord, ItemId, PhotoRecord,
    SiteStatus, Weather,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 提出JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFile {
    pub metadata: InspectionMetadata,
    /// "<区分>-<項目>" → 結果。未指定の項目は「符合」
    #[serde(default)]
    pub results: BTreeMap<ItemId, CheckResult>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    /// このフォルダ直下の画像を説明なしで追加
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub path: PathBuf,
    #[serde(default)]
    pub caption: String,
}

/// 提出JSONを読み込んで検査記録を組み立てる
///
/// 入力チェック（人員名など）は行わない。生成前に `InspectionRecord::validate` を呼ぶこと。
pub fn load_submission(path: &Path) -> Result<InspectionRecord> {
    if !path.exists() {
        return Err(SoilAuditError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let submission: SubmissionFile = serde_json::from_str(&content)?;
    let base = path.parent().unwrap_or(Path::new("."));
    submission.into_record(base)
}

impl SubmissionFile {
    /// 検査記録へ変換（写真パスは `base` 基準）
    pub fn into_record(self, base: &Path) -> Result<InspectionRecord> {
        let results: HashMap<ItemId, CheckResult> = self.results.into_iter().collect();
        let sections = sections_with_results(&results)?;

        let mut photos = Vec::with_capacity(self.photos.len());
        for photo in &self.photos {
            let resolved = resolve(base, &photo.path);
            if !resolved.is_file() {
                return Err(SoilAuditError::FileNotFound(resolved.display().to_string()));
            }
            photos.push(PhotoRecord {
                image: std::fs::read(&resolved)?,
                caption: photo.caption.clone(),
            });
        }

        if let Some(dir) = &self.photo_dir {
            for path in scan_photo_dir(&resolve(base, dir))? {
                photos.push(PhotoRecord {
                    image: std::fs::read(&path)?,
                    caption: String::new(),
                });
            }
        }

        debug!(photos = photos.len(), "submission loaded");
        Ok(InspectionRecord {
            metadata: self.metadata,
            sections,
            photos,
        })
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// フォルダ直下の画像をファイル名順で列挙
pub fn scan_photo_dir(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SoilAuditError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// 空の提出テンプレート（全項目「符合」）
pub fn template(date: NaiveDate) -> SubmissionFile {
    SubmissionFile {
        metadata: InspectionMetadata {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            date,
            inspector: String::new(),
            weather: Weather::Unset,
            status: SiteStatus::Unset,
        },
        results: item_ids().into_iter().map(|id| (id, CheckResult::Pass)).collect(),
        photos: vec![PhotoRef {
            path: PathBuf::from("photos/example.jpg"),
            caption: "照片說明".to_string(),
        }],
        photo_dir: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    const SUBMISSION: &str = r#"{
        "metadata": {
            "projectName": "Test Site",
            "date": "2024-01-01",
            "inspector": "Alice",
            "weather": "sunny",
            "status": "active"
        },
        "results": { "3-2": "fail", "5-1": "not_applicable" },
        "photos": [ { "path": "a.png", "caption": "A池" } ]
    }"#;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.jpg")));
        assert!(is_image_path(Path::new("a.JPG")));
        assert!(is_image_path(Path::new("a.Jpeg")));
        assert!(is_image_path(Path::new("a.png")));
        assert!(!is_image_path(Path::new("a.gif")));
        assert!(!is_image_path(Path::new("readme")));
    }

    #[test]
    fn test_scan_photo_dir_not_found() {
        let result = scan_photo_dir(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(SoilAuditError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_photo_dir_sorted_and_filtered() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in ["c.jpg", "a.PNG", "b.jpeg", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("d.jpg")).unwrap();

        let names: Vec<String> = scan_photo_dir(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);
    }

    #[test]
    fn test_load_submission_resolves_relative_paths() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("a.png"), b"bytes").unwrap();
        let json = dir.path().join("submission.json");
        fs::write(&json, SUBMISSION).unwrap();

        let record = load_submission(&json).unwrap();
        assert_eq!(record.metadata.inspector, "Alice");
        assert_eq!(record.metadata.weather, Weather::Sunny);
        assert_eq!(record.sections[2].items[1].result, CheckResult::Fail);
        assert_eq!(record.sections[4].items[0].result, CheckResult::NotApplicable);
        assert_eq!(record.sections[0].items[0].result, CheckResult::Pass);
        assert_eq!(record.photos.len(), 1);
        assert_eq!(record.photos[0].image, b"bytes");
        assert_eq!(record.photos[0].caption, "A池");
    }

    #[test]
    fn test_missing_photo_is_reported() {
        let dir = tempdir().expect("Failed to create temp dir");
        let json = dir.path().join("submission.json");
        fs::write(&json, SUBMISSION).unwrap();

        let err = load_submission(&json).unwrap_err();
        assert!(matches!(err, SoilAuditError::FileNotFound(ref p) if p.ends_with("a.png")));
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let json = dir.path().join("submission.json");
        fs::write(
            &json,
            r#"{"metadata":{"projectName":"P","date":"2024-01-01","inspector":"A"},"results":{"9-9":"fail"}}"#,
        )
        .unwrap();

        let err = load_submission(&json).unwrap_err();
        assert!(matches!(err, SoilAuditError::Checklist(soil_audit_common::Error::UnknownItem(_))));
    }

    #[test]
    fn test_photo_dir_appended_after_explicit_photos() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("a.png"), b"explicit").unwrap();
        fs::create_dir(dir.path().join("extra")).unwrap();
        fs::write(dir.path().join("extra").join("z.jpg"), b"z").unwrap();
        fs::write(dir.path().join("extra").join("y.jpg"), b"y").unwrap();

        let mut submission: SubmissionFile = serde_json::from_str(SUBMISSION).unwrap();
        submission.photo_dir = Some(PathBuf::from("extra"));
        let record = submission.into_record(dir.path()).unwrap();

        let images: Vec<&[u8]> = record.photos.iter().map(|p| p.image.as_slice()).collect();
        assert_eq!(images, vec![&b"explicit"[..], &b"y"[..], &b"z"[..]]);
        assert_eq!(record.photos[1].caption, "");
    }

    #[test]
    fn test_template_lists_every_item() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let json = serde_json::to_string_pretty(&template(date)).unwrap();
        assert!(json.contains("\"1-1\": \"pass\""));
        assert!(json.contains("\"5-3\": \"pass\""));
        assert!(json.contains("\"2024-05-20\""));
        assert!(!json.contains("photoDir"));

        let parsed: SubmissionFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results.len(), item_ids().len());
    }
}
