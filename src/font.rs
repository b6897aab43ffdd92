//! PDF用の中文フォント
//!
//! 初回使用時に一度だけ読み込み、以降はプロセス内で共有する。
//! ローカルキャッシュ → ダウンロード の順に試し、どちらも失敗したら標準フォントへ縮退する。
//! 縮退はエラーにせず、呼び出し側へ警告として伝える。

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 既定のフォント取得元（Noto Sans TC）
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/google/fonts/raw/main/ofl/notosanstc/NotoSansTC%5Bwght%5D.ttf";
/// キャッシュファイル名
pub const FONT_CACHE_FILE_NAME: &str = "NotoSansTC-Regular.ttf";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// ダウンロードサイズ上限
const MAX_FONT_BYTES: u64 = 32 * 1024 * 1024;

/// フォントの取得元
#[derive(Debug, Clone)]
pub struct FontSource {
    /// None ならダウンロードしない
    pub url: Option<String>,
    pub cache_path: PathBuf,
}

/// 読み込み結果
#[derive(Debug, Clone)]
pub enum FontResource {
    Embedded { path: PathBuf, bytes: Vec<u8> },
    /// 標準フォントで代用（中文が表示されない可能性あり）
    Fallback { reason: String },
}

impl FontResource {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FontResource::Fallback { .. })
    }
}

/// 一度だけ初期化されるフォント
#[derive(Debug)]
pub struct FontStore {
    source: FontSource,
    resource: OnceLock<FontResource>,
}

impl FontStore {
    pub fn new(source: FontSource) -> Self {
        Self {
            source,
            resource: OnceLock::new(),
        }
    }

    /// ネットワークを使わない（キャッシュがあれば使う）
    pub fn offline(cache_path: impl Into<PathBuf>) -> Self {
        Self::new(FontSource {
            url: None,
            cache_path: cache_path.into(),
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// フォントを取得（初回のみ読み込み）
    pub fn get(&self) -> &FontResource {
        self.resource.get_or_init(|| load(&self.source))
    }

    /// 読み込み済みか
    pub fn is_initialized(&self) -> bool {
        self.resource.get().is_some()
    }
}

fn load(source: &FontSource) -> FontResource {
    match read_cached(&source.cache_path) {
        Ok(Some(bytes)) => {
            info!(path = %source.cache_path.display(), bytes = bytes.len(), "font loaded from cache");
            return FontResource::Embedded {
                path: source.cache_path.clone(),
                bytes,
            };
        }
        Ok(None) => debug!(path = %source.cache_path.display(), "font cache not found"),
        Err(reason) => warn!(%reason, "font cache unusable"),
    }

    let Some(url) = source.url.as_deref() else {
        return FontResource::Fallback {
            reason: format!("フォントキャッシュがありません: {}", source.cache_path.display()),
        };
    };

    match download(url).and_then(|bytes| store_cache(&source.cache_path, bytes)) {
        Ok(bytes) => {
            info!(url, bytes = bytes.len(), "font downloaded");
            FontResource::Embedded {
                path: source.cache_path.clone(),
                bytes,
            }
        }
        Err(reason) => {
            warn!(url, %reason, "font unavailable, using builtin font");
            FontResource::Fallback { reason }
        }
    }
}

fn read_cached(path: &Path) -> Result<Option<Vec<u8>>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(|e| format!("キャッシュ読み込みエラー: {}", e))?;
    if !looks_like_font(&bytes) {
        return Err(format!("フォント形式ではありません: {}", path.display()));
    }
    Ok(Some(bytes))
}

fn download(url: &str) -> Result<Vec<u8>, String> {
    let response = ureq::get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .call()
        .map_err(|e| format!("フォント取得エラー: {}", e))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_FONT_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("フォント受信エラー: {}", e))?;

    if !looks_like_font(&bytes) {
        return Err(format!("取得したデータがフォント形式ではありません: {}", url));
    }
    Ok(bytes)
}

/// キャッシュ書き込みに失敗してもフォント自体は使う
fn store_cache(path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, String> {
    let written = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(path, &bytes));
    if let Err(e) = written {
        warn!(path = %path.display(), error = %e, "font cache not written");
    }
    Ok(bytes)
}

/// TrueType / OpenType / TTC のシグネチャ
fn looks_like_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_looks_like_font() {
        assert!(looks_like_font(&[0x00, 0x01, 0x00, 0x00, 0x00]));
        assert!(looks_like_font(b"OTTO...."));
        assert!(!looks_like_font(b"<html>"));
        assert!(!looks_like_font(b""));
    }

    #[test]
    fn test_offline_without_cache_falls_back() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = FontStore::offline(dir.path().join(FONT_CACHE_FILE_NAME));
        assert!(!store.is_initialized());
        assert!(store.get().is_degraded());
        assert!(store.is_initialized());
    }

    #[test]
    fn test_cached_font_is_used() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(FONT_CACHE_FILE_NAME);
        std::fs::write(&path, [0x00, 0x01, 0x00, 0x00, 0xAB]).unwrap();

        let store = FontStore::offline(&path);
        match store.get() {
            FontResource::Embedded { bytes, .. } => assert_eq!(bytes.len(), 5),
            other => panic!("キャッシュが使われていない: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_cache_falls_back() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(FONT_CACHE_FILE_NAME);
        std::fs::write(&path, b"<html>404</html>").unwrap();
        assert!(FontStore::offline(&path).get().is_degraded());
    }

    #[test]
    fn test_initialized_once() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(FONT_CACHE_FILE_NAME);
        let store = FontStore::offline(&path);
        assert!(store.get().is_degraded());

        // 後からキャッシュが置かれても結果は変わらない
        std::fs::write(&path, [0x00, 0x01, 0x00, 0x00]).unwrap();
        assert!(store.get().is_degraded());
    }
}
