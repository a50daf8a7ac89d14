//! 実行時設定
//!
//! 設定ファイルは持たず、環境変数（と任意の`.env`）だけを参照する。

use crate::error::{FormFillError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "DATALAB_API_KEY";
pub const BASE_URL_ENV: &str = "DATALAB_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://www.datalab.to";

const DEFAULT_MAX_POLLS: u32 = 300;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_polls: u32,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            max_polls: DEFAULT_MAX_POLLS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    /// 環境変数から設定を構築
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            api_key,
            base_url,
            ..Self::default()
        }
    }

    /// APIキーを取得（未設定ならエラー）
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(FormFillError::MissingApiKey)
    }
}

/// `.env`の探索候補（優先順）
///
/// 実行ファイルのディレクトリ → その親 → カレントディレクトリ
pub fn dotenv_candidates(exe_dir: Option<&Path>, cwd: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(".env"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join(".env"));
        }
    }
    if let Some(dir) = cwd {
        candidates.push(dir.join(".env"));
    }
    candidates
}

/// 最初に見つかった`.env`を返す
pub fn find_dotenv(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.is_file())
}

/// `.env`を探して読み込む（ベストエフォート）
///
/// 既存の環境変数は上書きしない。読み込みに失敗しても処理は続行する。
pub fn load_dotenv() -> Option<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    let candidates = dotenv_candidates(exe_dir.as_deref(), cwd.as_deref());

    let path = find_dotenv(&candidates)?;
    match dotenvy::from_path(path) {
        Ok(()) => {
            log::debug!(".env loaded: {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            log::warn!(".env skipped ({}): {}", path.display(), e);
            None
        }
    }
}
