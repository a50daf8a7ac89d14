//! Datalab API クライアント
//!
//! 処理の流れ:
//! 1. `POST /api/v1/fill` にフォームと記入オプションを送信
//! 2. 返ってきた `request_check_url` を完了までポーリング
//!
//! 同期版（blocking）と非同期版で送受信以外のロジックを共有する。

mod async_client;
mod blocking;

pub use async_client::{AsyncDatalabClient, ReleaseTracker};
pub use blocking::DatalabClient;

use crate::config::Config;
use crate::error::{FormFillError, Result};
use form_fill_common::{FillResult, SubmitResponse};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-Api-Key";
const FILL_ENDPOINT: &str = "/api/v1/fill";

/// 記入対象フォームの指定方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSource {
    Url(String),
    Path(PathBuf),
}

impl FormSource {
    /// `http://` / `https://` で始まればURL、それ以外はローカルパス
    ///
    /// 単純な前方一致のみ（URLとしての妥当性は見ない）。
    pub fn classify(form: &str) -> Self {
        if form.starts_with("http://") || form.starts_with("https://") {
            FormSource::Url(form.to_string())
        } else {
            FormSource::Path(PathBuf::from(form))
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, FormSource::Url(_))
    }
}

/// クライアント共通設定
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub max_polls: u32,
    pub poll_interval: Duration,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = Config::default();
        Self {
            api_key: api_key.into(),
            base_url: defaults.base_url,
            max_polls: defaults.max_polls,
            poll_interval: defaults.poll_interval,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            api_key: config.api_key()?.to_string(),
            base_url: config.base_url.clone(),
            max_polls: config.max_polls,
            poll_interval: config.poll_interval,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_polling(mut self, max_polls: u32, poll_interval: Duration) -> Self {
        self.max_polls = max_polls;
        self.poll_interval = poll_interval;
        self
    }

    pub fn fill_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), FILL_ENDPOINT)
    }
}

/// アップロードするローカルファイル
pub(crate) struct UploadFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

impl UploadFile {
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FormFillError::FormNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "form".to_string());

        Ok(Self {
            bytes,
            mime: mime_for(path),
            file_name,
        })
    }
}

/// 拡張子からMIMEタイプを推定
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// HTTPステータスとボディを検査してJSONとして解釈
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(FormFillError::Http {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// 受付レスポンスからポーリング先を決定
pub(crate) fn poll_target(settings: &ClientSettings, submit: SubmitResponse) -> Result<(String, String)> {
    if !submit.success {
        return Err(FormFillError::Api(
            submit.error.unwrap_or_else(|| "request was rejected".to_string()),
        ));
    }
    let request_id = submit
        .request_id
        .ok_or_else(|| FormFillError::Api("response has no request_id".to_string()))?;
    let check_url = submit
        .request_check_url
        .unwrap_or_else(|| format!("{}/{}", settings.fill_url(), request_id));

    Ok((request_id, check_url))
}

/// ポーリング1回分の判定結果
pub(crate) enum PollOutcome {
    Done(FillResult),
    Pending,
}

pub(crate) fn evaluate_poll(request_id: &str, mut result: FillResult) -> Result<PollOutcome> {
    if result.is_complete() {
        result.request_id.get_or_insert_with(|| request_id.to_string());
        return Ok(PollOutcome::Done(result));
    }
    if result.is_failed() || (!result.success && result.error.is_some()) {
        return Err(FormFillError::Api(format!(
            "Processing failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        )));
    }
    Ok(PollOutcome::Pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_https_url() {
        let source = FormSource::classify("https://example.com/report.pdf");
        assert_eq!(source, FormSource::Url("https://example.com/report.pdf".into()));
        assert!(source.is_url());
    }

    #[test]
    fn test_classify_http_url() {
        assert!(FormSource::classify("http://example.com/form").is_url());
    }

    #[test]
    fn test_classify_local_path() {
        assert_eq!(
            FormSource::classify("report.pdf"),
            FormSource::Path(PathBuf::from("report.pdf"))
        );
    }

    #[test]
    fn test_classify_is_prefix_only() {
        // 大文字やftpはURL扱いしない
        assert!(!FormSource::classify("HTTPS://example.com/a.pdf").is_url());
        assert!(!FormSource::classify("ftp://example.com/a.pdf").is_url());
        // 前方一致なのでこれはURL扱い
        assert!(FormSource::classify("http://weird").is_url());
    }

    #[test]
    fn test_fill_url_trims_slash() {
        let settings = ClientSettings::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(settings.fill_url(), "http://localhost:8080/api/v1/fill");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_parse_body_http_error() {
        let err = parse_body::<SubmitResponse>(401, "unauthorized").unwrap_err();
        assert!(matches!(err, FormFillError::Http { status: 401, .. }));
    }

    #[test]
    fn test_poll_target_rejected() {
        let settings = ClientSettings::new("key");
        let submit = SubmitResponse {
            success: false,
            error: Some("bad file".into()),
            ..Default::default()
        };
        let err = poll_target(&settings, submit).unwrap_err();
        assert_eq!(err.to_string(), "API error: bad file");
    }

    #[test]
    fn test_poll_target_fallback_url() {
        let settings = ClientSettings::new("key").with_base_url("http://host");
        let submit = SubmitResponse {
            success: true,
            request_id: Some("abc".into()),
            ..Default::default()
        };
        let (id, url) = poll_target(&settings, submit).unwrap();
        assert_eq!(id, "abc");
        assert_eq!(url, "http://host/api/v1/fill/abc");
    }

    #[test]
    fn test_evaluate_poll() {
        let pending = FillResult {
            status: "processing".into(),
            success: true,
            ..Default::default()
        };
        assert!(matches!(evaluate_poll("r1", pending), Ok(PollOutcome::Pending)));

        let done = FillResult {
            status: "complete".into(),
            success: true,
            ..Default::default()
        };
        match evaluate_poll("r1", done) {
            Ok(PollOutcome::Done(result)) => assert_eq!(result.request_id.as_deref(), Some("r1")),
            _ => panic!("expected completed result"),
        }

        let failed = FillResult {
            status: "failed".into(),
            error: Some("unreadable".into()),
            ..Default::default()
        };
        let err = evaluate_poll("r1", failed).err().unwrap();
        assert_eq!(err.to_string(), "API error: Processing failed: unreadable");
    }
}
