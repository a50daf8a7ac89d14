//! 非同期クライアント
//!
//! スコープ付きリソースとして扱う。`close()`で明示的に解放し、
//! 呼ばれずにスコープを抜けた場合は`Drop`で解放する。解放は必ず1回だけ。

use super::{
    evaluate_poll, parse_body, poll_target, ClientSettings, FormSource, PollOutcome, UploadFile,
    API_KEY_HEADER,
};
use crate::error::{FormFillError, Result};
use form_fill_common::{FillOptions, FillResult, SubmitResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 解放回数の観測用ハンドル
#[derive(Debug, Clone, Default)]
pub struct ReleaseTracker(Arc<AtomicUsize>);

impl ReleaseTracker {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct AsyncDatalabClient {
    http: Option<Client>,
    settings: ClientSettings,
    tracker: ReleaseTracker,
}

impl AsyncDatalabClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder().build()?;
        log::debug!("async client opened");
        Ok(Self {
            http: Some(http),
            settings,
            tracker: ReleaseTracker::default(),
        })
    }

    pub fn release_tracker(&self) -> ReleaseTracker {
        self.tracker.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// フォーム記入を実行し、完了まで待つ
    pub async fn fill(&self, source: &FormSource, options: &FillOptions) -> Result<FillResult> {
        let http = self.http()?;
        let form = build_form(source, options)?;

        log::debug!("POST {}", self.settings.fill_url());
        let response = http
            .post(self.settings.fill_url())
            .header(API_KEY_HEADER, &self.settings.api_key)
            .multipart(form)
            .send()
            .await?;
        let submit: SubmitResponse = read_json(response).await?;

        let (request_id, check_url) = poll_target(&self.settings, submit)?;
        log::info!("request submitted: {}", request_id);

        for attempt in 1..=self.settings.max_polls {
            let response = http
                .get(&check_url)
                .header(API_KEY_HEADER, &self.settings.api_key)
                .send()
                .await?;
            let result: FillResult = read_json(response).await?;
            log::debug!("poll {} [{}]: {}", attempt, request_id, result.status);

            match evaluate_poll(&request_id, result)? {
                PollOutcome::Done(result) => return Ok(result),
                PollOutcome::Pending => tokio::time::sleep(self.settings.poll_interval).await,
            }
        }

        Err(FormFillError::Timeout {
            request_id,
            polls: self.settings.max_polls,
        })
    }

    /// 明示的に解放
    pub fn close(mut self) {
        self.release();
    }

    fn http(&self) -> Result<&Client> {
        self.http
            .as_ref()
            .ok_or_else(|| FormFillError::Api("client is already closed".to_string()))
    }

    fn release(&mut self) {
        if self.http.take().is_some() {
            self.tracker.record();
            log::debug!("async client closed");
        }
    }
}

impl Drop for AsyncDatalabClient {
    fn drop(&mut self) {
        self.release();
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    parse_body(status, &body)
}

fn build_form(source: &FormSource, options: &FillOptions) -> Result<Form> {
    let mut form = Form::new();
    for (key, value) in options.form_fields()? {
        form = form.text(key, value);
    }

    form = match source {
        FormSource::Url(url) => form.text("file_url", url.clone()),
        FormSource::Path(path) => {
            let upload = UploadFile::read(path)?;
            let part = Part::bytes(upload.bytes)
                .file_name(upload.file_name)
                .mime_str(upload.mime)?;
            form.part("file", part)
        }
    };
    Ok(form)
}
