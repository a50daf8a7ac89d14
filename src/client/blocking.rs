//! 同期（blocking）クライアント

use super::{
    evaluate_poll, parse_body, poll_target, ClientSettings, FormSource, PollOutcome, UploadFile,
    API_KEY_HEADER,
};
use crate::error::{FormFillError, Result};
use form_fill_common::{FillOptions, FillResult, SubmitResponse};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};

pub struct DatalabClient {
    http: Client,
    settings: ClientSettings,
}

impl DatalabClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// フォーム記入を実行し、完了まで待つ
    pub fn fill(&self, source: &FormSource, options: &FillOptions) -> Result<FillResult> {
        let form = build_form(source, options)?;

        log::debug!("POST {}", self.settings.fill_url());
        let response = self
            .http
            .post(self.settings.fill_url())
            .header(API_KEY_HEADER, &self.settings.api_key)
            .multipart(form)
            .send()?;
        let submit: SubmitResponse = read_json(response)?;

        let (request_id, check_url) = poll_target(&self.settings, submit)?;
        log::info!("request submitted: {}", request_id);

        self.poll(&request_id, &check_url)
    }

    fn poll(&self, request_id: &str, check_url: &str) -> Result<FillResult> {
        for attempt in 1..=self.settings.max_polls {
            let response = self
                .http
                .get(check_url)
                .header(API_KEY_HEADER, &self.settings.api_key)
                .send()?;
            let result: FillResult = read_json(response)?;
            log::debug!("poll {} [{}]: {}", attempt, request_id, result.status);

            match evaluate_poll(request_id, result)? {
                PollOutcome::Done(result) => return Ok(result),
                PollOutcome::Pending => std::thread::sleep(self.settings.poll_interval),
            }
        }

        Err(FormFillError::Timeout {
            request_id: request_id.to_string(),
            polls: self.settings.max_polls,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text()?;
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
