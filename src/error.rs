use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormFillError {
    #[error("DATALAB_API_KEY not found. Set it in .env or as environment variable.")]
    MissingApiKey,

    #[error("Form file not found: {0}")]
    FormNotFound(String),

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Request {request_id} did not complete after {polls} polls")]
    Timeout { request_id: String, polls: u32 },

    #[error("Async runtime error: {0}")]
    Runtime(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] form_fill_common::Error),
}

pub type Result<T> = std::result::Result<T, FormFillError>;
