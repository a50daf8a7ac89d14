//! Form Fill Common Library
//!
//! CLIとAPIクライアントで共有される型とユーティリティ

pub mod error;
pub mod field_data;
pub mod options;
pub mod types;

pub use error::{Error, Result};
pub use field_data::{load_field_data, FieldEntry, FieldSpec};
pub use options::{build_options, FillOptions, DEFAULT_CONFIDENCE_THRESHOLD};
pub use types::{FillResult, SubmitResponse};
