//! Datalab APIを使ったフォーム自動記入ツール
//!
//! フィールド検出・照合・描画はすべてリモートサービス側で行う。
//! このクレートは引数・設定の解決、APIとのやり取り、結果の保存を担当する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fill;
pub mod logging;

pub use form_fill_common::{
    build_options, load_field_data, FieldEntry, FieldSpec, FillOptions, FillResult,
};
