//! APIレスポンスの型定義
//!
//! - SubmitResponse: リクエスト受付時のレスポンス
//! - FillResult: 処理完了時の最終結果

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// `null` を欠損と同じくデフォルト値として扱う
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 受付レスポンス（ポーリング先URLを含む）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    pub request_id: Option<String>,
    pub request_check_url: Option<String>,
    pub error: Option<String>,
}

/// フォーム記入結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillResult {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,

    /// "processing" / "complete" / "failed"
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    pub output_format: Option<String>,

    /// 記入済みドキュメント（Base64）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_base64: Option<String>,

    pub page_count: Option<u32>,

    /// 記入できたフィールド数
    pub fields_filled: Option<u32>,

    /// フォーム上で見つからなかったフィールド名
    #[serde(deserialize_with = "null_as_default")]
    pub fields_not_found: Vec<String>,

    pub runtime: Option<f64>,

    pub error: Option<String>,

    pub request_id: Option<String>,
}

impl FillResult {
    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }

    /// Base64ペイロードをデコード
    pub fn output_bytes(&self) -> Result<Vec<u8>> {
        let encoded = self.output_base64.as_deref().ok_or(Error::MissingOutput)?;
        Ok(STANDARD.decode(encoded.trim())?)
    }

    /// 記入済みドキュメントをファイルに保存
    pub fn save_output(&self, path: &Path) -> Result<()> {
        let bytes = self.output_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
