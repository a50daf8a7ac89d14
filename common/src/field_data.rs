//! フィールドデータ（記入値の定義）
//!
//! 入力JSONの形式:
//! ```json
//! {
//!     "field_name": {
//!         "value": "field value",
//!         "description": "description to help match"
//!     }
//! }
//! ```
//!
//! 読み込み時はJSONとして正しいことだけを確認し、中身はそのまま保持する。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// 1フィールド分の記入値（型付きビュー）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: String,

    /// フィールド照合のヒント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<FieldEntry> for Value {
    fn from(entry: FieldEntry) -> Self {
        let mut record = entry.extra;
        record.insert("value".to_string(), Value::String(entry.value));
        if let Some(description) = entry.description {
            record.insert("description".to_string(), Value::String(description));
        }
        Value::Object(record)
    }
}

/// フィールド名 → 記入値のマップ（JSONそのもの）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec(Value);

impl Default for FieldSpec {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// トップレベルがオブジェクトでなければオブジェクトに置き換える
    pub fn insert(&mut self, name: impl Into<String>, entry: FieldEntry) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.0 {
            map.insert(name.into(), entry.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(name))
    }

    /// `{value, description?}` 形式として読めるフィールドのみ返す
    pub fn entry(&self, name: &str) -> Option<FieldEntry> {
        self.get(name)
            .and_then(|value| FieldEntry::deserialize(value).ok())
    }

    /// フィールド数（トップレベルがオブジェクト以外なら0）
    pub fn len(&self) -> usize {
        self.0.as_object().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    /// APIの`field_data`パラメータ用にJSON文字列化
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl From<Value> for FieldSpec {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// フィールドデータJSONを読み込み
///
/// ファイルが無い場合はIOエラー、JSONが不正な場合はJSONエラーをそのまま返す。
pub fn load_field_data(path: &Path) -> Result<FieldSpec> {
    let content = std::fs::read_to_string(path)?;
    FieldSpec::from_json_str(&content)
}
