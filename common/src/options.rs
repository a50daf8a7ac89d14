//! フォーム記入オプション

use crate::error::Result;
use crate::field_data::FieldSpec;
use serde::{Deserialize, Serialize};

/// 信頼度しきい値のデフォルト
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// APIに渡す記入オプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOptions {
    pub field_data: FieldSpec,

    /// 0.0-1.0（範囲チェックはしない）
    pub confidence_threshold: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// "0-2" など。書式はサービス側に任せる
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_range: Option<String>,
}

impl FillOptions {
    pub fn new(field_data: FieldSpec) -> Self {
        Self {
            field_data,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            context: None,
            page_range: None,
        }
    }

    /// multipartフォーム用の (キー, 値) 一覧
    ///
    /// 未指定の`context`/`page_range`はキーごと省く。
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>> {
        let mut fields = vec![
            ("field_data", self.field_data.to_json_string()?),
            ("confidence_threshold", self.confidence_threshold.to_string()),
        ];
        if let Some(context) = &self.context {
            fields.push(("context", context.clone()));
        }
        if let Some(page_range) = &self.page_range {
            fields.push(("page_range", page_range.clone()));
        }
        Ok(fields)
    }
}

/// CLI引数からオプションを構築
///
/// 空文字の`context`/`page_range`は未指定として扱う。
pub fn build_options(
    field_data: FieldSpec,
    context: Option<&str>,
    threshold: f64,
    page_range: Option<&str>,
) -> FillOptions {
    FillOptions {
        field_data,
        confidence_threshold: threshold,
        context: context.filter(|c| !c.is_empty()).map(str::to_owned),
        page_range: page_range.filter(|p| !p.is_empty()).map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_data::FieldEntry;

    fn jane() -> FieldSpec {
        let mut spec = FieldSpec::new();
        spec.insert("name", FieldEntry::new("Jane Doe"));
        spec
    }

    #[test]
    fn test_minimal_options_have_only_required_keys() {
        let options = build_options(jane(), None, DEFAULT_CONFIDENCE_THRESHOLD, None);
        let value = serde_json::to_value(&options).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["confidence_threshold", "field_data"]);
        assert_eq!(object["confidence_threshold"], 0.5);
        assert_eq!(object["field_data"]["name"]["value"], "Jane Doe");
    }

    #[test]
    fn test_optional_keys_present_when_given() {
        let options = build_options(jane(), Some("Tax form 2024"), 0.8, Some("0-2"));
        assert_eq!(options.context.as_deref(), Some("Tax form 2024"));
        assert_eq!(options.page_range.as_deref(), Some("0-2"));
        assert_eq!(options.confidence_threshold, 0.8);
    }

    #[test]
    fn test_empty_strings_are_dropped() {
        let options = build_options(jane(), Some(""), 0.5, Some(""));
        assert!(options.context.is_none());
        assert!(options.page_range.is_none());
    }

    #[test]
    fn test_threshold_is_not_clamped() {
        let options = build_options(jane(), None, 1.7, None);
        assert_eq!(options.confidence_threshold, 1.7);
    }

    #[test]
    fn test_new_uses_default_threshold() {
        assert_eq!(FillOptions::new(jane()).confidence_threshold, 0.5);
    }

    #[test]
    fn test_form_fields() {
        let options = build_options(jane(), None, 0.5, Some("1"));
        let fields = options.form_fields().unwrap();
        assert_eq!(
            fields,
            vec![
                ("field_data", r#"{"name":{"value":"Jane Doe"}}"#.to_string()),
                ("confidence_threshold", "0.5".to_string()),
                ("page_range", "1".to_string()),
            ]
        );
    }
}
