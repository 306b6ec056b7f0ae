use serde::Deserialize;
use serde_json::Value;

use crate::{
    dialog::DialogOptions,
    form::{FieldDescriptor, FieldKind, FieldValidator, FormError, FormResult},
};

use super::DocumentFormat;

/// Declarative description of a form dialog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub confirm: Option<String>,
    #[serde(default)]
    pub dismiss: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub validate: Option<ValidationRule>,
}

/// Built-in validators a document can reference. A rule object names exactly one of
/// `pattern`, `equals`, `non_empty` or `schema`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawRule")]
pub enum ValidationRule {
    Pattern {
        pattern: String,
        reason: Option<String>,
    },
    Equals {
        equals: String,
        reason: Option<String>,
    },
    NonEmpty {
        non_empty: bool,
        reason: Option<String>,
    },
    Schema {
        schema: Value,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    equals: Option<String>,
    #[serde(default)]
    non_empty: Option<bool>,
    #[serde(default)]
    schema: Option<Value>,
    #[serde(default)]
    reason: Option<String>,
}

impl TryFrom<RawRule> for ValidationRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let RawRule {
            pattern,
            equals,
            non_empty,
            schema,
            reason,
        } = raw;
        match (pattern, equals, non_empty, schema) {
            (Some(pattern), None, None, None) => Ok(ValidationRule::Pattern { pattern, reason }),
            (None, Some(equals), None, None) => Ok(ValidationRule::Equals { equals, reason }),
            (None, None, Some(non_empty), None) => {
                Ok(ValidationRule::NonEmpty { non_empty, reason })
            }
            (None, None, None, Some(schema)) => match reason {
                None => Ok(ValidationRule::Schema { schema }),
                Some(_) => {
                    Err("`reason` is not used with `schema`; the schema error is shown".into())
                }
            },
            (None, None, None, None) => {
                Err("rule needs one of `pattern`, `equals`, `non_empty` or `schema`".into())
            }
            _ => {
                Err("rule must use only one of `pattern`, `equals`, `non_empty` or `schema`".into())
            }
        }
    }
}

impl ValidationRule {
    fn compile(&self, label: &str) -> FormResult<Option<FieldValidator>> {
        let validator = match self {
            ValidationRule::Pattern { pattern, reason } => {
                let reason = reason
                    .clone()
                    .unwrap_or_else(|| format!("must match {pattern}"));
                FieldValidator::regex(pattern, reason).map_err(|source| {
                    FormError::InvalidPattern {
                        label: label.to_string(),
                        source,
                    }
                })?
            }
            ValidationRule::Equals { equals, reason } => {
                let reason = reason
                    .clone()
                    .unwrap_or_else(|| format!("only accepts '{equals}'"));
                FieldValidator::equals(equals.clone(), reason)
            }
            ValidationRule::NonEmpty { non_empty, reason } => {
                if !non_empty {
                    return Ok(None);
                }
                let reason = reason
                    .clone()
                    .unwrap_or_else(|| "value is required".to_string());
                FieldValidator::non_empty(reason)
            }
            ValidationRule::Schema { schema } => {
                FieldValidator::json_schema(schema).map_err(|err| FormError::InvalidSchema {
                    label: label.to_string(),
                    message: err.to_string(),
                })?
            }
        };
        Ok(Some(validator))
    }
}

impl FormDocument {
    pub fn options(&self) -> DialogOptions {
        let mut options = DialogOptions::default();
        if let Some(title) = &self.title {
            options = options.with_title(title.clone());
        }
        if let Some(confirm) = &self.confirm {
            options = options.with_confirm_label(confirm.clone());
        }
        if let Some(dismiss) = &self.dismiss {
            options = options.with_dismiss_label(dismiss.clone());
        }
        options
    }

    /// Compiles every field into a descriptor, failing on the first bad validator.
    pub fn descriptors(&self) -> FormResult<Vec<FieldDescriptor>> {
        self.fields
            .iter()
            .map(|spec| {
                let mut descriptor = FieldDescriptor::new(spec.label.clone())
                    .with_initial_value(spec.value.clone())
                    .with_kind(spec.kind);
                if let Some(rule) = &spec.validate
                    && let Some(validator) = rule.compile(&spec.label)?
                {
                    descriptor = descriptor.with_validator(validator);
                }
                Ok(descriptor)
            })
            .collect()
    }
}

/// Parse a form document in any supported format.
pub fn parse_form_document(contents: &str, format: DocumentFormat) -> FormResult<FormDocument> {
    let parse_error = |message: String| FormError::Parse {
        format: format.to_string(),
        message,
    };
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(contents).map_err(|err| parse_error(err.to_string()))
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str(contents).map_err(|err| parse_error(err.to_string()))
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            toml::from_str(contents).map_err(|err| parse_error(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Validity;
    use crate::form::FieldValidationAggregator;

    const LOGIN: &str = r#"{
        "title": "Sign in",
        "confirm": "Log in",
        "fields": [
            {"label": "User", "validate": {"pattern": "^[a-z]+$", "reason": "lowercase only"}},
            {"label": "Password", "kind": "password", "validate": {"non_empty": true}},
            {"label": "Code", "value": "abc", "validate": {"equals": "abc"}},
            {"label": "Note"}
        ]
    }"#;

    #[test]
    fn parses_json_documents() {
        let document = parse_form_document(LOGIN, DocumentFormat::Json).unwrap();
        let options = document.options();
        assert_eq!(options.title, "Sign in");
        assert_eq!(options.confirm_label, "Log in");
        assert_eq!(options.dismiss_label, "Cancel");
        assert_eq!(document.fields.len(), 4);
        assert_eq!(document.fields[1].kind, FieldKind::Password);
    }

    #[test]
    fn compiled_rules_drive_validity() {
        let document = parse_form_document(LOGIN, DocumentFormat::Json).unwrap();
        let mut aggregator = FieldValidationAggregator::new(document.descriptors().unwrap());
        assert_eq!(aggregator.invalid_count(), 2);
        assert_eq!(aggregator.field(0).unwrap().reason, Some("lowercase only"));
        assert_eq!(aggregator.field(1).unwrap().reason, Some("value is required"));
        aggregator.on_value_changed(0, "alice");
        assert_eq!(aggregator.on_value_changed(1, "pw"), Validity::Valid);
        aggregator.on_value_changed(2, "abd");
        assert_eq!(aggregator.field(2).unwrap().reason, Some("only accepts 'abc'"));
    }

    #[test]
    fn bad_pattern_names_the_field() {
        let raw = r#"{"fields": [{"label": "Broken", "validate": {"pattern": "("}}]}"#;
        let document = parse_form_document(raw, DocumentFormat::Json).unwrap();
        let err = document.descriptors().unwrap_err();
        assert!(matches!(err, FormError::InvalidPattern { ref label, .. } if label == "Broken"));
    }

    #[test]
    fn mixed_or_empty_rules_are_rejected() {
        for rule in [
            r#"{"pattern": "x", "equals": "abc"}"#,
            r#"{"non_empty": true, "schema": {"type": "string"}}"#,
            r#"{"reason": "nothing to check"}"#,
            r#"{"equals": "abc", "colour": "blue"}"#,
        ] {
            let raw = format!(r#"{{"fields": [{{"label": "Mixed", "validate": {rule}}}]}}"#);
            let err = parse_form_document(&raw, DocumentFormat::Json).unwrap_err();
            assert!(matches!(err, FormError::Parse { .. }), "accepted {rule}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = r#"{"fields": [], "colour": "blue"}"#;
        let err = parse_form_document(raw, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, FormError::Parse { .. }));
    }

    #[test]
    fn schema_rules_compile() {
        let raw = r#"{"fields": [{"label": "Port", "value": "80",
            "validate": {"schema": {"type": "string", "pattern": "^[0-9]{4,5}$"}}}]}"#;
        let document = parse_form_document(raw, DocumentFormat::Json).unwrap();
        let aggregator = FieldValidationAggregator::new(document.descriptors().unwrap());
        assert_eq!(aggregator.aggregate(), Validity::Invalid);
    }

    #[test]
    fn disabled_non_empty_rule_adds_no_validator() {
        let raw = r#"{"fields": [{"label": "Optional", "validate": {"non_empty": false}}]}"#;
        let document = parse_form_document(raw, DocumentFormat::Json).unwrap();
        let descriptors = document.descriptors().unwrap();
        assert!(descriptors[0].validator.is_none());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parses_yaml_documents() {
        let raw = "title: Yaml\nfields:\n  - label: Name\n    validate:\n      non_empty: true\n";
        let document = parse_form_document(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(document.title.as_deref(), Some("Yaml"));
        assert!(document.descriptors().unwrap()[0].validator.is_some());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parses_toml_documents() {
        let raw = "title = \"Toml\"\n\n[[fields]]\nlabel = \"Name\"\nkind = \"password\"\n";
        let document = parse_form_document(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(document.fields[0].kind, FieldKind::Password);
    }
}
