use serde::Deserialize;

use super::validator::{FieldValidator, ValidationOutcome};

/// How a field's value is presented. The core never branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn and(self, other: Validity) -> Validity {
        if self.is_valid() && other.is_valid() {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }
}

/// Caller-supplied description of one input slot.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub label: String,
    pub initial_value: String,
    pub kind: FieldKind,
    pub validator: Option<FieldValidator>,
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            initial_value: String::new(),
            kind: FieldKind::Text,
            validator: None,
        }
    }

    pub fn password(label: impl Into<String>) -> Self {
        Self::new(label).with_kind(FieldKind::Password)
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_validator(mut self, validator: FieldValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FieldState {
    pub(crate) label: String,
    pub(crate) kind: FieldKind,
    pub(crate) value: String,
    pub(crate) validity: Validity,
    pub(crate) reason: Option<String>,
    validator: Option<FieldValidator>,
}

impl FieldState {
    pub(crate) fn from_descriptor(descriptor: FieldDescriptor) -> Self {
        let FieldDescriptor {
            label,
            initial_value,
            kind,
            validator,
        } = descriptor;
        let mut state = Self {
            label,
            kind,
            value: initial_value,
            validity: Validity::Valid,
            reason: None,
            validator,
        };
        state.revalidate();
        state
    }

    pub(crate) fn set_value(&mut self, value: String) -> Validity {
        self.value = value;
        self.revalidate()
    }

    fn revalidate(&mut self) -> Validity {
        let outcome = match &self.validator {
            Some(validator) => validator.check(&self.value),
            None => ValidationOutcome::Valid,
        };
        tracing::trace!(label = %self.label, ?outcome, "field validated");
        match outcome {
            ValidationOutcome::Valid => {
                self.validity = Validity::Valid;
                self.reason = None;
            }
            ValidationOutcome::Invalid(reason) => {
                self.validity = Validity::Invalid;
                self.reason = Some(reason);
            }
        }
        self.validity
    }

    pub(crate) fn view(&self) -> FieldView<'_> {
        FieldView {
            label: &self.label,
            kind: self.kind,
            value: &self.value,
            validity: self.validity,
            reason: self.reason.as_deref(),
        }
    }
}

/// Read-only snapshot of a field for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub label: &'a str,
    pub kind: FieldKind,
    pub value: &'a str,
    pub validity: Validity,
    pub reason: Option<&'a str>,
}

impl FieldView<'_> {
    /// Value as it should be shown; password text is masked one bullet per character.
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Text => self.value.to_string(),
            FieldKind::Password => "•".repeat(self.value.chars().count()),
        }
    }
}
