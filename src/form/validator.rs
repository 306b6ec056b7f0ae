use std::{
    cell::Cell,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use jsonschema::validator_for;
use regex::Regex;
use serde_json::Value;

use super::error::ValidationError;

/// Verdict of a single validator run against a field's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationOutcome::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(reason) => Some(reason),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationOutcome::Valid,
            Err(err) => ValidationOutcome::Invalid(err.message),
        }
    }
}

type ValidateFn = dyn Fn(&str) -> ValidationOutcome + Send + Sync;

thread_local! {
    static VALIDATING: Cell<u32> = const { Cell::new(0) };
}

/// Whether the current thread is inside a validator call. Panic hooks use this to leave
/// contained validator faults alone.
#[cfg_attr(not(feature = "tui"), allow(dead_code))]
pub(crate) fn is_validating() -> bool {
    VALIDATING.with(|depth| depth.get() > 0)
}

/// A per-field check, treated as a pure function of the current text.
#[derive(Clone)]
pub struct FieldValidator {
    check: Arc<ValidateFn>,
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator").finish_non_exhaustive()
    }
}

impl FieldValidator {
    pub fn from_fn<F>(check: F) -> Self
    where
        F: Fn(&str) -> ValidationOutcome + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    /// Wraps a `Result`-returning check; any `Err` rejects the value with the error's message.
    pub fn fallible<F, E>(check: F) -> Self
    where
        F: Fn(&str) -> Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::from_fn(move |input| match check(input) {
            Ok(()) => ValidationOutcome::Valid,
            Err(err) => ValidationOutcome::Invalid(err.to_string()),
        })
    }

    /// Accepts values containing a match of `pattern`. Anchor the pattern to require a full match.
    pub fn regex(pattern: &str, reason: impl Into<String>) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        let reason = reason.into();
        Ok(Self::from_fn(move |input| {
            if regex.is_match(input) {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::Invalid(reason.clone())
            }
        }))
    }

    pub fn equals(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        let expected = expected.into();
        let reason = reason.into();
        Self::from_fn(move |input| {
            if input == expected {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::Invalid(reason.clone())
            }
        })
    }

    pub fn non_empty(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::from_fn(move |input| {
            if input.trim().is_empty() {
                ValidationOutcome::Invalid(reason.clone())
            } else {
                ValidationOutcome::Valid
            }
        })
    }

    /// Validates the text, as a JSON string instance, against `schema`.
    pub fn json_schema(schema: &Value) -> Result<Self, jsonschema::ValidationError<'static>> {
        let validator = validator_for(schema)?;
        Ok(Self::from_fn(move |input| {
            let instance = Value::String(input.to_string());
            match validator.iter_errors(&instance).next() {
                None => ValidationOutcome::Valid,
                Some(error) => ValidationOutcome::Invalid(error.to_string()),
            }
        }))
    }

    /// Runs the check. A panicking validator counts as a rejection instead of unwinding into
    /// the dialog owner.
    pub fn check(&self, input: &str) -> ValidationOutcome {
        VALIDATING.with(|depth| depth.set(depth.get() + 1));
        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.check)(input)));
        VALIDATING.with(|depth| depth.set(depth.get() - 1));
        match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "validator panicked".to_string());
                tracing::warn!(%detail, "validator faulted; treating field as invalid");
                ValidationOutcome::Invalid(detail)
            }
        }
    }
}
