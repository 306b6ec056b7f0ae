use thiserror::Error;

/// Reason a validator rejected a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failures that can occur while describing a form, before any dialog exists.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("failed to parse {format} form document: {message}")]
    Parse { format: String, message: String },

    #[error("field '{label}': invalid pattern: {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("field '{label}': invalid JSON schema: {message}")]
    InvalidSchema { label: String, message: String },

    #[error("unsupported document format '{0}'")]
    UnsupportedFormat(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
