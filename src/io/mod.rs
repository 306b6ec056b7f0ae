mod format;
mod input;

pub use format::DocumentFormat;
pub use input::{FieldSpec, FormDocument, ValidationRule, parse_form_document};
