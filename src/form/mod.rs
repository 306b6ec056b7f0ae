mod aggregator;
mod error;
mod field;
mod state;
mod validator;

pub use aggregator::FieldValidationAggregator;
pub use error::{FormError, FormResult, ValidationError};
pub use field::{FieldDescriptor, FieldKind, FieldView, Validity};
pub use state::FormState;
pub use validator::{FieldValidator, ValidationOutcome};
#[cfg(feature = "tui")]
pub(crate) use validator::is_validating;
