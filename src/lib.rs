#![deny(rust_2018_idioms)]

pub mod dialog;
pub mod form;
pub mod io;
#[cfg(feature = "tui")]
pub mod tui;

pub use dialog::{
    CloseReason, CompletionHandler, DialogHandle, DialogHost, DialogMailbox, DialogOptions,
    DialogSignal, FormDialogController, HeadlessHost, ResultReceiver, Transition, result_channel,
};
pub use form::{
    FieldDescriptor, FieldKind, FieldValidationAggregator, FieldValidator, FormError, FormResult,
    FormState, ValidationError, ValidationOutcome, Validity,
};
pub use io::{DocumentFormat, FormDocument, parse_form_document};
#[cfg(feature = "tui")]
pub use tui::{FormOutcome, TerminalFormDialog, TerminalHost, run_terminal_dialog};

pub mod prelude {
    pub use super::{
        CloseReason, DialogOptions, FieldDescriptor, FieldValidator, FormDialogController,
        ValidationOutcome, Validity, result_channel,
    };
    #[cfg(feature = "tui")]
    pub use super::{FormOutcome, TerminalFormDialog};
}
