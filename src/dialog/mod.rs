mod completion;
mod controller;
mod host;
mod mailbox;
mod options;

pub use completion::{CompletionHandler, ResultReceiver, ResultSender, result_channel};
pub use controller::{CloseReason, FormDialogController, Transition};
pub use host::{DialogHost, HeadlessHost};
pub use mailbox::{DialogHandle, DialogMailbox, DialogSignal};
pub use options::DialogOptions;
