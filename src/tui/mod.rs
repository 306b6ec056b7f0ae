mod input;
mod keymap;
mod runtime;
mod terminal;
mod view;

pub use input::{DialogInput, Focus};
pub use runtime::{FormOutcome, TerminalFormDialog, TerminalHost, run_terminal_dialog};
pub use view::{DialogFrame, draw, field_lines};
