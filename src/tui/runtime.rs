use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use indexmap::IndexMap;

use crate::{
    dialog::{
        CloseReason, CompletionHandler, DialogHost, DialogOptions, FormDialogController,
        Transition,
    },
    form::{FieldDescriptor, FormState},
};

use super::{
    input::{DialogInput, Focus},
    keymap,
    terminal::DialogScreen,
    view::DialogFrame,
};

/// [`DialogHost`] backed by the real terminal. Hiding the dialog restores the terminal.
pub struct TerminalHost {
    screen: Option<DialogScreen>,
    options: DialogOptions,
    confirm_enabled: bool,
    help: Option<String>,
}

impl TerminalHost {
    pub fn new() -> Result<Self> {
        Ok(Self {
            screen: Some(DialogScreen::open()?),
            options: DialogOptions::default(),
            confirm_enabled: false,
            help: None,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.screen.is_some()
    }

    fn render(&mut self, form: &FormState, focus: Focus) -> Result<()> {
        let Some(screen) = self.screen.as_mut() else {
            return Ok(());
        };
        let frame_view = DialogFrame {
            options: &self.options,
            fields: form.fields().collect(),
            focus,
            confirm_enabled: self.confirm_enabled,
            help: self.help.as_deref(),
        };
        screen.render(&frame_view)
    }
}

impl DialogHost for TerminalHost {
    fn show(&mut self, options: &DialogOptions) {
        self.options = options.clone();
        self.help = options.show_help.then(keymap::help_text);
    }

    fn set_confirm_enabled(&mut self, enabled: bool) {
        self.confirm_enabled = enabled;
    }

    fn hide(&mut self) {
        self.screen = None;
    }
}

/// Shorthand for `TerminalFormDialog::new(fields).with_options(options).run()`.
pub fn run_terminal_dialog(
    options: DialogOptions,
    fields: impl IntoIterator<Item = FieldDescriptor>,
) -> Result<FormOutcome> {
    TerminalFormDialog::new(fields).with_options(options).run()
}

/// How a terminal dialog ended, with the values it held at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    pub reason: CloseReason,
    pub values: IndexMap<String, String>,
}

impl FormOutcome {
    pub fn confirmed(&self) -> bool {
        self.reason.result()
    }
}

/// Runs a form dialog in the terminal until it is confirmed, cancelled or dismissed.
#[derive(Debug, Clone)]
pub struct TerminalFormDialog {
    options: DialogOptions,
    fields: Vec<FieldDescriptor>,
}

impl TerminalFormDialog {
    pub fn new(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            options: DialogOptions::default(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn with_options(mut self, options: DialogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<FormOutcome> {
        self.run_with(|confirmed: bool| {
            tracing::debug!(confirmed, "terminal dialog finished");
        })
    }

    /// Like [`run`](Self::run), also handing the result to `completion` as the dialog closes.
    pub fn run_with(self, completion: impl CompletionHandler + 'static) -> Result<FormOutcome> {
        let TerminalFormDialog { options, fields } = self;
        let host = TerminalHost::new()?;
        let mut dialog = FormDialogController::new(options, fields, completion, host);
        let mut input = DialogInput::new(dialog.form().field_count());

        let reason = loop {
            let focus = input.focus();
            let (host, form) = dialog.host_and_form();
            host.render(form, focus)?;
            let Event::Key(key) = event::read().context("failed to read terminal event")? else {
                continue;
            };
            if let Transition::Closed(reason) = input.handle_key(&key, &mut dialog) {
                break reason;
            }
        };

        debug_assert!(!dialog.host().is_visible());
        Ok(FormOutcome {
            reason,
            values: dialog.values(),
        })
    }
}
