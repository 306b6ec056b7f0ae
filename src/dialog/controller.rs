use indexmap::IndexMap;

use crate::form::{FieldDescriptor, FieldView, FormState, Validity};

use super::{
    completion::CompletionHandler, host::DialogHost, mailbox::DialogSignal,
    options::DialogOptions,
};

/// How an open dialog came to be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Confirmed,
    Cancelled,
    Dismissed,
}

impl CloseReason {
    /// The boolean handed to the completion handler.
    pub fn result(self) -> bool {
        matches!(self, CloseReason::Confirmed)
    }
}

/// Effect of one signal on the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Revalidated(Validity),
    Closed(CloseReason),
    Ignored,
}

/// Modal lifecycle around a [`FormState`]: gates confirmation on aggregate validity and
/// delivers exactly one result.
pub struct FormDialogController<H: DialogHost> {
    options: DialogOptions,
    form: FormState,
    host: H,
    confirm_enabled: bool,
    completion: Option<Box<dyn CompletionHandler>>,
}

impl<H: DialogHost> FormDialogController<H> {
    /// Builds the form, validates the initial values and shows the dialog on `host` with the
    /// confirm action already in its correct state.
    pub fn new(
        options: DialogOptions,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
        completion: impl CompletionHandler + 'static,
        mut host: H,
    ) -> Self {
        let form = FormState::new(descriptors);
        let confirm_enabled = form.aggregate().is_valid();
        host.set_confirm_enabled(confirm_enabled);
        host.show(&options);
        tracing::debug!(
            title = %options.title,
            fields = form.field_count(),
            confirm_enabled,
            "form dialog opened"
        );
        Self {
            options,
            form,
            host,
            confirm_enabled,
            completion: Some(Box::new(completion)),
        }
    }

    pub fn handle(&mut self, signal: DialogSignal) -> Transition {
        match signal {
            DialogSignal::ValueChanged { index, value } => self.set_value(index, value),
            DialogSignal::Confirm => self.confirm(),
            DialogSignal::Cancel => self.cancel(),
            DialogSignal::Dismiss => self.dismiss(),
        }
    }

    /// Routes a field edit through validation and updates the confirm action.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> Transition {
        let Some(aggregate) = self.form.apply_value(index, value.into()) else {
            tracing::debug!(index, "value change after close ignored");
            return Transition::Ignored;
        };
        let enabled = aggregate.is_valid();
        if enabled != self.confirm_enabled {
            tracing::debug!(enabled, "confirm action toggled");
        }
        self.confirm_enabled = enabled;
        self.host.set_confirm_enabled(enabled);
        Transition::Revalidated(aggregate)
    }

    /// Closes with `true`, but only while every field is valid.
    pub fn confirm(&mut self) -> Transition {
        if !self.form.is_open() {
            return Transition::Ignored;
        }
        if !self.confirm_enabled {
            tracing::debug!(
                invalid = self.form.error_count(),
                "confirm ignored while form is invalid"
            );
            return Transition::Ignored;
        }
        self.close(CloseReason::Confirmed)
    }

    pub fn cancel(&mut self) -> Transition {
        self.close(CloseReason::Cancelled)
    }

    /// The host went away by other means (window closed, escape key, ...).
    pub fn dismiss(&mut self) -> Transition {
        self.close(CloseReason::Dismissed)
    }

    fn close(&mut self, reason: CloseReason) -> Transition {
        if !self.form.close() {
            tracing::debug!(?reason, "dialog already closed");
            return Transition::Ignored;
        }
        tracing::debug!(?reason, "form dialog closed");
        self.confirm_enabled = false;
        self.host.hide();
        if let Some(completion) = self.completion.take() {
            completion.deliver(reason.result());
        }
        Transition::Closed(reason)
    }

    pub fn is_open(&self) -> bool {
        self.form.is_open()
    }

    pub fn confirm_enabled(&self) -> bool {
        self.confirm_enabled
    }

    pub fn aggregate(&self) -> Validity {
        self.form.aggregate()
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn field(&self, index: usize) -> Option<FieldView<'_>> {
        self.form.field(index)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.form.fields()
    }

    pub fn values(&self) -> IndexMap<String, String> {
        self.form.values()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Mutable host next to a read-only form, for hosts that redraw from the form.
    pub fn host_and_form(&mut self) -> (&mut H, &FormState) {
        (&mut self.host, &self.form)
    }
}

impl<H: DialogHost> Drop for FormDialogController<H> {
    fn drop(&mut self) {
        if self.form.is_open() {
            self.dismiss();
        }
    }
}

impl<H: DialogHost> std::fmt::Debug for FormDialogController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDialogController")
            .field("options", &self.options)
            .field("form", &self.form)
            .field("confirm_enabled", &self.confirm_enabled)
            .field("delivered", &self.completion.is_none())
            .finish_non_exhaustive()
    }
}
