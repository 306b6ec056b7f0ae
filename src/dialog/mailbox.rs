use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::{Duration, Instant},
};

use super::{
    controller::{CloseReason, FormDialogController, Transition},
    host::DialogHost,
};

/// Interaction events a dialog reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSignal {
    ValueChanged { index: usize, value: String },
    Confirm,
    Cancel,
    Dismiss,
}

/// Queue that serializes signals from any number of threads onto the thread owning the
/// controller.
#[derive(Debug)]
pub struct DialogMailbox {
    tx: Sender<DialogSignal>,
    rx: Receiver<DialogSignal>,
}

impl Default for DialogMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogMailbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> DialogHandle {
        DialogHandle {
            tx: self.tx.clone(),
        }
    }

    /// Applies every queued signal without blocking. Returns the transitions in arrival order.
    pub fn pump<H: DialogHost>(
        &self,
        controller: &mut FormDialogController<H>,
    ) -> Vec<Transition> {
        self.rx
            .try_iter()
            .map(|signal| controller.handle(signal))
            .collect()
    }

    /// Applies signals as they arrive until the dialog closes or `timeout` elapses.
    pub fn run_until_closed<H: DialogHost>(
        &self,
        controller: &mut FormDialogController<H>,
        timeout: Duration,
    ) -> Option<CloseReason> {
        let deadline = Instant::now() + timeout;
        while controller.is_open() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(signal) => {
                    if let Transition::Closed(reason) = controller.handle(signal) {
                        return Some(reason);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
        None
    }
}

/// Cloneable, `Send` handle for posting signals into a [`DialogMailbox`].
#[derive(Debug, Clone)]
pub struct DialogHandle {
    tx: Sender<DialogSignal>,
}

impl DialogHandle {
    /// Returns `false` once the mailbox is gone.
    pub fn send(&self, signal: DialogSignal) -> bool {
        self.tx.send(signal).is_ok()
    }

    pub fn value_changed(&self, index: usize, value: impl Into<String>) -> bool {
        self.send(DialogSignal::ValueChanged {
            index,
            value: value.into(),
        })
    }

    pub fn confirm(&self) -> bool {
        self.send(DialogSignal::Confirm)
    }

    pub fn cancel(&self) -> bool {
        self.send(DialogSignal::Cancel)
    }

    pub fn dismiss(&self) -> bool {
        self.send(DialogSignal::Dismiss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialog::{DialogOptions, HeadlessHost, result_channel},
        form::{FieldDescriptor, FieldValidator, Validity},
    };

    #[test]
    fn pump_applies_signals_in_order() {
        let mailbox = DialogMailbox::new();
        let handle = mailbox.handle();
        let (sender, receiver) = result_channel();
        let mut dialog = FormDialogController::new(
            DialogOptions::default(),
            vec![FieldDescriptor::new("code").with_validator(FieldValidator::equals("abc", "no"))],
            sender,
            HeadlessHost::new(),
        );

        handle.confirm();
        handle.value_changed(0, "abc");
        handle.confirm();
        handle.cancel();

        let transitions = mailbox.pump(&mut dialog);
        assert_eq!(
            transitions,
            vec![
                Transition::Ignored,
                Transition::Revalidated(Validity::Valid),
                Transition::Closed(CloseReason::Confirmed),
                Transition::Ignored,
            ]
        );
        assert_eq!(receiver.try_recv(), Some(true));
        assert_eq!(receiver.try_recv(), None);
    }

    #[test]
    fn run_until_closed_times_out_without_signals() {
        let mailbox = DialogMailbox::new();
        let (sender, receiver) = result_channel();
        let mut dialog = FormDialogController::new(
            DialogOptions::default(),
            Vec::new(),
            sender,
            HeadlessHost::new(),
        );
        let closed = mailbox.run_until_closed(&mut dialog, Duration::from_millis(20));
        assert_eq!(closed, None);
        assert!(dialog.is_open());
        assert_eq!(receiver.try_recv(), None);
    }
}
