use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    time::Duration,
};

/// Receives the single boolean outcome of a dialog.
///
/// `true` means the dialog was confirmed while every field was valid; `false` covers cancel,
/// external dismissal and any other way the dialog went away.
pub trait CompletionHandler: Send {
    fn deliver(self: Box<Self>, result: bool);
}

impl<F> CompletionHandler for F
where
    F: FnOnce(bool) + Send,
{
    fn deliver(self: Box<Self>, result: bool) {
        (*self)(result)
    }
}

/// Sending half of [`result_channel`]. Never blocks the dialog owner.
#[derive(Debug)]
pub struct ResultSender {
    tx: Sender<bool>,
}

impl CompletionHandler for ResultSender {
    fn deliver(self: Box<Self>, result: bool) {
        if self.tx.send(result).is_err() {
            tracing::debug!(result, "dialog result dropped: receiver is gone");
        }
    }
}

/// Waiting half of [`result_channel`].
#[derive(Debug)]
pub struct ResultReceiver {
    rx: Receiver<bool>,
}

impl ResultReceiver {
    /// Blocks until the result arrives. `None` if the dialog was dropped without delivering.
    pub fn recv(&self) -> Option<bool> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<bool> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// One-shot channel whose sender can be handed to a dialog as its completion handler.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::channel();
    (ResultSender { tx }, ResultReceiver { rx })
}
