use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::models::error::CaptureError;
use crate::remote::RemoteCompletion;

/// Messages posted by background work to the control thread.
///
/// Camera frames and network round trips never touch shared state
/// directly; they describe what happened and the control thread applies it.
#[derive(Debug)]
pub enum ControlEvent {
    /// A non-blank payload was decoded during scanning session `session`.
    PayloadDecoded { session: u64, payload: String },

    /// The capture worker executed a start command.
    SessionStarted {
        session: u64,
        result: Result<(), CaptureError>,
    },

    /// The capture worker executed a stop command.
    SessionStopped {
        session: u64,
        result: Result<(), CaptureError>,
    },

    /// A pantry API round trip finished.
    Remote(RemoteCompletion),
}

/// Producing end of the control queue, handed to background work.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<ControlEvent>,
}

impl EventSender {
    /// Post `event` to the control thread.
    ///
    /// Returns `false` if the queue owner is gone; the event is dropped.
    pub fn post(&self, event: ControlEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(mpsc::SendError(event)) => {
                log::debug!("control queue closed, dropping {:?}", event);
                false
            }
        }
    }
}

/// The single queue every state mutation is funnelled through.
///
/// Owned by the control thread. Events from one producer arrive in the
/// order they were posted; there is no ordering across producers.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<ControlEvent>,
    rx: Receiver<ControlEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Next event if one is already waiting.
    pub fn try_next(&self) -> Option<ControlEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            // Unreachable while `self.tx` is alive.
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ControlEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
