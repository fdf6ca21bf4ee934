use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::dispatch::event_queue::{ControlEvent, EventSender};
use crate::models::error::{CaptureError, PantryError};
use crate::traits::capture_session::{CaptureSession, FrameCallback};

enum SessionCommand {
    Start { session: u64, callback: FrameCallback },
    Stop { session: u64 },
    Shutdown,
}

/// Owns the capture session on a dedicated `capture-control` thread.
///
/// Start and stop may block while the camera spins up or down, so the
/// control thread only queues commands here. Commands run strictly in the
/// order they were queued and each one is acknowledged on the event queue.
pub struct CaptureWorker {
    commands: Sender<SessionCommand>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CaptureWorker {
    pub fn spawn<C: CaptureSession + 'static>(
        session: C,
        events: EventSender,
    ) -> Result<Self, PantryError> {
        let (commands, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("capture-control".into())
            .spawn(move || run(session, rx, events))
            .map_err(|e| {
                CaptureError::Unknown(format!("failed to spawn capture worker: {e}"))
            })?;
        Ok(Self {
            commands,
            handle: Some(handle),
        })
    }

    /// Queue a start for scanning session `session`.
    pub fn start(&self, session: u64, callback: FrameCallback) -> Result<(), PantryError> {
        self.send(SessionCommand::Start { session, callback })
    }

    /// Queue a stop for scanning session `session`.
    pub fn stop(&self, session: u64) -> Result<(), PantryError> {
        self.send(SessionCommand::Stop { session })
    }

    fn send(&self, command: SessionCommand) -> Result<(), PantryError> {
        self.commands
            .send(command)
            .map_err(|_| CaptureError::Unknown("capture worker has stopped".into()).into())
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run<C: CaptureSession>(mut camera: C, commands: Receiver<SessionCommand>, events: EventSender) {
    for command in commands {
        match command {
            SessionCommand::Start { session, callback } => {
                // A camera still running here belongs to an older session
                // whose frames would all be discarded; re-arm it.
                if camera.is_running() {
                    log::debug!("re-arming running camera for session {}", session);
                    if let Err(e) = camera.stop() {
                        log::warn!("failed to stop stale capture: {}", e);
                    }
                }
                let result = camera.start(callback);
                match &result {
                    Ok(()) => log::debug!("capture started for session {}", session),
                    Err(e) => log::error!("capture failed to start for session {}: {}", session, e),
                }
                events.post(ControlEvent::SessionStarted { session, result });
            }
            SessionCommand::Stop { session } => {
                let result = if camera.is_running() {
                    camera.stop()
                } else {
                    Ok(())
                };
                if let Err(e) = &result {
                    log::warn!("capture failed to stop for session {}: {}", session, e);
                }
                events.post(ControlEvent::SessionStopped { session, result });
            }
            SessionCommand::Shutdown => break,
        }
    }

    if camera.is_running() {
        let _ = camera.stop();
    }
}
