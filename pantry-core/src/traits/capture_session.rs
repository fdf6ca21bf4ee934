use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::frame::VideoFrame;

/// Callback invoked for every frame the camera delivers.
///
/// Fires on the session's own frame thread, never on the control thread.
pub type FrameCallback = Arc<dyn Fn(&VideoFrame) + Send + Sync + 'static>;

/// Interface for platform camera sessions.
///
/// `start` and `stop` may block while the device spins up or down, so they
/// are only ever called from the capture worker thread.
pub trait CaptureSession: Send {
    /// Whether frames are currently being delivered.
    fn is_running(&self) -> bool;

    /// Start streaming frames to `callback`. A no-op if already running.
    fn start(&mut self, callback: FrameCallback) -> Result<(), CaptureError>;

    /// Stop streaming and release the device. A no-op if already stopped.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
