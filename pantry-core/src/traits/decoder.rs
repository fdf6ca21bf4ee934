use crate::models::error::CaptureError;
use crate::models::frame::VideoFrame;

/// Platform barcode/QR recognizer.
pub trait BarcodeDecoder: Send + Sync {
    /// First decoded payload in `frame`, or `None` when no code is visible.
    ///
    /// `Err` means the platform failed to process the frame at all. Callers
    /// log it and carry on as if nothing was found.
    fn decode(&self, frame: &VideoFrame) -> Result<Option<String>, CaptureError>;
}
