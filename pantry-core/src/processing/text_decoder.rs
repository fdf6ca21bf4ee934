use crate::models::error::CaptureError;
use crate::models::frame::VideoFrame;
use crate::traits::decoder::BarcodeDecoder;

/// Decoder for frames that already carry their payload as UTF-8 text.
///
/// Stands in for the platform vision request in simulators and tests:
/// an empty frame has no code, anything else is the payload verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPayloadDecoder;

impl BarcodeDecoder for TextPayloadDecoder {
    fn decode(&self, frame: &VideoFrame) -> Result<Option<String>, CaptureError> {
        if frame.data.is_empty() {
            return Ok(None);
        }
        std::str::from_utf8(&frame.data)
            .map(|payload| Some(payload.to_string()))
            .map_err(|e| CaptureError::DecodeFailed(format!("frame {}: {}", frame.sequence, e)))
    }
}
