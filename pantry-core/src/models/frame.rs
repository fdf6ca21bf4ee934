/// A single video frame delivered by a capture session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel or payload bytes, interpretation is up to the decoder.
    pub data: Vec<u8>,
    /// Monotonic frame counter assigned by the session.
    pub sequence: u64,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, sequence: u64) -> Self {
        Self {
            width,
            height,
            data,
            sequence,
        }
    }
}

/// Counters for debugging scan sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanDiagnostics {
    pub sessions_started: u64,
    pub frames_received: u64,
    pub frames_decoded: u64,
    pub decode_failures: u64,
    pub payloads_ignored: u64,
}
