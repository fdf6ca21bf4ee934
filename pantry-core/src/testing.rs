//! Fakes for the capability traits, shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::{CaptureError, PantryError};
use crate::models::frame::VideoFrame;
use crate::models::record::PantryRecord;
use crate::models::state::ScanState;
use crate::remote::RemoteOutcome;
use crate::traits::capture_session::{CaptureSession, FrameCallback};
use crate::traits::feedback::ScanFeedback;
use crate::traits::scan_delegate::ScanDelegate;
use crate::traits::transport::{HttpMethod, HttpRequest, HttpResponse, PantryTransport};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test-side view of a `FakeCaptureSession` after it moved to its worker.
#[derive(Default)]
pub struct CameraProbe {
    callback: Mutex<Option<FrameCallback>>,
    running: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
    sequence: AtomicU64,
    fail_start: Mutex<Option<CaptureError>>,
}

impl CameraProbe {
    /// Deliver a frame carrying `payload` as text. Returns `false` when the
    /// camera is not running.
    pub fn show(&self, payload: &str) -> bool {
        self.show_bytes(payload.as_bytes())
    }

    pub fn show_bytes(&self, data: &[u8]) -> bool {
        let Some(callback) = self.callback.lock().clone() else {
            return false;
        };
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        callback(&VideoFrame::new(640, 480, data.to_vec(), sequence));
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn fail_next_start(&self, error: CaptureError) {
        *self.fail_start.lock() = Some(error);
    }
}

pub struct FakeCaptureSession {
    probe: Arc<CameraProbe>,
}

impl FakeCaptureSession {
    pub fn new() -> (Self, Arc<CameraProbe>) {
        let probe = Arc::new(CameraProbe::default());
        (
            Self {
                probe: Arc::clone(&probe),
            },
            probe,
        )
    }
}

impl CaptureSession for FakeCaptureSession {
    fn is_running(&self) -> bool {
        self.probe.is_running()
    }

    fn start(&mut self, callback: FrameCallback) -> Result<(), CaptureError> {
        if let Some(error) = self.probe.fail_start.lock().take() {
            return Err(error);
        }
        *self.probe.callback.lock() = Some(callback);
        self.probe.running.store(true, Ordering::SeqCst);
        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.probe.callback.lock().take();
        self.probe.running.store(false, Ordering::SeqCst);
        self.probe.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Transport answering from a script and recording every request.
///
/// Unscripted requests get `200 []`.
#[derive(Default)]
pub struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, PantryError>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(PantryError::Transport(message.into())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn methods(&self) -> Vec<HttpMethod> {
        self.requests.lock().iter().map(|r| r.method).collect()
    }
}

impl PantryTransport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, PantryError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
    }
}

pub fn records_json(records: &[PantryRecord]) -> String {
    serde_json::to_string(records).unwrap()
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub states: Mutex<Vec<ScanState>>,
    pub item_counts: Mutex<Vec<usize>>,
    pub outcomes: Mutex<Vec<RemoteOutcome>>,
    pub errors: Mutex<Vec<PantryError>>,
}

impl ScanDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: &ScanState) {
        self.states.lock().push(state.clone());
    }

    fn on_items_changed(&self, count: usize) {
        self.item_counts.lock().push(count);
    }

    fn on_remote_outcome(&self, outcome: &RemoteOutcome) {
        self.outcomes.lock().push(outcome.clone());
    }

    fn on_error(&self, error: &PantryError) {
        self.errors.lock().push(error.clone());
    }
}

#[derive(Default)]
pub struct CountingFeedback {
    count: AtomicUsize,
}

impl CountingFeedback {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ScanFeedback for CountingFeedback {
    fn payload_accepted(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
