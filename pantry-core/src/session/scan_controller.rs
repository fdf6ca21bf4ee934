use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::capture_worker::CaptureWorker;
use crate::dispatch::event_queue::{ControlEvent, EventQueue, EventSender};
use crate::models::barcode;
use crate::models::config::PantryConfiguration;
use crate::models::error::{PantryError, ValidationError};
use crate::models::frame::{ScanDiagnostics, VideoFrame};
use crate::models::item::{ItemId, ItemUpdate, NamingForm, PantryEntry};
use crate::models::state::{DuplicateResolution, ScanState};
use crate::remote::{RemoteCompletion, RemoteOperation};
use crate::traits::capture_session::{CaptureSession, FrameCallback};
use crate::traits::decoder::BarcodeDecoder;
use crate::traits::feedback::{ScanFeedback, SilentFeedback};
use crate::traits::item_repository::ItemRepository;
use crate::traits::scan_delegate::ScanDelegate;

/// Scan-to-record orchestrator.
///
/// Lives on the control thread and owns everything the UI observes: the
/// scan state, the naming form and the item store. Background work (camera
/// frames, capture start/stop, network round trips) only posts
/// `ControlEvent`s; they take effect when the owner calls
/// `process_pending` or `process_next`.
///
/// ```text
/// [camera thread] frame → BarcodeDecoder ─PayloadDecoded─┐
/// [capture-control] start/stop ─SessionStarted/Stopped──┤
/// [pantry-* threads] round trip ─Remote────────────────┴→ EventQueue → ScanController
/// ```
pub struct ScanController {
    state: ScanState,
    /// Number of the current (or last) scanning session.
    session: u64,
    form: NamingForm,
    last_duplicate_code: Option<String>,
    enforce_unique_barcodes: bool,

    repository: Box<dyn ItemRepository>,
    decoder: Arc<dyn BarcodeDecoder>,
    worker: CaptureWorker,
    queue: EventQueue,

    delegate: Option<Arc<dyn ScanDelegate>>,
    feedback: Arc<dyn ScanFeedback>,

    // Shared with the frame callbacks
    diagnostics: Arc<Mutex<ScanDiagnostics>>,
}

impl ScanController {
    /// Wire a controller around `camera`, `decoder` and `repository`.
    ///
    /// `queue` must be the queue whose sender the repository was built
    /// with, so its completions reach this controller.
    pub fn new<C, D>(
        camera: C,
        decoder: D,
        repository: Box<dyn ItemRepository>,
        queue: EventQueue,
        config: &PantryConfiguration,
    ) -> Result<Self, PantryError>
    where
        C: CaptureSession + 'static,
        D: BarcodeDecoder + 'static,
    {
        let worker = CaptureWorker::spawn(camera, queue.sender())?;
        Ok(Self {
            state: ScanState::Idle,
            session: 0,
            form: NamingForm::default(),
            last_duplicate_code: None,
            enforce_unique_barcodes: config.enforce_unique_barcodes,
            repository,
            decoder: Arc::new(decoder),
            worker,
            queue,
            delegate: None,
            feedback: Arc::new(SilentFeedback),
            diagnostics: Arc::new(Mutex::new(ScanDiagnostics::default())),
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ScanDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_feedback(&mut self, feedback: Arc<dyn ScanFeedback>) {
        self.feedback = feedback;
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn diagnostics(&self) -> ScanDiagnostics {
        self.diagnostics.lock().clone()
    }

    /// Producer handle for additional background work.
    pub fn events(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn repository(&self) -> &dyn ItemRepository {
        self.repository.as_ref()
    }

    pub fn entries(&self) -> Vec<PantryEntry> {
        self.repository.entries()
    }

    /// Barcode of the most recent duplicate scan, for highlighting.
    pub fn last_duplicate_code(&self) -> Option<&str> {
        self.last_duplicate_code.as_deref()
    }

    pub fn form(&self) -> &NamingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NamingForm {
        &mut self.form
    }

    /// Whether the save action is enabled.
    pub fn can_save(&self) -> bool {
        self.state.is_awaiting_name() && self.form.can_save()
    }

    /// Start a scanning session. Transitions: idle → scanning.
    ///
    /// Ignored while already scanning, and while a scanned code still
    /// waits for a name or a duplicate notice is showing.
    pub fn start_scanning(&mut self) -> Result<(), PantryError> {
        if !self.state.is_idle() {
            log::debug!("start ignored in state {}", self.state.name());
            return Ok(());
        }

        let session = self.session + 1;
        self.worker.start(session, self.frame_callback(session))?;
        self.session = session;
        self.diagnostics.lock().sessions_started += 1;
        self.form.clear();
        self.set_state(ScanState::Scanning);
        Ok(())
    }

    /// Stop scanning. Transitions: scanning → idle. A no-op otherwise.
    pub fn stop_scanning(&mut self) {
        if !self.state.is_scanning() {
            return;
        }
        self.halt_capture();
        self.set_state(ScanState::Idle);
    }

    /// Discard the pending code. Transitions: awaiting name → idle.
    pub fn cancel_naming(&mut self) {
        if !self.state.is_awaiting_name() {
            return;
        }
        self.form.clear();
        self.set_state(ScanState::Idle);
    }

    /// Store the pending code with the form contents.
    /// Transitions: awaiting name → idle.
    ///
    /// An invalid form is rejected without leaving the naming step. Once
    /// the form is valid the controller returns to idle even if the store
    /// refuses the item; that failure is returned and reported.
    pub fn save(&mut self) -> Result<(), PantryError> {
        let Some(code) = self.state.pending_code().map(str::to_string) else {
            return Err(ValidationError::NothingToSave.into());
        };
        let fields = self.form.validate()?;

        let result = self.repository.create(&code, &fields);
        self.form.clear();
        self.set_state(ScanState::Idle);

        match result {
            Ok(()) => {
                log::info!("saved {} as {:?}", code, fields.name);
                self.notify_stored();
                Ok(())
            }
            Err(e) => {
                if let PantryError::DuplicateBarcode { code } = &e {
                    self.last_duplicate_code = Some(code.clone());
                }
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Close the duplicate notice. Transitions: showing duplicate → idle.
    ///
    /// With `ViewExisting`, returns the stored entry carrying the barcode.
    pub fn resolve_duplicate(&mut self, resolution: DuplicateResolution) -> Option<PantryEntry> {
        let ScanState::ShowingDuplicate { code } = &self.state else {
            return None;
        };
        let code = code.clone();
        self.set_state(ScanState::Idle);
        match resolution {
            DuplicateResolution::Dismiss => None,
            DuplicateResolution::ViewExisting => self.repository.find_by_barcode(&code),
        }
    }

    /// Reload the item list from its store.
    pub fn refresh_items(&mut self) -> Result<(), PantryError> {
        let result = self.repository.refresh();
        self.after_store_call(result)
    }

    pub fn update_item(&mut self, id: ItemId, update: &ItemUpdate) -> Result<(), PantryError> {
        let result = self.repository.update(id, update);
        self.after_store_call(result)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<(), PantryError> {
        let result = self.repository.remove(id);
        self.after_store_call(result)
    }

    /// Apply every event already waiting. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.queue.try_next() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for one event and apply it.
    pub fn process_next(&mut self, timeout: Duration) -> bool {
        match self.queue.next_timeout(timeout) {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    // --- Internal helpers ---

    fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::PayloadDecoded { session, payload } => {
                self.handle_payload(session, &payload)
            }
            ControlEvent::SessionStarted { session, result } => {
                if let Err(e) = result {
                    if session == self.session && self.state.is_scanning() {
                        self.set_state(ScanState::Idle);
                        self.report(&e.into());
                    }
                }
            }
            ControlEvent::SessionStopped { session, result } => {
                if let Err(e) = result {
                    log::warn!("session {} did not stop cleanly: {}", session, e);
                }
            }
            ControlEvent::Remote(completion) => self.handle_completion(completion),
        }
    }

    fn handle_payload(&mut self, session: u64, payload: &str) {
        if session != self.session || !self.state.is_scanning() {
            self.diagnostics.lock().payloads_ignored += 1;
            log::debug!("ignoring payload from session {} in state {}", session, self.state.name());
            return;
        }
        if barcode::is_blank(payload) {
            return;
        }

        let code = barcode::normalize(payload);
        self.halt_capture();
        self.feedback.payload_accepted();

        if self.enforce_unique_barcodes && self.repository.contains_barcode(&code) {
            log::info!("duplicate barcode {}", code);
            self.last_duplicate_code = Some(code.clone());
            self.set_state(ScanState::ShowingDuplicate { code });
        } else {
            self.set_state(ScanState::AwaitingName { pending_code: code });
        }
    }

    fn handle_completion(&mut self, completion: RemoteCompletion) {
        let Some(outcome) = self.repository.apply_completion(completion) else {
            return;
        };
        match &outcome.result {
            Ok(()) if outcome.operation == RemoteOperation::FetchAll => self.notify_items_changed(),
            Ok(()) => {}
            Err(e) => {
                if let PantryError::DuplicateBarcode { code } = e {
                    self.last_duplicate_code = Some(code.clone());
                }
                self.report(e);
            }
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_remote_outcome(&outcome);
        }
    }

    fn after_store_call(&mut self, result: Result<(), PantryError>) -> Result<(), PantryError> {
        match &result {
            Ok(()) => self.notify_stored(),
            Err(e) => self.report(e),
        }
        result
    }

    /// Stop the camera for the current session. Frames still in flight
    /// are discarded by `handle_payload`.
    fn halt_capture(&mut self) {
        if let Err(e) = self.worker.stop(self.session) {
            log::error!("failed to queue capture stop: {}", e);
        }
    }

    fn frame_callback(&self, session: u64) -> FrameCallback {
        let decoder = Arc::clone(&self.decoder);
        let events = self.queue.sender();
        let diagnostics = Arc::clone(&self.diagnostics);
        let delivered = AtomicBool::new(false);

        Arc::new(move |frame: &VideoFrame| {
            // One payload per session
            if delivered.load(Ordering::Acquire) {
                return;
            }
            diagnostics.lock().frames_received += 1;

            match decoder.decode(frame) {
                Ok(Some(payload)) if !barcode::is_blank(&payload) => {
                    diagnostics.lock().frames_decoded += 1;
                    if !delivered.swap(true, Ordering::AcqRel) {
                        events.post(ControlEvent::PayloadDecoded { session, payload });
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    diagnostics.lock().decode_failures += 1;
                    log::warn!("barcode detection failed: {}", e);
                }
            }
        })
    }

    fn set_state(&mut self, new_state: ScanState) {
        log::debug!("scan state {} → {}", self.state.name(), new_state.name());
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&self.state);
        }
    }

    /// Deferred stores report through their `FetchAll` completion instead.
    fn notify_stored(&self) {
        if !self.repository.is_deferred() {
            self.notify_items_changed();
        }
    }

    fn notify_items_changed(&self) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_items_changed(self.repository.len());
        }
    }

    fn report(&self, error: &PantryError) {
        log::warn!("{}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::error::CaptureError;
    use crate::models::item::ItemFields;
    use crate::models::record::PantryRecord;
    use crate::processing::text_decoder::TextPayloadDecoder;
    use crate::remote::api::PantryApi;
    use crate::remote::remote_repository::RemoteRepository;
    use crate::storage::blob_store::MemoryBlobStore;
    use crate::storage::local_repository::LocalRepository;
    use crate::testing::{
        init_logging, records_json, CameraProbe, CountingFeedback, FakeCaptureSession,
        RecordingDelegate, ScriptedTransport,
    };
    use crate::traits::transport::HttpMethod;

    const TIMEOUT: Duration = Duration::from_secs(5);

    struct Harness {
        controller: ScanController,
        camera: Arc<CameraProbe>,
        delegate: Arc<RecordingDelegate>,
        feedback: Arc<CountingFeedback>,
    }

    impl Harness {
        fn wire(queue: EventQueue, repository: Box<dyn ItemRepository>, config: &PantryConfiguration) -> Self {
            init_logging();
            let (session, camera) = FakeCaptureSession::new();
            let mut controller =
                ScanController::new(session, TextPayloadDecoder, repository, queue, config).unwrap();
            let delegate = Arc::new(RecordingDelegate::default());
            let feedback = Arc::new(CountingFeedback::default());
            controller.set_delegate(delegate.clone());
            controller.set_feedback(feedback.clone());
            Self {
                controller,
                camera,
                delegate,
                feedback,
            }
        }

        fn local(config: &PantryConfiguration) -> Self {
            let repository = LocalRepository::new(MemoryBlobStore::new(), &config.storage_key);
            Self::wire(EventQueue::new(), Box::new(repository), config)
        }

        fn pump(&mut self) {
            assert!(self.controller.process_next(TIMEOUT), "no event arrived");
        }

        /// Start a session and wait until the camera is live.
        fn start(&mut self) {
            self.controller.start_scanning().unwrap();
            self.pump();
            assert!(self.camera.is_running());
        }

        /// Run a full scan of `payload` through to the camera stopping.
        fn scan(&mut self, payload: &str) {
            self.start();
            assert!(self.camera.show(payload));
            self.pump();
            self.pump();
            assert!(!self.camera.is_running());
        }

        fn name_and_save(&mut self, name: &str, quantity: &str) {
            let form = self.controller.form_mut();
            form.name = name.into();
            form.quantity = quantity.into();
            self.controller.save().unwrap();
        }
    }

    #[test]
    fn scan_name_and_save() {
        let mut h = Harness::local(&PantryConfiguration::default());

        h.scan("ABC123");
        assert_eq!(
            h.controller.state(),
            &ScanState::AwaitingName {
                pending_code: "abc123".into()
            }
        );
        assert_eq!(h.feedback.count(), 1);
        assert!(!h.controller.can_save());

        h.name_and_save("Salt", "1");
        assert!(h.controller.state().is_idle());
        assert_eq!(h.controller.form(), &NamingForm::default());

        let entries = h.controller.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "abc123");
        assert_eq!(entries[0].name, "Salt");
        assert_eq!(entries[0].quantity, 1);
        assert_eq!(*h.delegate.item_counts.lock(), vec![1]);
    }

    #[test]
    fn duplicate_scan_shows_notice_and_existing_item() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.scan("ABC123");
        h.name_and_save("Salt", "2");

        h.scan(" abc123 ");
        assert_eq!(
            h.controller.state(),
            &ScanState::ShowingDuplicate {
                code: "abc123".into()
            }
        );
        assert_eq!(h.controller.last_duplicate_code(), Some("abc123"));
        // Feedback fires before the duplicate decision
        assert_eq!(h.feedback.count(), 2);

        // Start is ignored while the notice is showing
        h.controller.start_scanning().unwrap();
        assert!(h.controller.state().is_showing_duplicate());

        let existing = h
            .controller
            .resolve_duplicate(DuplicateResolution::ViewExisting)
            .unwrap();
        assert_eq!(existing.name, "Salt");
        assert!(h.controller.state().is_idle());
        assert_eq!(h.controller.entries().len(), 1);
    }

    #[test]
    fn duplicates_allowed_when_not_enforced() {
        let config = PantryConfiguration {
            enforce_unique_barcodes: false,
            ..Default::default()
        };
        let mut h = Harness::local(&config);
        h.scan("abc");
        h.name_and_save("Salt", "1");
        h.scan("abc");
        assert!(h.controller.state().is_awaiting_name());
        h.name_and_save("More salt", "3");
        assert_eq!(h.controller.entries().len(), 2);
    }

    #[test]
    fn start_is_idempotent() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.start();
        h.controller.start_scanning().unwrap();
        assert!(h.controller.state().is_scanning());
        assert_eq!(h.camera.starts(), 1);
        assert_eq!(h.controller.diagnostics().sessions_started, 1);
    }

    #[test]
    fn stop_returns_to_idle() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.controller.stop_scanning();
        assert!(h.delegate.states.lock().is_empty());

        h.start();
        h.controller.stop_scanning();
        h.pump();
        assert!(h.controller.state().is_idle());
        assert!(!h.camera.is_running());
        assert_eq!(
            *h.delegate.states.lock(),
            vec![ScanState::Scanning, ScanState::Idle]
        );
    }

    #[test]
    fn cancel_discards_pending_code() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.scan("abc");
        h.controller.form_mut().name = "Half typed".into();
        h.controller.cancel_naming();
        assert!(h.controller.state().is_idle());
        assert!(h.controller.form().name.is_empty());
        assert!(h.controller.entries().is_empty());
    }

    #[test]
    fn invalid_form_keeps_naming_step() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.scan("abc");

        h.controller.form_mut().quantity = "2".into();
        assert_eq!(
            h.controller.save(),
            Err(PantryError::Validation(ValidationError::EmptyName))
        );

        h.controller.form_mut().name = "Salt".into();
        h.controller.form_mut().quantity = "two".into();
        assert!(matches!(
            h.controller.save(),
            Err(PantryError::Validation(ValidationError::InvalidQuantity(_)))
        ));
        assert!(h.controller.state().is_awaiting_name());
        assert!(h.controller.entries().is_empty());
    }

    #[test]
    fn save_without_pending_code_is_rejected() {
        let mut h = Harness::local(&PantryConfiguration::default());
        assert_eq!(
            h.controller.save(),
            Err(PantryError::Validation(ValidationError::NothingToSave))
        );
    }

    #[test]
    fn only_first_payload_of_a_session_is_used() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.start();
        assert!(h.camera.show("first"));
        assert!(h.camera.show("second"));
        h.pump();
        assert_eq!(h.controller.state().pending_code(), Some("first"));

        let diagnostics = h.controller.diagnostics();
        assert_eq!(diagnostics.frames_received, 1);
        assert_eq!(diagnostics.frames_decoded, 1);
    }

    #[test]
    fn blank_and_undecodable_frames_keep_scanning() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.start();
        assert!(h.camera.show("   "));
        assert!(h.camera.show_bytes(&[0xff, 0xfe]));
        assert!(h.camera.show(""));
        assert_eq!(h.controller.process_pending(), 0);
        assert!(h.controller.state().is_scanning());

        let diagnostics = h.controller.diagnostics();
        assert_eq!(diagnostics.frames_received, 3);
        assert_eq!(diagnostics.frames_decoded, 0);
        assert_eq!(diagnostics.decode_failures, 1);

        assert!(h.camera.show("abc"));
        h.pump();
        assert!(h.controller.state().is_awaiting_name());
    }

    #[test]
    fn stale_payload_is_ignored() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.start();
        h.controller.events().post(ControlEvent::PayloadDecoded {
            session: 99,
            payload: "old".into(),
        });
        assert_eq!(h.controller.process_pending(), 1);
        assert!(h.controller.state().is_scanning());
        assert_eq!(h.controller.diagnostics().payloads_ignored, 1);
        assert_eq!(h.feedback.count(), 0);
    }

    #[test]
    fn camera_failure_returns_to_idle() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.camera.fail_next_start(CaptureError::PermissionDenied);
        h.controller.start_scanning().unwrap();
        assert!(h.controller.state().is_scanning());

        h.pump();
        assert!(h.controller.state().is_idle());
        assert_eq!(
            *h.delegate.errors.lock(),
            vec![PantryError::Capture(CaptureError::PermissionDenied)]
        );

        h.start();
        assert!(h.controller.state().is_scanning());
    }

    #[test]
    fn update_and_remove_local_items() {
        let mut h = Harness::local(&PantryConfiguration::default());
        h.scan("abc");
        h.name_and_save("Salt", "1");
        let id = h.controller.entries()[0].id;

        let update = ItemUpdate {
            quantity: Some(4),
            ..Default::default()
        };
        h.controller.update_item(id, &update).unwrap();
        assert_eq!(h.controller.entries()[0].quantity, 4);

        h.controller.remove_item(id).unwrap();
        assert!(h.controller.entries().is_empty());

        assert!(matches!(
            h.controller.remove_item(id),
            Err(PantryError::NotFound(_))
        ));
        assert_eq!(h.delegate.errors.lock().len(), 1);
    }

    fn remote_harness(transport: &Arc<ScriptedTransport>) -> Harness {
        let queue = EventQueue::new();
        let api = PantryApi::new(Arc::clone(transport), "https://pantry.test/api/Pantry");
        let repository = RemoteRepository::new(api, queue.sender());
        let config = PantryConfiguration::default();
        Harness::wire(queue, Box::new(repository), &config)
    }

    fn remote_record(id: i64, name: &str, code: &str) -> PantryRecord {
        let mut record = PantryRecord::new_from_fields(code, &ItemFields::named(name, 1), Utc::now());
        record.id = id;
        record
    }

    #[test]
    fn remote_cached_duplicate_never_posts() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &records_json(&[remote_record(7, "Salt", "abc123")]));
        let mut h = remote_harness(&transport);

        h.controller.refresh_items().unwrap();
        h.pump();
        assert_eq!(h.controller.entries().len(), 1);

        h.scan("ABC123");
        assert!(h.controller.state().is_showing_duplicate());
        let existing = h
            .controller
            .resolve_duplicate(DuplicateResolution::ViewExisting)
            .unwrap();
        assert_eq!(existing.id, ItemId::Remote(7));
        assert_eq!(transport.methods(), vec![HttpMethod::Get]);
    }

    #[test]
    fn remote_save_posts_then_refetches() {
        let transport = ScriptedTransport::new();
        let mut h = remote_harness(&transport);

        h.scan("xyz");
        transport.respond(201, "{}");
        transport.respond(200, &records_json(&[remote_record(3, "Pepper", "xyz")]));
        h.name_and_save("Pepper", "2");
        assert!(h.controller.state().is_idle());

        assert!(h.delegate.item_counts.lock().is_empty());

        h.pump();
        h.pump();
        assert_eq!(
            transport.methods(),
            vec![HttpMethod::Post, HttpMethod::Get]
        );
        assert_eq!(*h.delegate.item_counts.lock(), vec![1]);
        assert_eq!(h.controller.entries()[0].name, "Pepper");

        let outcomes = h.delegate.outcomes.lock();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].operation,
            RemoteOperation::Create { code: "xyz".into() }
        );
        assert!(outcomes.iter().all(|o| o.is_success()));
    }

    #[test]
    fn remote_fetch_failure_is_reported() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");
        let mut h = remote_harness(&transport);

        h.controller.refresh_items().unwrap();
        h.pump();
        assert!(h.controller.entries().is_empty());
        assert!(h.controller.repository().error_message().is_some());
        assert_eq!(
            *h.delegate.errors.lock(),
            vec![PantryError::Transport("connection refused".into())]
        );
    }
}
