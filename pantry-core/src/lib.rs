//! # pantry-core
//!
//! Platform-agnostic core of the pantry barcode scanner.
//!
//! A camera feeds frames to a barcode decoder; the first payload of a
//! session is normalized, checked against the stored items and, once the
//! user names it, recorded either on the device or through the pantry REST
//! API. Platform backends implement `CaptureSession` and `BarcodeDecoder`
//! and plug into the `ScanController`.
//!
//! ## Architecture
//!
//! ```text
//! pantry-core (this crate)
//! ├── traits/       ← CaptureSession, BarcodeDecoder, ItemRepository, PantryTransport, ScanDelegate
//! ├── models/       ← PantryError, ScanState, PantryConfiguration, ScannedItem, PantryRecord
//! ├── dispatch/     ← EventQueue (single control-thread queue)
//! ├── processing/   ← TextPayloadDecoder
//! ├── session/      ← ScanController, CaptureWorker
//! ├── storage/      ← LocalRepository, FileBlobStore
//! └── remote/       ← PantryApi, RemoteRepository
//! ```

pub mod dispatch;
pub mod models;
pub mod processing;
pub mod remote;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use dispatch::event_queue::{ControlEvent, EventQueue, EventSender};
pub use models::config::{PantryConfiguration, StoreBackend};
pub use models::error::{CaptureError, PantryError, ValidationError};
pub use models::frame::{ScanDiagnostics, VideoFrame};
pub use models::item::{ItemFields, ItemId, ItemUpdate, NamingForm, PantryEntry, ScannedItem};
pub use models::record::PantryRecord;
pub use models::state::{DuplicateResolution, ScanState};
pub use processing::text_decoder::TextPayloadDecoder;
pub use remote::api::PantryApi;
pub use remote::remote_repository::RemoteRepository;
pub use remote::{RemoteCompletion, RemoteOperation, RemoteOutcome};
pub use session::scan_controller::ScanController;
pub use storage::blob_store::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use storage::local_repository::LocalRepository;
pub use traits::capture_session::{CaptureSession, FrameCallback};
pub use traits::decoder::BarcodeDecoder;
pub use traits::feedback::{ScanFeedback, SilentFeedback};
pub use traits::item_repository::ItemRepository;
pub use traits::scan_delegate::ScanDelegate;
pub use traits::transport::{HttpMethod, HttpRequest, HttpResponse, PantryTransport};
