use std::sync::Arc;
use std::thread;

use chrono::Utc;

use super::api::PantryApi;
use super::{RemoteCompletion, RemoteOperation, RemoteOutcome};
use crate::dispatch::event_queue::{ControlEvent, EventSender};
use crate::models::barcode;
use crate::models::error::PantryError;
use crate::models::item::{ItemFields, ItemId, ItemUpdate, PantryEntry};
use crate::models::record::PantryRecord;
use crate::traits::item_repository::ItemRepository;
use crate::traits::transport::PantryTransport;

/// Item store backed by the pantry REST API.
///
/// The server is authoritative. `records` is a cache that is replaced
/// wholesale by every fetch, and every successful mutation triggers a
/// fresh fetch. Each operation runs on its own short-lived thread and
/// reports back through the control queue; overlapping fetches are not
/// sequenced, so whichever completion is applied last wins.
pub struct RemoteRepository<T: PantryTransport + 'static> {
    api: Arc<PantryApi<T>>,
    events: EventSender,
    records: Vec<PantryRecord>,
    error_message: Option<String>,
}

impl<T: PantryTransport + 'static> RemoteRepository<T> {
    pub fn new(api: PantryApi<T>, events: EventSender) -> Self {
        Self {
            api: Arc::new(api),
            events,
            records: Vec::new(),
            error_message: None,
        }
    }

    /// Cached records from the last applied fetch.
    pub fn records(&self) -> &[PantryRecord] {
        &self.records
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// GET the whole collection.
    pub fn fetch_all(&self) -> Result<(), PantryError> {
        self.dispatch("pantry-fetch", |api| RemoteCompletion::Fetched(api.list()))
    }

    /// POST a new record for `code`.
    ///
    /// Fails with `DuplicateBarcode` without any network call when the
    /// cache already holds the normalized barcode.
    pub fn create_record(&self, code: &str, fields: &ItemFields) -> Result<(), PantryError> {
        let code = barcode::normalize(code);
        let known = self.records.iter().map(PantryRecord::barcode);
        if barcode::contains(known, &code) {
            log::info!("barcode {} already in pantry, not posting", code);
            return Err(PantryError::DuplicateBarcode { code });
        }

        let record = PantryRecord::new_from_fields(&code, fields, Utc::now());
        self.dispatch("pantry-create", move |api| RemoteCompletion::Created {
            result: api.create(&record),
            code,
        })
    }

    /// PUT the full record.
    pub fn update_record(&self, record: PantryRecord) -> Result<(), PantryError> {
        let id = record.id;
        self.dispatch("pantry-update", move |api| RemoteCompletion::Updated {
            id,
            result: api.update(&record),
        })
    }

    pub fn delete_record(&self, id: i64) -> Result<(), PantryError> {
        self.dispatch("pantry-delete", move |api| RemoteCompletion::Deleted {
            id,
            result: api.delete(id),
        })
    }

    /// Apply a finished round trip. Must run on the control thread.
    pub fn apply(&mut self, completion: RemoteCompletion) -> RemoteOutcome {
        match completion {
            RemoteCompletion::Fetched(Ok(records)) => {
                log::debug!("pantry cache refreshed with {} records", records.len());
                self.records = records;
                self.error_message = None;
                RemoteOutcome {
                    operation: RemoteOperation::FetchAll,
                    result: Ok(()),
                }
            }
            RemoteCompletion::Fetched(Err(e)) => {
                log::warn!("pantry fetch failed, keeping cached list: {}", e);
                self.error_message = Some(e.user_message());
                RemoteOutcome {
                    operation: RemoteOperation::FetchAll,
                    result: Err(e),
                }
            }
            RemoteCompletion::Created { code, result } => self.resolve_mutation(
                RemoteOperation::Create { code },
                result,
            ),
            RemoteCompletion::Updated { id, result } => {
                self.resolve_mutation(RemoteOperation::Update { id }, result)
            }
            RemoteCompletion::Deleted { id, result } => {
                self.resolve_mutation(RemoteOperation::Delete { id }, result)
            }
        }
    }

    fn resolve_mutation(
        &mut self,
        operation: RemoteOperation,
        result: Result<(), PantryError>,
    ) -> RemoteOutcome {
        match &result {
            Ok(()) => {
                if let Err(e) = self.fetch_all() {
                    log::error!("could not refresh pantry after {:?}: {}", operation, e);
                    self.error_message = Some(e.user_message());
                }
            }
            Err(e) => log::warn!("{:?} failed: {}", operation, e),
        }
        RemoteOutcome { operation, result }
    }

    fn dispatch<F>(&self, name: &str, job: F) -> Result<(), PantryError>
    where
        F: FnOnce(&PantryApi<T>) -> RemoteCompletion + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                let completion = job(&api);
                events.post(ControlEvent::Remote(completion));
            })
            .map(|_| ())
            .map_err(|e| PantryError::Transport(format!("failed to spawn {name} thread: {e}")))
    }
}

impl<T: PantryTransport + 'static> ItemRepository for RemoteRepository<T> {
    fn entries(&self) -> Vec<PantryEntry> {
        self.records.iter().map(PantryEntry::from).collect()
    }

    fn known_barcodes(&self) -> Vec<String> {
        self.records.iter().map(|r| r.barcode().to_string()).collect()
    }

    fn refresh(&mut self) -> Result<(), PantryError> {
        self.fetch_all()
    }

    fn create(&mut self, code: &str, fields: &ItemFields) -> Result<(), PantryError> {
        self.create_record(code, fields)
    }

    fn update(&mut self, id: ItemId, update: &ItemUpdate) -> Result<(), PantryError> {
        let ItemId::Remote(remote_id) = id else {
            return Err(PantryError::NotFound(id.to_string()));
        };
        let record = self
            .records
            .iter()
            .find(|r| r.id == remote_id)
            .ok_or_else(|| PantryError::NotFound(id.to_string()))?;
        self.update_record(record.edited(update, Utc::now()))
    }

    fn remove(&mut self, id: ItemId) -> Result<(), PantryError> {
        match id {
            ItemId::Remote(remote_id) => self.delete_record(remote_id),
            ItemId::Local(_) => Err(PantryError::NotFound(id.to_string())),
        }
    }

    fn is_deferred(&self) -> bool {
        true
    }

    fn apply_completion(&mut self, completion: RemoteCompletion) -> Option<RemoteOutcome> {
        Some(self.apply(completion))
    }

    fn error_message(&self) -> Option<String> {
        self.error_message.clone()
    }
}
