use crate::models::barcode;
use crate::models::error::PantryError;
use crate::models::item::{ItemFields, ItemId, ItemUpdate, PantryEntry};
use crate::remote::{RemoteCompletion, RemoteOutcome};

/// Persistence strategy for the item collection.
///
/// Implemented by:
/// - `LocalRepository` (whole-collection blob on the device)
/// - `RemoteRepository` (pantry REST API, cache refreshed after mutations)
///
/// Mutations on the remote store only dispatch the request; the result
/// arrives later through `apply_completion`.
pub trait ItemRepository: Send {
    /// Entries in display order.
    fn entries(&self) -> Vec<PantryEntry>;

    /// Barcodes of all stored entries, as stored.
    fn known_barcodes(&self) -> Vec<String>;

    /// Whether `code` matches a stored barcode after normalization.
    fn contains_barcode(&self, code: &str) -> bool {
        let known = self.known_barcodes();
        barcode::contains(known.iter().map(String::as_str), code)
    }

    /// Entry whose barcode matches `code` after normalization.
    fn find_by_barcode(&self, code: &str) -> Option<PantryEntry> {
        let needle = barcode::normalize(code);
        self.entries()
            .into_iter()
            .find(|entry| barcode::normalize(&entry.code) == needle)
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reload the collection from its backing store.
    fn refresh(&mut self) -> Result<(), PantryError>;

    /// Add a new entry for `code`.
    fn create(&mut self, code: &str, fields: &ItemFields) -> Result<(), PantryError>;

    /// Edit an existing entry in place.
    fn update(&mut self, id: ItemId, update: &ItemUpdate) -> Result<(), PantryError>;

    /// Delete an entry.
    fn remove(&mut self, id: ItemId) -> Result<(), PantryError>;

    /// Whether mutations only dispatch a request and land later through
    /// `apply_completion`.
    fn is_deferred(&self) -> bool {
        false
    }

    /// Apply the result of a background round trip on the control thread.
    fn apply_completion(&mut self, completion: RemoteCompletion) -> Option<RemoteOutcome> {
        log::warn!("repository ignores remote completion: {:?}", completion);
        None
    }

    /// Last readable error from a background refresh, if any.
    fn error_message(&self) -> Option<String> {
        None
    }
}
