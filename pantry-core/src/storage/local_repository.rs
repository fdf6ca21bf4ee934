use uuid::Uuid;

use super::blob_store::{BlobStore, FileBlobStore};
use crate::models::config::PantryConfiguration;
use crate::models::error::PantryError;
use crate::models::item::{ItemFields, ItemId, ItemUpdate, PantryEntry, ScannedItem};
use crate::traits::item_repository::ItemRepository;

/// Item store persisted on the device as one JSON blob.
///
/// The whole collection is serialized on every mutation and deserialized
/// on load. A missing or corrupt blob loads as an empty collection.
pub struct LocalRepository<B: BlobStore> {
    store: B,
    key: String,
    items: Vec<ScannedItem>,
}

impl LocalRepository<FileBlobStore> {
    /// File-backed store under the configured directory and key.
    pub fn from_config(config: &PantryConfiguration) -> Result<Self, PantryError> {
        config.validate().map_err(PantryError::Configuration)?;
        Ok(Self::new(
            FileBlobStore::new(&config.storage_directory),
            &config.storage_key,
        ))
    }
}

impl<B: BlobStore> LocalRepository<B> {
    /// Opens the store and loads whatever is persisted under `key`.
    pub fn new(store: B, key: &str) -> Self {
        let mut repo = Self {
            store,
            key: key.to_string(),
            items: Vec::new(),
        };
        repo.items = repo.load_all();
        repo
    }

    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    /// Read the persisted collection without touching the in-memory one.
    pub fn load_all(&self) -> Vec<ScannedItem> {
        let data = match self.store.read(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("failed to read {}: {}", self.key, e);
                return Vec::new();
            }
        };
        serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("discarding unreadable {} blob: {}", self.key, e);
            Vec::new()
        })
    }

    /// Persist `items` as the whole collection and adopt it.
    ///
    /// On failure nothing changes, in memory or on disk.
    pub fn save_all(&mut self, items: Vec<ScannedItem>) -> Result<(), PantryError> {
        let data = serde_json::to_vec(&items)
            .map_err(|e| PantryError::Storage(format!("failed to encode items: {e}")))?;
        self.store.write(&self.key, &data)?;
        self.items = items;
        Ok(())
    }

    pub fn append(&mut self, item: ScannedItem) -> Result<(), PantryError> {
        let mut items = self.items.clone();
        items.push(item);
        self.save_all(items)
    }

    pub fn update_item(&mut self, id: Uuid, update: &ItemUpdate) -> Result<(), PantryError> {
        let mut items = self.items.clone();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| PantryError::NotFound(id.to_string()))?;
        update.apply_to(item);
        self.save_all(items)
    }

    pub fn remove_item(&mut self, id: Uuid) -> Result<(), PantryError> {
        let mut items = self.items.clone();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(PantryError::NotFound(id.to_string()));
        }
        self.save_all(items)
    }
}

impl<B: BlobStore> ItemRepository for LocalRepository<B> {
    fn entries(&self) -> Vec<PantryEntry> {
        self.items.iter().map(PantryEntry::from).collect()
    }

    fn known_barcodes(&self) -> Vec<String> {
        self.items.iter().map(|item| item.code.clone()).collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn refresh(&mut self) -> Result<(), PantryError> {
        self.items = self.load_all();
        Ok(())
    }

    fn create(&mut self, code: &str, fields: &ItemFields) -> Result<(), PantryError> {
        self.append(ScannedItem::new(code, fields))
    }

    fn update(&mut self, id: ItemId, update: &ItemUpdate) -> Result<(), PantryError> {
        match id {
            ItemId::Local(uuid) => self.update_item(uuid, update),
            ItemId::Remote(_) => Err(PantryError::NotFound(id.to_string())),
        }
    }

    fn remove(&mut self, id: ItemId) -> Result<(), PantryError> {
        match id {
            ItemId::Local(uuid) => self.remove_item(uuid),
            ItemId::Remote(_) => Err(PantryError::NotFound(id.to_string())),
        }
    }
}
