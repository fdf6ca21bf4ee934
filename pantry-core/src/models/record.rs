use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ItemFields, ItemId, ItemUpdate, PantryEntry};

/// Timestamp layout used by the pantry API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Format `at` the way the pantry API stores timestamps.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// An item as stored by the remote pantry API.
///
/// The API has no barcode or quantity column: `extra_str_one` carries the
/// barcode and `extra_int_one` the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub image_name: String,
    pub size: String,
    pub extra_str_one: String,
    pub extra_str_two: String,
    pub is_active: i64,
    pub extra_int_one: i64,
    pub extra_int_two: i64,
    pub last_purchase: String,
    pub last_updated: String,
    pub is_hot: bool,
}

impl PantryRecord {
    /// Builds a record for POSTing. The server assigns the identifier.
    pub fn new_from_fields(code: &str, fields: &ItemFields, now: DateTime<Utc>) -> Self {
        let timestamp = format_timestamp(now);
        Self {
            id: 0,
            name: fields.name.clone(),
            description: fields.description.clone(),
            location: fields.location.clone(),
            image_url: String::new(),
            image_name: String::new(),
            size: fields.size.clone(),
            extra_str_one: code.to_string(),
            extra_str_two: String::new(),
            is_active: 1,
            extra_int_one: fields.quantity,
            extra_int_two: 0,
            last_purchase: timestamp.clone(),
            last_updated: timestamp,
            is_hot: fields.is_hot,
        }
    }

    pub fn barcode(&self) -> &str {
        &self.extra_str_one
    }

    pub fn quantity(&self) -> i64 {
        self.extra_int_one
    }

    /// Copy of this record with `update` applied. `lastPurchase` is kept,
    /// `lastUpdated` is set to `now`.
    pub fn edited(&self, update: &ItemUpdate, now: DateTime<Utc>) -> Self {
        let mut record = self.clone();
        if let Some(name) = &update.name {
            record.name = name.clone();
        }
        if let Some(description) = &update.description {
            record.description = description.clone();
        }
        if let Some(quantity) = update.quantity {
            record.extra_int_one = quantity;
        }
        if let Some(size) = &update.size {
            record.size = size.clone();
        }
        if let Some(location) = &update.location {
            record.location = location.clone();
        }
        if let Some(is_hot) = update.is_hot {
            record.is_hot = is_hot;
        }
        record.last_updated = format_timestamp(now);
        record
    }
}

impl From<&PantryRecord> for PantryEntry {
    fn from(record: &PantryRecord) -> Self {
        Self {
            id: ItemId::Remote(record.id),
            code: record.extra_str_one.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            quantity: record.extra_int_one,
            size: record.size.clone(),
            location: record.location.clone(),
            is_hot: record.is_hot,
        }
    }
}
