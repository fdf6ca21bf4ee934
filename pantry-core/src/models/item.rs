use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// A locally stored pantry item.
///
/// Field names match the persisted blob, including blobs written before the
/// description/size/location/hot fields existed; those load as defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedItem {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_hot: bool,
}

impl ScannedItem {
    /// Creates an item with a fresh identifier.
    pub fn new(code: &str, fields: &ItemFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            quantity: fields.quantity,
            size: fields.size.clone(),
            location: fields.location.clone(),
            is_hot: fields.is_hot,
        }
    }
}

/// Raw text the user has typed into the naming step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub size: String,
    pub location: String,
    pub is_hot: bool,
}

impl NamingForm {
    /// Parse the form into item fields.
    ///
    /// The name must be non-empty and the quantity must parse as an integer
    /// exactly as typed.
    pub fn validate(&self) -> Result<ItemFields, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let quantity = self
            .quantity
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidQuantity(self.quantity.clone()))?;
        Ok(ItemFields {
            name: self.name.clone(),
            description: self.description.clone(),
            quantity,
            size: self.size.clone(),
            location: self.location.clone(),
            is_hot: self.is_hot,
        })
    }

    /// Whether the save action is enabled.
    pub fn can_save(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Validated item fields, ready to become an item or a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub size: String,
    pub location: String,
    pub is_hot: bool,
}

impl ItemFields {
    pub fn named(name: &str, quantity: i64) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            quantity,
            size: String::new(),
            location: String::new(),
            is_hot: false,
        }
    }
}

/// In-place edit of an existing item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub is_hot: Option<bool>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, item: &mut ScannedItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(size) = &self.size {
            item.size = size.clone();
        }
        if let Some(location) = &self.location {
            item.location = location.clone();
        }
        if let Some(is_hot) = self.is_hot {
            item.is_hot = is_hot;
        }
    }
}

/// Identifier of an entry in either store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemId {
    Local(Uuid),
    Remote(i64),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "{id}"),
            Self::Remote(id) => write!(f, "#{id}"),
        }
    }
}

/// Store-independent view of one entry, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryEntry {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub size: String,
    pub location: String,
    pub is_hot: bool,
}

impl From<&ScannedItem> for PantryEntry {
    fn from(item: &ScannedItem) -> Self {
        Self {
            id: ItemId::Local(item.id),
            code: item.code.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            size: item.size.clone(),
            location: item.location.clone(),
            is_hot: item.is_hot,
        }
    }
}
