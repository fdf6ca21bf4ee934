//! Client for the pantry REST API.
//!
//! ```text
//! RemoteRepository ──spawn──→ [pantry-* thread] PantryApi → PantryTransport
//!        ↑                                │
//!        └── apply_completion ← EventQueue ┘ (control thread)
//! ```

pub mod api;
pub mod remote_repository;

use crate::models::error::PantryError;
use crate::models::record::PantryRecord;

/// Result of one pantry API round trip, posted back to the control thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCompletion {
    Fetched(Result<Vec<PantryRecord>, PantryError>),
    Created {
        code: String,
        result: Result<(), PantryError>,
    },
    Updated {
        id: i64,
        result: Result<(), PantryError>,
    },
    Deleted {
        id: i64,
        result: Result<(), PantryError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    FetchAll,
    Create { code: String },
    Update { id: i64 },
    Delete { id: i64 },
}

/// How a remote operation resolved, as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOutcome {
    pub operation: RemoteOperation,
    pub result: Result<(), PantryError>,
}

impl RemoteOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
