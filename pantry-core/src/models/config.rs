use std::path::PathBuf;

/// Pantry API collection endpoint used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://www.chriscalver.com/ApiTest/api/Pantry";

/// Storage key of the locally persisted collection.
pub const DEFAULT_STORAGE_KEY: &str = "scannedItems";

/// Which item store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Local,
    Remote,
}

/// Configuration, assembled by the composition root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryConfiguration {
    /// Pantry collection endpoint (`GET`/`POST` target).
    pub api_base_url: String,

    /// Directory holding the local blob.
    pub storage_directory: PathBuf,

    /// Key (file stem) of the local blob.
    pub storage_key: String,

    pub backend: StoreBackend,

    /// Reject scans whose normalized payload is already stored (default: true).
    pub enforce_unique_barcodes: bool,
}

impl PantryConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err("API base URL must not be empty".into());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("unsupported API base URL: {url}"));
        }
        if self.storage_key.is_empty() {
            return Err("storage key must not be empty".into());
        }
        if self.storage_key.contains(['/', '\\']) || self.storage_key == ".." {
            return Err(format!("invalid storage key: {}", self.storage_key));
        }
        Ok(())
    }
}

impl Default for PantryConfiguration {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            storage_directory: PathBuf::from("."),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            backend: StoreBackend::Local,
            enforce_unique_barcodes: true,
        }
    }
}
