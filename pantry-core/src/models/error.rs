use thiserror::Error;

/// Errors raised by the camera and vision seam.
///
/// Decoder failures never stop a scan: the controller logs them and
/// treats the frame as carrying no payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera not available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Rejection reasons for the naming form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("quantity is not a whole number: {0:?}")]
    InvalidQuantity(String),

    #[error("no scanned code is waiting for a name")]
    NothingToSave,
}

/// Errors surfaced by the item stores and the pantry API client.
///
/// None of these are fatal. Every variant is shown to the user and control
/// returns to the previous state; recovery is always user-initiated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PantryError {
    #[error("duplicate barcode: {code}")]
    DuplicateBarcode { code: String },

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl PantryError {
    /// Every failure degrades to a visible message.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateBarcode { .. } => "This barcode has already been added.".into(),
            Self::Api { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            Self::Api { status, .. } => format!("The server rejected the request ({status})."),
            Self::Transport(_) => "Could not reach the pantry server. Please try again.".into(),
            Self::Validation(e) => e.to_string(),
            Self::Storage(_) => "Could not save your items on this device.".into(),
            Self::NotFound(_) => "That item no longer exists.".into(),
            Self::Capture(e) => format!("Camera problem: {e}"),
            Self::Configuration(_) => "The app is not set up correctly.".into(),
        }
    }
}
