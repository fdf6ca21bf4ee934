/// Scan controller state machine.
///
/// State transitions:
/// ```text
/// idle → scanning → awaiting name ──(save / cancel)──→ idle
///            │    → showing duplicate ──(dismiss)───→ idle
///            └──(stop)──→ idle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    AwaitingName { pending_code: String },
    ShowingDuplicate { code: String },
}

impl ScanState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning)
    }

    pub fn is_awaiting_name(&self) -> bool {
        matches!(self, Self::AwaitingName { .. })
    }

    pub fn is_showing_duplicate(&self) -> bool {
        matches!(self, Self::ShowingDuplicate { .. })
    }

    /// The decoded payload waiting for a name, if any.
    pub fn pending_code(&self) -> Option<&str> {
        match self {
            Self::AwaitingName { pending_code } => Some(pending_code),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::AwaitingName { .. } => "awaiting-name",
            Self::ShowingDuplicate { .. } => "showing-duplicate",
        }
    }
}

/// How the user answered the duplicate notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateResolution {
    Dismiss,
    /// Navigate to the entry that already carries the barcode.
    ViewExisting,
}
