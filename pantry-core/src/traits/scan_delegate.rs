use crate::models::error::PantryError;
use crate::models::state::ScanState;
use crate::remote::RemoteOutcome;

/// Event delegate for the presentation layer.
///
/// All methods are called on the control thread, from inside
/// `ScanController` operations or its event processing.
pub trait ScanDelegate: Send + Sync {
    /// Called after every state transition.
    fn on_state_changed(&self, state: &ScanState);

    /// Called when the listed entries may have changed.
    fn on_items_changed(&self, count: usize);

    /// Called when a remote operation resolves.
    fn on_remote_outcome(&self, outcome: &RemoteOutcome);

    /// Called with every user-visible failure.
    fn on_error(&self, error: &PantryError);
}
