/// Haptic/audio cue played when a payload is accepted.
pub trait ScanFeedback: Send + Sync {
    fn payload_accepted(&self);
}

/// Feedback sink for platforms without a vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl ScanFeedback for SilentFeedback {
    fn payload_accepted(&self) {
        log::trace!("scan feedback (silent)");
    }
}
