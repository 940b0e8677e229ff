//! Pinning policy seam.

#[cfg(test)]
use mockall::automock;

use crate::models::AlertMetadata;

/// Decides whether a newly accepted or updated alert must be pinned.
#[cfg_attr(test, automock)]
pub trait PinPolicy: Send + Sync {
    /// Returns true if an entry with this metadata should be pinned.
    fn should_pin(&self, metadata: &AlertMetadata) -> bool;
}

/// The default policy: pin iff the notification carries a full-screen intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScreenPinPolicy;

impl PinPolicy for FullScreenPinPolicy {
    fn should_pin(&self, metadata: &AlertMetadata) -> bool {
        metadata.has_full_screen_intent
    }
}
