//! Booking and notification configuration

use serde::Deserialize;

use crate::domain::booking::RebookPolicy;

use super::error::ValidationError;

/// Booking behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Whether a cancelled booking blocks rebooking the same event
    #[serde(default)]
    pub rebook_policy: RebookPolicy,

    /// Per-topic broadcast channel capacity for change notifications.
    /// A receiver that falls further behind than this drops its oldest
    /// notifications.
    #[serde(default = "default_notify_channel_capacity")]
    pub notify_channel_capacity: usize,
}

impl BookingConfig {
    /// Validate booking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.notify_channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            rebook_policy: RebookPolicy::default(),
            notify_channel_capacity: default_notify_channel_capacity(),
        }
    }
}

fn default_notify_channel_capacity() -> usize {
    128
}
