//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how committed mutations are handed to the Change
//! Notifier without knowing about the underlying transport.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once to each currently-registered
///   handler (handlers may receive duplicates)
/// - Delivery is best-effort overall: there is no backlog or replay for
///   handlers registered after a publish
/// - Errors are propagated to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    ///
    /// Callers invoke this strictly after the state change it describes
    /// has committed.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events sequentially with best-effort delivery.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}
}
