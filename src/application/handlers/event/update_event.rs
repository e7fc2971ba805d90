//! UpdateEventHandler - organizer-only reschedule and capacity change.
//!
//! A plain authorize-then-write operation. The only cross-aggregate rule
//! is the capacity floor: capacity may not drop below the current
//! confirmed count, or the durable-state invariant would be violated the
//! moment the write lands.

use std::sync::Arc;

use crate::domain::event::{Event, EventUpdate, EventUpdated};
use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, NotificationId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::ports::{EventPublisher, EventRepository};

/// Command to update an event's metadata, schedule, or capacity.
#[derive(Debug, Clone)]
pub struct UpdateEventCommand {
    pub event_id: EventId,
    pub user_id: UserId,
    pub update: EventUpdate,
}

/// Handler for organizer updates.
pub struct UpdateEventHandler {
    events: Arc<dyn EventRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl UpdateEventHandler {
    pub fn new(events: Arc<dyn EventRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { events, publisher }
    }

    pub async fn handle(&self, cmd: UpdateEventCommand) -> Result<Event, DomainError> {
        let existing = self
            .events
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::EventNotFound,
                    format!("Event not found: {}", cmd.event_id),
                )
            })?;

        if !existing.event.is_organized_by(&cmd.user_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Not authorized to update this event",
            ));
        }

        if let Some(capacity) = &cmd.update.capacity {
            if capacity.get() < existing.attendee_count {
                return Err(DomainError::validation(
                    "capacity",
                    format!(
                        "Capacity {} is below the current confirmed count {}",
                        capacity, existing.attendee_count
                    ),
                ));
            }
        }

        let mut event = existing.event;
        event.apply_update(cmd.update)?;
        self.events.update(&event).await?;

        tracing::info!(event_id = %event.id(), user_id = %cmd.user_id, "Event updated");

        let updated = EventUpdated {
            notification_id: NotificationId::new(),
            event_id: *event.id(),
            event: event.clone(),
            attendee_count: existing.attendee_count,
            occurred_at: Timestamp::now(),
        };
        let envelope = updated.to_envelope().with_user_id(cmd.user_id.to_string());
        if let Err(e) = self.publisher.publish(envelope).await {
            tracing::warn!(event_id = %event.id(), error = %e, "Failed to publish event.updated notification");
        }

        Ok(event)
    }
}
