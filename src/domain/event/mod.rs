//! Event aggregate - a capacity-limited calendar entry.
//!
//! The attendee count is derived from the set of confirmed bookings and
//! is never persisted redundantly; the `BookingStore` recomputes it inside
//! the same transactional scope that admits bookings.

mod events;

pub use events::{EventCreated, EventUpdated};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EventId, Timestamp, UserId, ValidationError};

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventCategory {
    Conference,
    Workshop,
    Seminar,
    Networking,
    Social,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventCategory::Conference => "CONFERENCE",
            EventCategory::Workshop => "WORKSHOP",
            EventCategory::Seminar => "SEMINAR",
            EventCategory::Networking => "NETWORKING",
            EventCategory::Social => "SOCIAL",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EventCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFERENCE" => Ok(EventCategory::Conference),
            "WORKSHOP" => Ok(EventCategory::Workshop),
            "SEMINAR" => Ok(EventCategory::Seminar),
            "NETWORKING" => Ok(EventCategory::Networking),
            "SOCIAL" => Ok(EventCategory::Social),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// Maximum number of confirmed bookings an event may hold.
///
/// Always positive; zero-capacity events cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a capacity, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::below_minimum("capacity", 1, 0));
        }
        Ok(Self(value))
    }

    /// Returns the inner value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A capacity-limited calendar event owned by its organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    description: String,
    date: Timestamp,
    location: String,
    category: EventCategory,
    capacity: Capacity,
    organizer_id: UserId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Event {
    /// Creates a new event, validating title and location.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        description: impl Into<String>,
        date: Timestamp,
        location: impl Into<String>,
        category: EventCategory,
        capacity: Capacity,
        organizer_id: UserId,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let location = location.into();
        if location.trim().is_empty() {
            return Err(ValidationError::empty_field("location"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            title,
            description: description.into(),
            date,
            location,
            category,
            capacity,
            organizer_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitutes an event from persisted state. No validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: EventId,
        title: String,
        description: String,
        date: Timestamp,
        location: String,
        category: EventCategory,
        capacity: Capacity,
        organizer_id: UserId,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            description,
            date,
            location,
            category,
            capacity,
            organizer_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> &Timestamp {
        &self.date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn organizer_id(&self) -> &UserId {
        &self.organizer_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Whether the given user owns this event.
    pub fn is_organized_by(&self, user_id: &UserId) -> bool {
        &self.organizer_id == user_id
    }

    /// Applies a reschedule/metadata change. Organizer authorization is
    /// checked by the caller; capacity floors are checked against the
    /// current confirmed count by the caller as well, since the count
    /// lives with the booking store.
    pub fn apply_update(&mut self, update: EventUpdate) -> Result<(), ValidationError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::empty_field("title"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(location) = update.location {
            if location.trim().is_empty() {
                return Err(ValidationError::empty_field("location"));
            }
            self.location = location;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Partial update applied by the organizer.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<Timestamp>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub capacity: Option<Capacity>,
}
