//! Event command and query handlers.

mod create_event;
mod get_event;
mod list_events;
mod update_event;

pub use create_event::{CreateEventCommand, CreateEventHandler};
pub use get_event::GetEventHandler;
pub use list_events::ListEventsHandler;
pub use update_event::{UpdateEventCommand, UpdateEventHandler};
