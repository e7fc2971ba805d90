//! Booking command and query handlers.

mod cancel_booking;
mod list_user_bookings;
mod submit_booking;

pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler};
pub use list_user_bookings::{ListUserBookingsHandler, ListUserBookingsQuery};
pub use submit_booking::{SubmitBookingCommand, SubmitBookingHandler, SubmitBookingResult};
