//! ListUserBookingsHandler - the caller's bookings joined with events.

use std::sync::Arc;

use crate::domain::booking::BookingStatus;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{BookingFilter, BookingStore, BookingWithEvent};

/// Query for the caller's bookings.
#[derive(Debug, Clone)]
pub struct ListUserBookingsQuery {
    pub user_id: UserId,
    pub status: Option<BookingStatus>,
    /// `Some(true)` keeps upcoming events, `Some(false)` past ones.
    pub upcoming: Option<bool>,
}

/// Handler for the booking list query.
pub struct ListUserBookingsHandler {
    bookings: Arc<dyn BookingStore>,
}

impl ListUserBookingsHandler {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }

    pub async fn handle(
        &self,
        query: ListUserBookingsQuery,
    ) -> Result<Vec<BookingWithEvent>, DomainError> {
        let filter = BookingFilter {
            status: query.status,
            upcoming: query.upcoming,
        };
        self.bookings.find_by_user(&query.user_id, &filter).await
    }
}
