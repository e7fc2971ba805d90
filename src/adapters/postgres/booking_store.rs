//! PostgreSQL implementation of BookingStore.
//!
//! Admission runs inside a transaction that takes a row lock on the
//! event, so concurrent submissions for the same event serialize at the
//! database. The duplicate check, the capacity check, and the insert all
//! observe the same locked state; a failed step rolls the whole unit
//! back. A UNIQUE (event_id, user_id) constraint backs the duplicate
//! check as a last line of defense.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::booking::{Booking, BookingStatus, RebookPolicy};
use crate::domain::event::Event;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, EventId, Timestamp, UserId,
};
use crate::ports::{AdmittedBooking, BookingFilter, BookingStore, BookingWithEvent, EventWithCount};

use super::event_repository::{db_error, row_to_event};

/// PostgreSQL implementation of BookingStore.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgresBookingStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn try_admit(
        &self,
        event: &Event,
        user_id: &UserId,
        policy: RebookPolicy,
    ) -> Result<AdmittedBooking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin admission transaction", e))?;

        // Lock the event row. All admissions for this event queue here,
        // which makes the checks below race-free.
        let locked = sqlx::query("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
            .bind(event.id().as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to lock event for admission", e))?;

        let capacity: i32 = match locked {
            Some(row) => row
                .try_get("capacity")
                .map_err(|e| db_error("Failed to get column 'capacity'", e))?,
            None => {
                return Err(DomainError::new(
                    ErrorCode::EventNotFound,
                    format!("Event not found: {}", event.id()),
                ))
            }
        };
        let capacity = capacity as u32;

        let existing = sqlx::query(
            "SELECT id, event_id, user_id, status, booked_at FROM bookings \
             WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event.id().as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to check existing booking", e))?;

        if let Some(row) = existing {
            let mut booking = row_to_booking(&row)?;
            let rebookable = policy == RebookPolicy::AllowAfterCancellation
                && booking.status() == BookingStatus::Cancelled;
            if !rebookable {
                return Err(DomainError::new(
                    ErrorCode::DuplicateBooking,
                    "You have already booked this event",
                ));
            }

            let confirmed = count_confirmed_in_tx(&mut tx, event.id()).await?;
            if confirmed >= capacity {
                return Err(DomainError::capacity_exceeded(confirmed, capacity));
            }

            booking.reactivate();
            sqlx::query("UPDATE bookings SET status = $2, booked_at = $3 WHERE id = $1")
                .bind(booking.id().as_uuid())
                .bind(booking.status().to_string())
                .bind(booking.booked_at().as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to reactivate booking", e))?;

            let attendee_count = count_confirmed_in_tx(&mut tx, event.id()).await?;
            tx.commit()
                .await
                .map_err(|e| db_error("Failed to commit admission", e))?;

            return Ok(AdmittedBooking {
                booking,
                attendee_count,
            });
        }

        let confirmed = count_confirmed_in_tx(&mut tx, event.id()).await?;
        if confirmed >= capacity {
            return Err(DomainError::capacity_exceeded(confirmed, capacity));
        }

        let booking = Booking::confirmed(*event.id(), user_id.clone());
        sqlx::query(
            "INSERT INTO bookings (id, event_id, user_id, status, booked_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(booking.id().as_uuid())
        .bind(booking.event_id().as_uuid())
        .bind(booking.user_id().as_str())
        .bind(booking.status().to_string())
        .bind(booking.booked_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DomainError::new(
                ErrorCode::DuplicateBooking,
                "You have already booked this event",
            ),
            other => db_error("Failed to insert booking", other),
        })?;

        let attendee_count = count_confirmed_in_tx(&mut tx, event.id()).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit admission", e))?;

        Ok(AdmittedBooking {
            booking,
            attendee_count,
        })
    }

    async fn find_by_event_and_user(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Booking>, DomainError> {
        let row = sqlx::query(
            "SELECT id, event_id, user_id, status, booked_at FROM bookings \
             WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch booking", e))?;

        row.map(|r| row_to_booking(&r)).transpose()
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row = sqlx::query(
            "SELECT id, event_id, user_id, status, booked_at FROM bookings WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch booking", e))?;

        row.map(|r| row_to_booking(&r)).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        filter: &BookingFilter,
    ) -> Result<Vec<BookingWithEvent>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT b.id AS booking_id, b.status AS booking_status, b.booked_at,
                   e.id, e.title, e.description, e.date, e.location, e.category,
                   e.capacity, e.organizer_id, e.created_at, e.updated_at,
                   (SELECT COUNT(*) FROM bookings c
                     WHERE c.event_id = e.id AND c.status = 'CONFIRMED') AS attendee_count
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            WHERE b.user_id = $1
              AND ($2::text IS NULL OR b.status = $2)
              AND ($3::boolean IS NULL OR (e.date > NOW()) = $3)
            ORDER BY b.booked_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.upcoming)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list bookings", e))?;

        rows.into_iter()
            .map(|row| row_to_booking_with_event(&row, user_id))
            .collect()
    }

    async fn mark_cancelled(&self, id: &BookingId) -> Result<AdmittedBooking, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin cancellation transaction", e))?;

        let row = sqlx::query(
            "UPDATE bookings SET status = 'CANCELLED' WHERE id = $1 \
             RETURNING id, event_id, user_id, status, booked_at",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to cancel booking", e))?;

        let booking = match row {
            Some(row) => row_to_booking(&row)?,
            None => {
                return Err(DomainError::new(
                    ErrorCode::BookingNotFound,
                    format!("Booking not found: {}", id),
                ))
            }
        };

        let attendee_count = count_confirmed_in_tx(&mut tx, booking.event_id()).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit cancellation", e))?;

        Ok(AdmittedBooking {
            booking,
            attendee_count,
        })
    }

    async fn count_confirmed(&self, event_id: &EventId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings WHERE event_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(event_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count confirmed bookings", e))?;

        Ok(result.0 as u32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

async fn count_confirmed_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    event_id: &EventId,
) -> Result<u32, DomainError> {
    let result: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM bookings WHERE event_id = $1 AND status = 'CONFIRMED'",
    )
    .bind(event_id.as_uuid())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to count confirmed bookings", e))?;

    Ok(result.0 as u32)
}

fn row_to_booking(row: &PgRow) -> Result<Booking, DomainError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| db_error("Failed to get column 'id'", e))?;
    let event_id: uuid::Uuid = row
        .try_get("event_id")
        .map_err(|e| db_error("Failed to get column 'event_id'", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| db_error("Failed to get column 'user_id'", e))?;
    let status_str: String = row
        .try_get("status")
        .map_err(|e| db_error("Failed to get column 'status'", e))?;
    let booked_at: chrono::DateTime<chrono::Utc> = row
        .try_get("booked_at")
        .map_err(|e| db_error("Failed to get column 'booked_at'", e))?;

    let status: BookingStatus = status_str
        .parse()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid status: {}", e)))?;
    let user_id = UserId::new(user_id)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e)))?;

    Ok(Booking::from_parts(
        BookingId::from_uuid(id),
        EventId::from_uuid(event_id),
        user_id,
        status,
        Timestamp::from_datetime(booked_at),
    ))
}

fn row_to_booking_with_event(row: &PgRow, user_id: &UserId) -> Result<BookingWithEvent, DomainError> {
    let booking_id: uuid::Uuid = row
        .try_get("booking_id")
        .map_err(|e| db_error("Failed to get column 'booking_id'", e))?;
    let status_str: String = row
        .try_get("booking_status")
        .map_err(|e| db_error("Failed to get column 'booking_status'", e))?;
    let booked_at: chrono::DateTime<chrono::Utc> = row
        .try_get("booked_at")
        .map_err(|e| db_error("Failed to get column 'booked_at'", e))?;

    let status: BookingStatus = status_str
        .parse()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid status: {}", e)))?;

    let event = row_to_event(row)?;
    let attendee_count: i64 = row
        .try_get("attendee_count")
        .map_err(|e| db_error("Failed to get column 'attendee_count'", e))?;

    let booking = Booking::from_parts(
        BookingId::from_uuid(booking_id),
        *event.id(),
        user_id.clone(),
        status,
        Timestamp::from_datetime(booked_at),
    );

    Ok(BookingWithEvent {
        booking,
        event: EventWithCount {
            event,
            attendee_count: attendee_count as u32,
        },
    })
}
