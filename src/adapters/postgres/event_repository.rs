//! PostgreSQL implementation of EventRepository.
//!
//! Every read joins the bookings table so the attendee count is always
//! computed from the confirmed rows visible to the same statement.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::event::{Capacity, Event, EventCategory};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp, UserId};
use crate::ports::{EventFilter, EventRepository, EventWithCount};

/// PostgreSQL implementation of EventRepository.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a new PostgresEventRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_WITH_COUNT_SELECT: &str = r#"
    SELECT e.id, e.title, e.description, e.date, e.location, e.category,
           e.capacity, e.organizer_id, e.created_at, e.updated_at,
           COUNT(b.id) FILTER (WHERE b.status = 'CONFIRMED') AS attendee_count
    FROM events e
    LEFT JOIN bookings b ON b.event_id = e.id
"#;

const EVENT_GROUP_BY: &str = r#"
    GROUP BY e.id, e.title, e.description, e.date, e.location, e.category,
             e.capacity, e.organizer_id, e.created_at, e.updated_at
"#;

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn save(&self, event: &Event) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, date, location, category,
                capacity, organizer_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(event.description())
        .bind(event.date().as_datetime())
        .bind(event.location())
        .bind(event.category().to_string())
        .bind(event.capacity().get() as i32)
        .bind(event.organizer_id().as_str())
        .bind(event.created_at().as_datetime())
        .bind(event.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert event", e))?;

        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE events SET
                title = $2,
                description = $3,
                date = $4,
                location = $5,
                category = $6,
                capacity = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.title())
        .bind(event.description())
        .bind(event.date().as_datetime())
        .bind(event.location())
        .bind(event.category().to_string())
        .bind(event.capacity().get() as i32)
        .bind(event.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update event", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<EventWithCount>, DomainError> {
        let sql = format!("{} WHERE e.id = $1 {}", EVENT_WITH_COUNT_SELECT, EVENT_GROUP_BY);

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch event", e))?;

        row.map(row_to_event_with_count).transpose()
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<EventWithCount>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR e.category = $1)
              AND ($2::text IS NULL OR e.location ILIKE '%' || $2 || '%')
              AND ($3::timestamptz IS NULL OR e.date >= $3)
              AND ($4::timestamptz IS NULL OR e.date <= $4)
              AND ($5::text IS NULL
                   OR e.title ILIKE '%' || $5 || '%'
                   OR e.description ILIKE '%' || $5 || '%'
                   OR e.location ILIKE '%' || $5 || '%')
            {}
            ORDER BY e.date ASC
            "#,
            EVENT_WITH_COUNT_SELECT, EVENT_GROUP_BY
        );

        let rows = sqlx::query(&sql)
            .bind(filter.category.map(|c| c.to_string()))
            .bind(filter.location.as_deref())
            .bind(filter.start_date.map(|t| *t.as_datetime()))
            .bind(filter.end_date.map(|t| *t.as_datetime()))
            .bind(filter.search.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list events", e))?;

        rows.into_iter().map(row_to_event_with_count).collect()
    }

    async fn delete(&self, id: &EventId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete event", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

pub(super) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn get_column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(&format!("Failed to get column '{}'", name), e))
}

pub(super) fn row_to_event_with_count(row: PgRow) -> Result<EventWithCount, DomainError> {
    let event = row_to_event(&row)?;
    let attendee_count: i64 = get_column(&row, "attendee_count")?;
    Ok(EventWithCount {
        event,
        attendee_count: attendee_count as u32,
    })
}

pub(super) fn row_to_event(row: &PgRow) -> Result<Event, DomainError> {
    let id: uuid::Uuid = get_column(row, "id")?;
    let title: String = get_column(row, "title")?;
    let description: String = get_column(row, "description")?;
    let date: chrono::DateTime<chrono::Utc> = get_column(row, "date")?;
    let location: String = get_column(row, "location")?;
    let category_str: String = get_column(row, "category")?;
    let capacity: i32 = get_column(row, "capacity")?;
    let organizer_id: String = get_column(row, "organizer_id")?;
    let created_at: chrono::DateTime<chrono::Utc> = get_column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = get_column(row, "updated_at")?;

    let category: EventCategory = category_str
        .parse()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid category: {}", e)))?;
    let capacity = Capacity::new(capacity as u32)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid capacity: {}", e)))?;
    let organizer_id = UserId::new(organizer_id)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid organizer_id: {}", e)))?;

    Ok(Event::from_parts(
        EventId::from_uuid(id),
        title,
        description,
        Timestamp::from_datetime(date),
        location,
        category,
        capacity,
        organizer_id,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
