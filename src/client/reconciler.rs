//! Optimistic mutation with exact rollback.
//!
//! The reconciler owns the commit protocol for client-side booking
//! mutations: apply the expected outcome to the cache synchronously,
//! submit the real request, then either refetch authoritative state or
//! restore the pre-mutation snapshot. A rolled-back mutation leaves the
//! touched entry byte-for-byte as if it had never been applied.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError, EventId, Timestamp};
use crate::ports::EventFilter;

use super::cache::{EventSnapshot, QueryCache};

/// Authoritative booking state returned by the server on commit.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub attendee_count: u32,
    pub booked_at: Timestamp,
}

/// Client-side transport to the booking backend.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Submits a booking for the calling user.
    async fn submit_booking(&self, event_id: &EventId) -> Result<BookingRecord, DomainError>;

    /// Fetches the authoritative calendar for a filter.
    async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<EventSnapshot>, DomainError>;
}

/// Lifecycle of one optimistic mutation. Committed and RolledBack are
/// terminal; a settled intent is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentState {
    Optimistic,
    Committed,
    RolledBack,
}

/// Settled outcome of `Reconciler::mutate`.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub state: IntentState,
    pub record: Option<BookingRecord>,
    pub error: Option<DomainError>,
}

/// Drives optimistic booking mutations against the query cache.
pub struct Reconciler {
    cache: Arc<QueryCache>,
    api: Arc<dyn BookingApi>,
}

impl Reconciler {
    pub fn new(cache: Arc<QueryCache>, api: Arc<dyn BookingApi>) -> Self {
        Self { cache, api }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Books a seat with an optimistic cache update.
    ///
    /// 1. Invalidate in-flight reads for the key so a racing fetch
    ///    cannot overwrite the optimistic state with stale data.
    /// 2. Snapshot the affected entry.
    /// 3. Apply the expected outcome synchronously (booked, count + 1).
    /// 4. Submit the real request.
    /// 5. Success: merge the authoritative record, then refetch the
    ///    whole key in the background of this call (best effort).
    /// 6. Failure: restore the snapshot exactly and surface the error.
    pub async fn mutate(&self, filter: &EventFilter, event_id: &EventId) -> MutationOutcome {
        let key = filter.signature();

        self.cache.invalidate(&key);
        let before = self.cache.snapshot_event(&key, event_id);

        self.cache.transform_event(&key, event_id, |s| {
            s.is_booked = true;
            s.attendee_count += 1;
        });

        match self.api.submit_booking(event_id).await {
            Ok(record) => {
                if let Some(mut snapshot) = self.cache.snapshot_event(&key, event_id) {
                    snapshot.attendee_count = record.attendee_count;
                    snapshot.is_booked = true;
                    snapshot.booking_id = Some(record.booking_id);
                    self.cache.apply_remote(&snapshot);
                }

                self.refetch(filter).await;

                MutationOutcome {
                    state: IntentState::Committed,
                    record: Some(record),
                    error: None,
                }
            }
            Err(error) => {
                if let Some(snapshot) = before {
                    self.cache.restore_event(&key, snapshot);
                }
                MutationOutcome {
                    state: IntentState::RolledBack,
                    record: None,
                    error: Some(error),
                }
            }
        }
    }

    /// Fetches the authoritative list for a filter and stores it unless
    /// a newer mutation invalidated the read while it was in flight.
    pub async fn refetch(&self, filter: &EventFilter) {
        let key = filter.signature();
        let generation = self.cache.read_generation(&key);
        match self.api.fetch_events(filter).await {
            Ok(events) => {
                if !self.cache.complete_read(&key, generation, events) {
                    tracing::debug!(key = %key, "Discarded stale refetch result");
                }
            }
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Refetch failed; keeping optimistic state");
            }
        }
    }

    /// Merges a change notification payload into the cache. Safe to call
    /// for records the cache has never seen and safe to call repeatedly.
    pub fn apply_remote(&self, record: &EventSnapshot) {
        self.cache.apply_remote(record);
    }
}
