//! Client-side calendar cache and optimistic mutation protocol.
//!
//! A thin, transport-agnostic client core: `QueryCache` holds versioned
//! snapshots keyed by query signature, and `Reconciler` applies booking
//! mutations optimistically, rolling back exactly when the server
//! rejects them and converging on authoritative state when it commits.
//! Change notifications from the live calendar feed in through
//! `Reconciler::apply_remote`.

pub mod cache;
pub mod reconciler;

pub use cache::{EventSnapshot, QueryCache};
pub use reconciler::{BookingApi, BookingRecord, IntentState, MutationOutcome, Reconciler};
