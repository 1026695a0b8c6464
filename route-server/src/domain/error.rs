//! Domain error types.
//!
//! These represent structural violations caught at construction time,
//! distinct from store/IO errors.

use super::LocationId;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no segments
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// Consecutive segments don't connect
    #[error("segments do not connect: arrival at location {0} followed by departure from {1}")]
    SegmentsNotConnected(LocationId, LocationId),
}
