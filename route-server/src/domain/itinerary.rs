//! Itinerary types.
//!
//! An `Itinerary` is one complete journey: an ordered chain of transportation
//! segments where each segment departs from the location the previous one
//! arrived at.

use std::sync::Arc;

use super::{DomainError, LocationId, TransportSegment};

/// A complete journey from origin to destination.
///
/// Segments are shared handles into the catalog snapshot the journey was
/// composed from; an itinerary is derived data and is never persisted.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (destination of one = origin of next)
#[derive(Debug, Clone)]
pub struct Itinerary {
    segments: Vec<Arc<TransportSegment>>,
}

impl Itinerary {
    /// Constructs an itinerary, validating the connectivity invariant.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the segment list is empty or two consecutive
    /// segments don't share the intermediate location.
    pub fn new(segments: Vec<Arc<TransportSegment>>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for window in segments.windows(2) {
            if window[0].destination != window[1].origin {
                return Err(DomainError::SegmentsNotConnected(
                    window[0].destination,
                    window[1].origin,
                ));
            }
        }

        Ok(Itinerary { segments })
    }

    /// The segments in travel order.
    pub fn segments(&self) -> &[Arc<TransportSegment>] {
        &self.segments
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Where the journey starts.
    pub fn origin(&self) -> LocationId {
        // Safe: validated non-empty at construction
        self.segments.first().unwrap().origin
    }

    /// Where the journey ends.
    pub fn destination(&self) -> LocationId {
        // Safe: validated non-empty at construction
        self.segments.last().unwrap().destination
    }

    /// Number of flight legs in the journey.
    pub fn flight_count(&self) -> usize {
        self.segments.iter().filter(|s| s.mode.is_flight()).count()
    }
}
