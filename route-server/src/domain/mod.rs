//! Domain types for the route composition engine.
//!
//! This module contains the core domain model: locations, scheduled
//! transportation segments, operating-day sets and composed itineraries.
//! Types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod days;
mod error;
mod itinerary;
mod location;
mod segment;

pub use days::{InvalidWeekday, OperatingDays, Weekday};
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use location::{InvalidLocationCode, Location, LocationCode, LocationId};
pub use segment::{SegmentId, TransportMode, TransportSegment};
