//! Scheduled transportation segments: the edges of the route graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{LocationId, OperatingDays};

/// Stable identity of a transportation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub i64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of transportation a segment provides.
///
/// The route validity rule only ever distinguishes flights from everything
/// else; new kinds are added as variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Flight,
    Bus,
    Subway,
    RideHail,
}

impl TransportMode {
    /// True for the mandatory central leg kind.
    pub fn is_flight(self) -> bool {
        matches!(self, TransportMode::Flight)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportMode::Flight => "FLIGHT",
            TransportMode::Bus => "BUS",
            TransportMode::Subway => "SUBWAY",
            TransportMode::RideHail => "RIDE_HAIL",
        };
        f.write_str(s)
    }
}

/// A scheduled, directed edge between two locations.
///
/// Locations are referenced by identity, not embedded; the catalog owns the
/// location records. A segment with origin == destination is structurally
/// permitted; the composition rule never selects one into a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSegment {
    /// Stable identity.
    pub id: SegmentId,

    /// Where the segment departs from.
    pub origin: LocationId,

    /// Where the segment arrives.
    pub destination: LocationId,

    /// The kind of transportation.
    pub mode: TransportMode,

    /// Which weekdays the segment runs on.
    pub operating_days: OperatingDays,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serde_strings() {
        assert_eq!(
            serde_json::to_string(&TransportMode::Flight).unwrap(),
            "\"FLIGHT\""
        );
        assert_eq!(
            serde_json::to_string(&TransportMode::RideHail).unwrap(),
            "\"RIDE_HAIL\""
        );

        let mode: TransportMode = serde_json::from_str("\"SUBWAY\"").unwrap();
        assert_eq!(mode, TransportMode::Subway);

        assert!(serde_json::from_str::<TransportMode>("\"TRAIN\"").is_err());
    }

    #[test]
    fn is_flight() {
        assert!(TransportMode::Flight.is_flight());
        assert!(!TransportMode::Bus.is_flight());
        assert!(!TransportMode::Subway.is_flight());
        assert!(!TransportMode::RideHail.is_flight());
    }

    #[test]
    fn display() {
        assert_eq!(TransportMode::Bus.to_string(), "BUS");
        assert_eq!(TransportMode::RideHail.to_string(), "RIDE_HAIL");
    }
}
