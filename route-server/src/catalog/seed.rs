//! Seed data loading.
//!
//! Optionally populates the catalog from a JSON file at startup, so a fresh
//! process has a network to answer queries against. Segments reference
//! locations by code; the file is meant to be written by hand.
//!
//! ```json
//! {
//!   "locations": [
//!     { "name": "Istanbul Airport", "country": "Turkey",
//!       "city": "Istanbul", "code": "IST" }
//!   ],
//!   "segments": [
//!     { "origin": "IST", "destination": "LHR",
//!       "mode": "FLIGHT", "operatingDays": [1, 2, 3, 4, 5] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::{LocationCode, OperatingDays, TransportMode};

use super::error::CatalogError;
use super::store::{InMemoryCatalog, NewLocation, SegmentSpec};

/// Errors from seed file loading.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Could not read the seed file
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid JSON of the expected shape
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A segment references a code the file does not define
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    locations: Vec<SeedLocation>,

    #[serde(default)]
    segments: Vec<SeedSegment>,
}

#[derive(Debug, Deserialize)]
struct SeedLocation {
    name: String,
    country: String,
    city: String,
    code: LocationCode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedSegment {
    origin: LocationCode,
    destination: LocationCode,
    mode: TransportMode,
    operating_days: OperatingDays,
}

/// Counts of what a seed load inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub locations: usize,
    pub segments: usize,
}

/// Load a seed file into the catalog.
///
/// Locations are created first; segments then resolve their endpoint codes
/// against the catalog, so they may also reference locations that already
/// existed before the load.
pub fn load_seed_file(
    catalog: &InMemoryCatalog,
    path: impl AsRef<Path>,
) -> Result<SeedReport, SeedError> {
    let json = std::fs::read_to_string(path)?;
    let file: SeedFile = serde_json::from_str(&json)?;

    let mut report = SeedReport {
        locations: 0,
        segments: 0,
    };

    for location in file.locations {
        catalog.create_location(NewLocation {
            name: location.name,
            country: location.country,
            city: location.city,
            code: location.code,
        })?;
        report.locations += 1;
    }

    for segment in file.segments {
        let origin = catalog.location_by_code(&segment.origin)?;
        let destination = catalog.location_by_code(&segment.destination)?;
        catalog.create_segment(SegmentSpec {
            origin: origin.id,
            destination: destination.id,
            mode: segment.mode,
            operating_days: segment.operating_days,
        })?;
        report.segments += 1;
    }

    Ok(report)
}
