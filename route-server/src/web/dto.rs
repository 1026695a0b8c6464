//! Data transfer objects for web requests and responses.
//!
//! The wire format is camelCase and mirrors the management API this service
//! replaces; routes are serialized as nested arrays of segment objects.

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

use crate::catalog::{CatalogError, InMemoryCatalog};
use crate::domain::{
    Itinerary, Location, LocationCode, OperatingDays, TransportMode, TransportSegment,
};

/// Query parameters for route search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSearchParams {
    /// Origin location code.
    pub origin_code: LocationCode,

    /// Destination location code.
    pub destination_code: LocationCode,

    /// Travel date, ISO 8601 (e.g. "2025-04-07").
    pub travel_date: NaiveDate,
}

/// Query parameters for direct segment search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSearchParams {
    pub origin_code: LocationCode,
    pub destination_code: LocationCode,
}

/// Query parameters for the by-origin segment listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentsByOriginParams {
    pub origin_code: LocationCode,

    /// Date whose weekday filters the schedule.
    pub date: NaiveDate,
}

/// A location on the wire.
#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub city: String,
    pub code: String,
}

impl LocationDto {
    pub fn from_location(location: &Location) -> Self {
        Self {
            id: location.id.0,
            name: location.name.clone(),
            country: location.country.clone(),
            city: location.city.clone(),
            code: location.code.as_str().to_string(),
        }
    }
}

/// Request body for creating a location.
#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub country: String,
    pub city: String,
    pub code: LocationCode,
}

/// Request body for updating a location.
///
/// No code field: codes are immutable once assigned.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub name: String,
    pub country: String,
    pub city: String,
}

/// A transportation segment on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDto {
    pub id: i64,
    pub origin_location_id: i64,
    pub origin_location_code: String,
    pub destination_location_id: i64,
    pub destination_location_code: String,
    pub transportation_type: TransportMode,
    pub operating_days: OperatingDays,
}

impl SegmentDto {
    /// Render a segment, resolving its endpoint codes via the catalog.
    pub fn resolve(
        segment: &TransportSegment,
        catalog: &InMemoryCatalog,
    ) -> Result<Self, CatalogError> {
        let origin = catalog.location_by_id(segment.origin)?;
        let destination = catalog.location_by_id(segment.destination)?;

        Ok(Self {
            id: segment.id.0,
            origin_location_id: origin.id.0,
            origin_location_code: origin.code.as_str().to_string(),
            destination_location_id: destination.id.0,
            destination_location_code: destination.code.as_str().to_string(),
            transportation_type: segment.mode,
            operating_days: segment.operating_days,
        })
    }
}

/// Request body for creating or updating a segment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRequest {
    pub origin_location_id: i64,
    pub destination_location_id: i64,
    pub transportation_type: TransportMode,
    pub operating_days: OperatingDays,
}

/// One found route: its segments in travel order.
pub type RouteDto = Vec<SegmentDto>;

/// Render a list of itineraries as nested segment arrays.
pub fn routes_to_dto(
    itineraries: &[Itinerary],
    catalog: &InMemoryCatalog,
) -> Result<Vec<RouteDto>, CatalogError> {
    itineraries
        .iter()
        .map(|itinerary| {
            itinerary
                .segments()
                .iter()
                .map(|segment| SegmentDto::resolve(segment, catalog))
                .collect()
        })
        .collect()
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
