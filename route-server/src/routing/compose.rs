//! Flight-centric route composition.
//!
//! Finds every valid multi-leg journey between two locations on a travel
//! date. A valid journey is built around exactly one flight: the flight may
//! be preceded by at most one ground transfer and followed by at most one
//! ground transfer, all legs must connect end to end, and every leg must
//! operate on the weekday the travel date falls on.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Itinerary, Location, LocationCode, LocationId, TransportSegment, Weekday};

/// Error from route composition.
///
/// Zero matching itineraries is not an error; the composer returns an empty
/// list for that.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouteError {
    /// An endpoint code does not name a known location
    #[error("location not found with code: {0}")]
    LocationNotFound(LocationCode),

    /// The directory or catalog failed to answer
    #[error("data access failure: {0}")]
    DataAccess(String),
}

/// Resolves location codes to location records.
///
/// This abstraction keeps the composer testable against mock data; the
/// production implementation is the catalog store.
pub trait LocationDirectory {
    /// Resolve a code to its location.
    ///
    /// Fails with [`RouteError::LocationNotFound`] naming the code when it
    /// is unknown.
    fn resolve_by_code(&self, code: &LocationCode) -> Result<Location, RouteError>;
}

/// Provides scheduled segments filtered by operating day.
pub trait SegmentCatalog {
    /// All segments operating on the given weekday.
    fn segments_operating_on(&self, day: Weekday)
    -> Result<Vec<Arc<TransportSegment>>, RouteError>;

    /// Segments operating on the given weekday that depart from `origin`.
    fn segments_operating_on_from(
        &self,
        day: Weekday,
        origin: LocationId,
    ) -> Result<Vec<Arc<TransportSegment>>, RouteError>;
}

/// The route composition engine.
///
/// Stateless: every query resolves its endpoints and loads its candidate
/// segments fresh, so concurrent queries share nothing but the collaborators.
pub struct RouteComposer<'a, D, C> {
    directory: &'a D,
    catalog: &'a C,
}

impl<'a, D: LocationDirectory, C: SegmentCatalog> RouteComposer<'a, D, C> {
    /// Create a composer over the given collaborators.
    pub fn new(directory: &'a D, catalog: &'a C) -> Self {
        Self { directory, catalog }
    }

    /// Find all valid routes from `origin_code` to `destination_code` on
    /// `travel_date`.
    ///
    /// Results are ordered by flight, then by rule (direct, before+flight,
    /// flight+after, before+flight+after), then by transfer enumeration
    /// order. The order is stable but carries no further meaning.
    ///
    /// # Errors
    ///
    /// - [`RouteError::LocationNotFound`] if either code fails to resolve
    /// - [`RouteError::DataAccess`] if a collaborator lookup fails
    pub fn find_routes(
        &self,
        origin_code: &LocationCode,
        destination_code: &LocationCode,
        travel_date: NaiveDate,
    ) -> Result<Vec<Itinerary>, RouteError> {
        let origin = self.directory.resolve_by_code(origin_code)?;
        let destination = self.directory.resolve_by_code(destination_code)?;

        let day = Weekday::from_date(travel_date);
        let candidates = self.catalog.segments_operating_on(day)?;

        let (flights, transfers): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|s| s.mode.is_flight());

        let mut routes = Vec::new();
        for flight in &flights {
            self.routes_around_flight(&origin, &destination, flight, &transfers, &mut routes);
        }

        debug!(
            origin = %origin.code,
            destination = %destination.code,
            day = %day,
            flights = flights.len(),
            transfers = transfers.len(),
            routes = routes.len(),
            "composed routes"
        );

        Ok(routes)
    }

    /// Build every itinerary that uses `flight` as the mandatory central leg.
    fn routes_around_flight(
        &self,
        origin: &Location,
        destination: &Location,
        flight: &Arc<TransportSegment>,
        transfers: &[Arc<TransportSegment>],
        routes: &mut Vec<Itinerary>,
    ) {
        let departs_at_origin = flight.origin == origin.id;
        let arrives_at_destination = flight.destination == destination.id;

        // Case 1: the flight alone connects origin and destination.
        if departs_at_origin && arrives_at_destination {
            push_route(routes, vec![flight.clone()]);
        }

        // Case 2: ground transfer to the flight's origin, then the flight.
        if arrives_at_destination {
            for before in before_options(origin, flight, transfers) {
                push_route(routes, vec![before.clone(), flight.clone()]);
            }
        }

        // Case 3: the flight, then a ground transfer to the destination.
        if departs_at_origin {
            for after in after_options(flight, destination, transfers) {
                push_route(routes, vec![flight.clone(), after.clone()]);
            }
        }

        // Case 4: transfer, flight, transfer.
        for before in before_options(origin, flight, transfers) {
            for after in after_options(flight, destination, transfers) {
                push_route(
                    routes,
                    vec![before.clone(), flight.clone(), after.clone()],
                );
            }
        }
    }
}

/// Transfers that take the traveller from the query origin to the flight's
/// origin.
fn before_options<'t>(
    origin: &Location,
    flight: &TransportSegment,
    transfers: &'t [Arc<TransportSegment>],
) -> impl Iterator<Item = &'t Arc<TransportSegment>> {
    let from = origin.id;
    let to = flight.origin;
    transfers
        .iter()
        .filter(move |t| t.origin == from && t.destination == to)
}

/// Transfers that take the traveller from the flight's destination to the
/// query destination.
fn after_options<'t>(
    flight: &TransportSegment,
    destination: &Location,
    transfers: &'t [Arc<TransportSegment>],
) -> impl Iterator<Item = &'t Arc<TransportSegment>> {
    let from = flight.destination;
    let to = destination.id;
    transfers
        .iter()
        .filter(move |t| t.origin == from && t.destination == to)
}

/// Segment chains built by the rule cases connect by construction; a failed
/// validation here would be a composer bug, so it is dropped rather than
/// surfaced to the caller.
fn push_route(routes: &mut Vec<Itinerary>, segments: Vec<Arc<TransportSegment>>) {
    if let Ok(itinerary) = Itinerary::new(segments) {
        routes.push(itinerary);
    }
}
