//! In-memory catalog of locations and transportation segments.
//!
//! The store is the in-process stand-in for the persistence collaborator:
//! it owns the entity records, assigns identities, and answers the read
//! contracts the route composer consumes. All shared access goes through a
//! single RwLock; a poisoned lock surfaces as a store error rather than a
//! panic.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::domain::{
    Location, LocationCode, LocationId, OperatingDays, SegmentId, TransportMode,
    TransportSegment, Weekday,
};
use crate::routing::{LocationDirectory, RouteError, SegmentCatalog};

use super::error::CatalogError;

/// Payload for creating a location.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub country: String,
    pub city: String,
    pub code: LocationCode,
}

/// Payload for updating a location.
///
/// Carries no code field: codes are immutable once assigned, because cached
/// route results join on them.
#[derive(Debug, Clone)]
pub struct UpdateLocation {
    pub name: String,
    pub country: String,
    pub city: String,
}

/// Payload for creating or replacing a segment.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub origin: LocationId,
    pub destination: LocationId,
    pub mode: TransportMode,
    pub operating_days: OperatingDays,
}

#[derive(Default)]
struct CatalogState {
    locations: HashMap<LocationId, Location>,
    codes: HashMap<LocationCode, LocationId>,
    segments: HashMap<SegmentId, Arc<TransportSegment>>,
    next_location_id: i64,
    next_segment_id: i64,
}

/// Thread-safe in-memory location and segment store.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, CatalogError> {
        self.inner
            .read()
            .map_err(|_| CatalogError::Store("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, CatalogError> {
        self.inner
            .write()
            .map_err(|_| CatalogError::Store("catalog lock poisoned".to_string()))
    }

    // Location reads

    /// All locations, ordered by identity.
    pub fn list_locations(&self) -> Result<Vec<Location>, CatalogError> {
        let state = self.read()?;
        let mut locations: Vec<Location> = state.locations.values().cloned().collect();
        locations.sort_by_key(|l| l.id);
        Ok(locations)
    }

    /// Look up a location by identity.
    pub fn location_by_id(&self, id: LocationId) -> Result<Location, CatalogError> {
        let state = self.read()?;
        state
            .locations
            .get(&id)
            .cloned()
            .ok_or(CatalogError::LocationNotFound(id))
    }

    /// Look up a location by code.
    pub fn location_by_code(&self, code: &LocationCode) -> Result<Location, CatalogError> {
        let state = self.read()?;
        state
            .codes
            .get(code)
            .and_then(|id| state.locations.get(id))
            .cloned()
            .ok_or_else(|| CatalogError::LocationCodeNotFound(code.clone()))
    }

    // Location writes

    /// Create a location, assigning its identity.
    pub fn create_location(&self, new: NewLocation) -> Result<Location, CatalogError> {
        let mut state = self.write()?;

        if state.codes.contains_key(&new.code) {
            return Err(CatalogError::LocationCodeExists(new.code));
        }

        state.next_location_id += 1;
        let id = LocationId(state.next_location_id);
        let location = Location {
            id,
            name: new.name,
            country: new.country,
            city: new.city,
            code: new.code,
        };

        state.codes.insert(location.code.clone(), id);
        state.locations.insert(id, location.clone());
        debug!(id = %id, code = %location.code, "location created");
        Ok(location)
    }

    /// Update a location's descriptive fields. The code is not updatable.
    pub fn update_location(
        &self,
        id: LocationId,
        update: UpdateLocation,
    ) -> Result<Location, CatalogError> {
        let mut state = self.write()?;

        let location = state
            .locations
            .get_mut(&id)
            .ok_or(CatalogError::LocationNotFound(id))?;

        location.name = update.name;
        location.country = update.country;
        location.city = update.city;
        Ok(location.clone())
    }

    /// Delete a location. Fails while any segment still references it.
    pub fn delete_location(&self, id: LocationId) -> Result<(), CatalogError> {
        let mut state = self.write()?;

        if !state.locations.contains_key(&id) {
            return Err(CatalogError::LocationNotFound(id));
        }

        let in_use = state
            .segments
            .values()
            .any(|s| s.origin == id || s.destination == id);
        if in_use {
            return Err(CatalogError::LocationInUse(id));
        }

        if let Some(location) = state.locations.remove(&id) {
            state.codes.remove(&location.code);
        }
        debug!(id = %id, "location deleted");
        Ok(())
    }

    // Segment reads

    /// All segments, ordered by identity.
    pub fn list_segments(&self) -> Result<Vec<Arc<TransportSegment>>, CatalogError> {
        let state = self.read()?;
        let mut segments: Vec<Arc<TransportSegment>> = state.segments.values().cloned().collect();
        segments.sort_by_key(|s| s.id);
        Ok(segments)
    }

    /// Look up a segment by identity.
    pub fn segment_by_id(&self, id: SegmentId) -> Result<Arc<TransportSegment>, CatalogError> {
        let state = self.read()?;
        state
            .segments
            .get(&id)
            .cloned()
            .ok_or(CatalogError::SegmentNotFound(id))
    }

    /// Segments running directly between two locations, ordered by identity.
    pub fn segments_between(
        &self,
        origin: LocationId,
        destination: LocationId,
    ) -> Result<Vec<Arc<TransportSegment>>, CatalogError> {
        let state = self.read()?;
        let mut segments: Vec<Arc<TransportSegment>> = state
            .segments
            .values()
            .filter(|s| s.origin == origin && s.destination == destination)
            .cloned()
            .collect();
        segments.sort_by_key(|s| s.id);
        Ok(segments)
    }

    /// Segments operating on a weekday, ordered by identity.
    pub fn segments_for_day(
        &self,
        day: Weekday,
    ) -> Result<Vec<Arc<TransportSegment>>, CatalogError> {
        let state = self.read()?;
        let mut segments: Vec<Arc<TransportSegment>> = state
            .segments
            .values()
            .filter(|s| s.operating_days.contains(day))
            .cloned()
            .collect();
        segments.sort_by_key(|s| s.id);
        Ok(segments)
    }

    /// Segments operating on a weekday from a given origin, ordered by
    /// identity.
    pub fn segments_for_day_from(
        &self,
        day: Weekday,
        origin: LocationId,
    ) -> Result<Vec<Arc<TransportSegment>>, CatalogError> {
        Ok(self
            .segments_for_day(day)?
            .into_iter()
            .filter(|s| s.origin == origin)
            .collect())
    }

    // Segment writes
    //
    // Callers that need cache invalidation go through `CatalogManager`;
    // these methods only maintain store consistency.

    /// Create a segment, assigning its identity. Both endpoints must exist.
    pub fn create_segment(&self, spec: SegmentSpec) -> Result<Arc<TransportSegment>, CatalogError> {
        let mut state = self.write()?;

        if !state.locations.contains_key(&spec.origin) {
            return Err(CatalogError::LocationNotFound(spec.origin));
        }
        if !state.locations.contains_key(&spec.destination) {
            return Err(CatalogError::LocationNotFound(spec.destination));
        }

        state.next_segment_id += 1;
        let id = SegmentId(state.next_segment_id);
        let segment = Arc::new(TransportSegment {
            id,
            origin: spec.origin,
            destination: spec.destination,
            mode: spec.mode,
            operating_days: spec.operating_days,
        });

        state.segments.insert(id, segment.clone());
        debug!(id = %id, mode = %segment.mode, "segment created");
        Ok(segment)
    }

    /// Replace a segment's schedule and endpoints.
    pub fn update_segment(
        &self,
        id: SegmentId,
        spec: SegmentSpec,
    ) -> Result<Arc<TransportSegment>, CatalogError> {
        let mut state = self.write()?;

        if !state.segments.contains_key(&id) {
            return Err(CatalogError::SegmentNotFound(id));
        }
        if !state.locations.contains_key(&spec.origin) {
            return Err(CatalogError::LocationNotFound(spec.origin));
        }
        if !state.locations.contains_key(&spec.destination) {
            return Err(CatalogError::LocationNotFound(spec.destination));
        }

        let segment = Arc::new(TransportSegment {
            id,
            origin: spec.origin,
            destination: spec.destination,
            mode: spec.mode,
            operating_days: spec.operating_days,
        });
        state.segments.insert(id, segment.clone());
        Ok(segment)
    }

    /// Delete a segment.
    pub fn delete_segment(&self, id: SegmentId) -> Result<(), CatalogError> {
        let mut state = self.write()?;
        state
            .segments
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::SegmentNotFound(id))
    }
}

impl LocationDirectory for InMemoryCatalog {
    fn resolve_by_code(&self, code: &LocationCode) -> Result<Location, RouteError> {
        self.location_by_code(code).map_err(RouteError::from)
    }
}

impl SegmentCatalog for InMemoryCatalog {
    fn segments_operating_on(
        &self,
        day: Weekday,
    ) -> Result<Vec<Arc<TransportSegment>>, RouteError> {
        self.segments_for_day(day).map_err(RouteError::from)
    }

    fn segments_operating_on_from(
        &self,
        day: Weekday,
        origin: LocationId,
    ) -> Result<Vec<Arc<TransportSegment>>, RouteError> {
        self.segments_for_day_from(day, origin)
            .map_err(RouteError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> LocationCode {
        LocationCode::parse(s).unwrap()
    }

    fn new_location(name: &str, code_str: &str) -> NewLocation {
        NewLocation {
            name: name.to_string(),
            country: "Turkey".to_string(),
            city: "Istanbul".to_string(),
            code: code(code_str),
        }
    }

    fn spec(origin: LocationId, destination: LocationId, mode: TransportMode) -> SegmentSpec {
        SegmentSpec {
            origin,
            destination,
            mode,
            operating_days: OperatingDays::every_day(),
        }
    }

    #[test]
    fn create_and_resolve_location() {
        let catalog = InMemoryCatalog::new();
        let created = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();

        let by_id = catalog.location_by_id(created.id).unwrap();
        assert_eq!(by_id, created);

        let by_code = catalog.location_by_code(&code("IST")).unwrap();
        assert_eq!(by_code, created);
    }

    #[test]
    fn duplicate_code_rejected() {
        let catalog = InMemoryCatalog::new();
        catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();

        let err = catalog
            .create_location(new_location("Impostor", "IST"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::LocationCodeExists(_)));
    }

    #[test]
    fn update_keeps_code() {
        let catalog = InMemoryCatalog::new();
        let created = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();

        let updated = catalog
            .update_location(
                created.id,
                UpdateLocation {
                    name: "Istanbul Grand Airport".to_string(),
                    country: "Turkey".to_string(),
                    city: "Istanbul".to_string(),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Istanbul Grand Airport");
        assert_eq!(updated.code, created.code);
        assert_eq!(
            catalog.location_by_code(&code("IST")).unwrap().id,
            created.id
        );
    }

    #[test]
    fn delete_location_in_use_rejected() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
        let lhr = catalog
            .create_location(new_location("Heathrow Airport", "LHR"))
            .unwrap();
        catalog
            .create_segment(spec(ist.id, lhr.id, TransportMode::Flight))
            .unwrap();

        let err = catalog.delete_location(ist.id).unwrap_err();
        assert!(matches!(err, CatalogError::LocationInUse(_)));

        // Destination endpoint counts as a reference too.
        let err = catalog.delete_location(lhr.id).unwrap_err();
        assert!(matches!(err, CatalogError::LocationInUse(_)));
    }

    #[test]
    fn delete_unreferenced_location() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();

        catalog.delete_location(ist.id).unwrap();
        assert!(matches!(
            catalog.location_by_id(ist.id),
            Err(CatalogError::LocationNotFound(_))
        ));
        // The code is free again.
        catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
    }

    #[test]
    fn segment_requires_existing_endpoints() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();

        let err = catalog
            .create_segment(spec(ist.id, LocationId(999), TransportMode::Flight))
            .unwrap_err();
        assert!(matches!(err, CatalogError::LocationNotFound(LocationId(999))));
    }

    #[test]
    fn segments_for_day_filters_by_schedule() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
        let lhr = catalog
            .create_location(new_location("Heathrow Airport", "LHR"))
            .unwrap();

        catalog
            .create_segment(SegmentSpec {
                origin: ist.id,
                destination: lhr.id,
                mode: TransportMode::Flight,
                operating_days: OperatingDays::from_numbers([1, 2, 3]).unwrap(),
            })
            .unwrap();
        catalog
            .create_segment(SegmentSpec {
                origin: lhr.id,
                destination: ist.id,
                mode: TransportMode::Flight,
                operating_days: OperatingDays::from_numbers([6, 7]).unwrap(),
            })
            .unwrap();

        let monday = Weekday::new(1).unwrap();
        let found = catalog.segments_for_day(monday).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].origin, ist.id);

        let sunday = Weekday::new(7).unwrap();
        let found = catalog.segments_for_day(sunday).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].origin, lhr.id);
    }

    #[test]
    fn segments_for_day_from_restricts_origin() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
        let lhr = catalog
            .create_location(new_location("Heathrow Airport", "LHR"))
            .unwrap();

        catalog
            .create_segment(spec(ist.id, lhr.id, TransportMode::Flight))
            .unwrap();
        catalog
            .create_segment(spec(lhr.id, ist.id, TransportMode::Flight))
            .unwrap();

        let monday = Weekday::new(1).unwrap();
        let from_ist = catalog.segments_for_day_from(monday, ist.id).unwrap();
        assert_eq!(from_ist.len(), 1);
        assert_eq!(from_ist[0].origin, ist.id);
    }

    #[test]
    fn segments_between_endpoints() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
        let lhr = catalog
            .create_location(new_location("Heathrow Airport", "LHR"))
            .unwrap();

        let flight = catalog
            .create_segment(spec(ist.id, lhr.id, TransportMode::Flight))
            .unwrap();
        catalog
            .create_segment(spec(lhr.id, ist.id, TransportMode::Flight))
            .unwrap();

        let between = catalog.segments_between(ist.id, lhr.id).unwrap();
        assert_eq!(between.len(), 1);
        assert_eq!(between[0].id, flight.id);
    }

    #[test]
    fn update_segment_replaces_fields() {
        let catalog = InMemoryCatalog::new();
        let ist = catalog
            .create_location(new_location("Istanbul Airport", "IST"))
            .unwrap();
        let lhr = catalog
            .create_location(new_location("Heathrow Airport", "LHR"))
            .unwrap();

        let segment = catalog
            .create_segment(spec(ist.id, lhr.id, TransportMode::Flight))
            .unwrap();

        let updated = catalog
            .update_segment(
                segment.id,
                SegmentSpec {
                    origin: ist.id,
                    destination: lhr.id,
                    mode: TransportMode::Flight,
                    operating_days: OperatingDays::from_numbers([5]).unwrap(),
                },
            )
            .unwrap();

        assert_eq!(updated.id, segment.id);
        assert!(updated.operating_days.contains(Weekday::new(5).unwrap()));
        assert!(!updated.operating_days.contains(Weekday::new(1).unwrap()));
    }

    #[test]
    fn delete_missing_segment() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.delete_segment(SegmentId(42)).unwrap_err();
        assert!(matches!(err, CatalogError::SegmentNotFound(SegmentId(42))));
    }
}
