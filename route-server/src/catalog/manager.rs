//! The catalog write path.
//!
//! All segment mutations go through the manager so that the route cache is
//! invalidated before the mutation is acknowledged: once a caller sees the
//! write succeed, no query can serve itineraries built from the segment's
//! old shape.
//!
//! Location writes pass through unchanged — location codes are immutable and
//! cached itineraries reference segments, not location records, so location
//! edits cannot invalidate a cached result.

use std::sync::Arc;

use tracing::info;

use crate::cache::RouteCache;
use crate::domain::{Location, LocationId, SegmentId, TransportSegment};

use super::error::CatalogError;
use super::store::{InMemoryCatalog, NewLocation, SegmentSpec, UpdateLocation};

/// Management facade over the catalog store and the route cache.
pub struct CatalogManager {
    catalog: Arc<InMemoryCatalog>,
    route_cache: Arc<RouteCache>,
}

impl CatalogManager {
    /// Create a manager over the given store and cache.
    pub fn new(catalog: Arc<InMemoryCatalog>, route_cache: Arc<RouteCache>) -> Self {
        Self {
            catalog,
            route_cache,
        }
    }

    // Locations

    /// Create a location.
    pub fn create_location(&self, new: NewLocation) -> Result<Location, CatalogError> {
        self.catalog.create_location(new)
    }

    /// Update a location's descriptive fields.
    pub fn update_location(
        &self,
        id: LocationId,
        update: UpdateLocation,
    ) -> Result<Location, CatalogError> {
        self.catalog.update_location(id, update)
    }

    /// Delete a location.
    pub fn delete_location(&self, id: LocationId) -> Result<(), CatalogError> {
        self.catalog.delete_location(id)
    }

    // Segments — every successful write invalidates the route cache before
    // returning.

    /// Create a segment.
    pub fn create_segment(&self, spec: SegmentSpec) -> Result<Arc<TransportSegment>, CatalogError> {
        let segment = self.catalog.create_segment(spec)?;
        self.invalidate_routes("segment created");
        Ok(segment)
    }

    /// Update a segment.
    pub fn update_segment(
        &self,
        id: SegmentId,
        spec: SegmentSpec,
    ) -> Result<Arc<TransportSegment>, CatalogError> {
        let segment = self.catalog.update_segment(id, spec)?;
        self.invalidate_routes("segment updated");
        Ok(segment)
    }

    /// Delete a segment.
    pub fn delete_segment(&self, id: SegmentId) -> Result<(), CatalogError> {
        self.catalog.delete_segment(id)?;
        self.invalidate_routes("segment deleted");
        Ok(())
    }

    fn invalidate_routes(&self, cause: &str) {
        self.route_cache.invalidate_all();
        info!(cause, "route cache invalidated");
    }
}
