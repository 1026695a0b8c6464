//! Catalog store error types.

use crate::domain::{LocationCode, LocationId, SegmentId};
use crate::routing::RouteError;

/// Errors from the catalog store and its write path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// No location carries this code
    #[error("location not found with code: {0}")]
    LocationCodeNotFound(LocationCode),

    /// No location carries this identity
    #[error("location not found with id: {0}")]
    LocationNotFound(LocationId),

    /// Another location already carries this code
    #[error("location with code {0} already exists")]
    LocationCodeExists(LocationCode),

    /// The location is still referenced by segments
    #[error("location {0} is referenced by existing segments")]
    LocationInUse(LocationId),

    /// No segment carries this identity
    #[error("transportation segment not found with id: {0}")]
    SegmentNotFound(SegmentId),

    /// The store itself failed to answer
    #[error("catalog store unavailable: {0}")]
    Store(String),
}

impl From<CatalogError> for RouteError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::LocationCodeNotFound(code) => RouteError::LocationNotFound(code),
            other => RouteError::DataAccess(other.to_string()),
        }
    }
}
