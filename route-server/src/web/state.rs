//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRouteFinder;
use crate::catalog::{CatalogManager, InMemoryCatalog};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The catalog store (reads).
    pub catalog: Arc<InMemoryCatalog>,

    /// The catalog write path with its invalidation hooks.
    pub manager: Arc<CatalogManager>,

    /// Cached route finder.
    pub finder: Arc<CachedRouteFinder<InMemoryCatalog>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        catalog: Arc<InMemoryCatalog>,
        manager: CatalogManager,
        finder: CachedRouteFinder<InMemoryCatalog>,
    ) -> Self {
        Self {
            catalog,
            manager: Arc::new(manager),
            finder: Arc::new(finder),
        }
    }
}
