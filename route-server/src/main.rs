use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::{CacheConfig, CachedRouteFinder, RouteCache};
use route_server::catalog::{CatalogManager, InMemoryCatalog, load_seed_file};
use route_server::web::{AppState, create_router};

/// Environment variable naming an optional JSON seed file.
const SEED_FILE_VAR: &str = "ROUTE_SEED_FILE";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Catalog store, optionally seeded from disk
    let catalog = Arc::new(InMemoryCatalog::new());
    if let Ok(path) = std::env::var(SEED_FILE_VAR) {
        match load_seed_file(&catalog, &path) {
            Ok(report) => info!(
                path = %path,
                locations = report.locations,
                segments = report.segments,
                "seed data loaded"
            ),
            Err(e) => {
                warn!(path = %path, error = %e, "failed to load seed data, starting empty");
            }
        }
    }

    // Route cache, shared between the finder and the mutation path
    let cache = Arc::new(RouteCache::new(&CacheConfig::default()));
    let finder = CachedRouteFinder::new(catalog.clone(), cache.clone());
    let manager = CatalogManager::new(catalog.clone(), cache);

    // Build app state and router
    let state = AppState::new(catalog, manager, finder);
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    info!(%addr, "route server listening");
    info!("  GET  /health                  - health check");
    info!("  GET  /routes/search           - find routes (originCode, destinationCode, travelDate)");
    info!("  CRUD /locations               - manage locations");
    info!("  CRUD /transportations         - manage segments");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("server terminated unexpectedly");
}
