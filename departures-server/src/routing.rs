use std::path::Path;

use axum::Router;
use departures_engine::ScheduleStore;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health::{router as health_router, HealthState};
use crate::routes::{router as board_router, BoardState};

/// Assembles the board API, the health probe and, when configured, the
/// static board client served from `public_dir`.
pub fn build_app(store: ScheduleStore, public_dir: Option<&Path>) -> Router {
    let board_router = board_router(BoardState::new(store.clone()));
    let health_router = health_router(HealthState::new(store));

    let mut router = Router::new().merge(board_router).merge(health_router);

    if let Some(dir) = public_dir {
        info!(dir = %dir.display(), "serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
