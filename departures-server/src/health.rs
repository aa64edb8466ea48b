use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use departures_engine::{ScheduleStats, ScheduleStore};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    store: ScheduleStore,
}

impl HealthState {
    pub fn new(store: ScheduleStore) -> Self {
        Self { store }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    schedule: ScheduleStats,
}

pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<HealthState>) -> impl IntoResponse {
    let schedule = state.store.stats();
    let status = if schedule.generation > 0 {
        "ok"
    } else {
        "starting"
    };

    Json(HealthResponse { status, schedule })
}
