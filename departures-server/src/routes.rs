use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use departures_core::{Airline, Airport};
use departures_engine::{Flight, ScheduleStore};
use tracing::debug;

#[derive(Clone)]
pub struct BoardState {
    store: ScheduleStore,
}

impl BoardState {
    pub fn new(store: ScheduleStore) -> Self {
        Self { store }
    }
}

pub fn router(state: BoardState) -> Router {
    Router::new()
        .route("/airlines", get(list_airlines))
        .route("/airports", get(list_airports))
        .route("/schedule", get(current_schedule))
        .with_state(state)
}

async fn list_airlines(State(state): State<BoardState>) -> Json<Vec<Airline>> {
    Json(state.store.reference().airlines().to_vec())
}

async fn list_airports(State(state): State<BoardState>) -> Json<Vec<Airport>> {
    Json(state.store.reference().airports().to_vec())
}

async fn current_schedule(State(state): State<BoardState>) -> Json<Vec<Flight>> {
    let flights = state.store.view();
    debug!(flights = flights.len(), "serving schedule view");
    Json(flights)
}
