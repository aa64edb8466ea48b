//! Departures: simulated airport departures board.
//!
//! The board keeps a synthetic schedule of departing flights in memory,
//! regenerates it on a slow cadence and recomputes each flight's remarks
//! (check-in, boarding, final call, departed...) on a fast one.
//!
//! # Architecture
//!
//! * `departures-core`: board and service configuration, errors, reference
//!   data (airlines and airports), JSON helpers and logging setup
//! * `departures-engine`: schedule generation, the remarks chain, the shared
//!   schedule store, the exposed view and the periodic runtime
//! * `departures-server`: HTTP endpoints over the store
//! * `departures-cli`: the `departures` command-line board

pub use departures_core as core;
pub use departures_engine as engine;

// Commonly used symbols
pub use departures_core::{Airline, Airport, BoardConfig, ReferenceData, ServiceConfig};
pub use departures_engine::{
    current_view, BoardRuntime, Flight, Remarks, RemarksEngine, ScheduleGenerator, ScheduleStore,
};
