//! Departures engine - schedule lifecycle and remarks derivation.

pub mod error;
pub mod flight;
pub mod generator;
pub mod remarks;
pub mod runtime;
pub mod store;
pub mod view;

pub use error::ScheduleError;
pub use flight::{Flight, FlightBuilder, Remarks};
pub use generator::{generate_schedule, ScheduleGenerator};
pub use remarks::{minutes_until_departure, RemarksCondition, RemarksEngine, RemarksRule};
pub use runtime::BoardRuntime;
pub use store::{ScheduleStats, ScheduleStore};
pub use view::current_view;
