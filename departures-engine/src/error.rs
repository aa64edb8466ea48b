use departures_core::ConfigError;
use thiserror::Error;

/// Errors raised while building a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no candidate airports to generate flights for")]
    NoAirports,
    #[error("no candidate airlines to assign to flights")]
    NoAirlines,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
