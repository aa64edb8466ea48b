//! Core shared library for the departures board.
//!
//! This crate exposes the primitives the engine, server and CLI depend
//! on: board and service configuration, common errors, static reference
//! data (airlines and airports), JSON helpers and logging setup.

pub mod config;
pub mod errors;
pub mod logging;
pub mod reference;
pub mod serde_utils;

pub use config::{BoardConfig, ServiceConfig};
pub use errors::{ConfigError, DeparturesError, Result as CoreResult};
pub use reference::{Airline, Airport, ReferenceData};
