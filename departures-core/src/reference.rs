//! Static airline and airport directories.
//!
//! The board only needs a code and a country from each entry; everything else
//! (localized names, native spellings, language tags) is carried through
//! untouched so the HTTP passthrough endpoints return the files verbatim.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConfigError;
use crate::serde_utils::read_json_file;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub code: String,
    pub country: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Airline {
    pub fn new(code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            country: country.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub country: String,
    /// Whether the destination has a full-screen wallpaper on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Airport {
    pub fn new(code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            country: country.into(),
            featured: None,
            extra: Map::new(),
        }
    }
}

/// Airline and airport directories loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    airlines: Vec<Airline>,
    airports: Vec<Airport>,
    airport_index: HashMap<String, usize>,
}

impl ReferenceData {
    pub fn new(airlines: Vec<Airline>, airports: Vec<Airport>) -> Self {
        let airport_index = airports
            .iter()
            .enumerate()
            .map(|(idx, airport)| (airport.code.clone(), idx))
            .collect();

        Self {
            airlines,
            airports,
            airport_index,
        }
    }

    /// Loads both directories and rejects empty ones.
    pub fn load(
        airlines_path: impl AsRef<Path>,
        airports_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let airlines = load_airlines(airlines_path)?;
        let airports = load_airports(airports_path)?;
        let data = Self::new(airlines, airports);
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.airlines.is_empty() {
            return Err(ConfigError::EmptyReference("airlines"));
        }
        if self.airports.is_empty() {
            return Err(ConfigError::EmptyReference("airports"));
        }
        Ok(())
    }

    pub fn airlines(&self) -> &[Airline] {
        &self.airlines
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airport_index
            .get(code)
            .and_then(|idx| self.airports.get(*idx))
    }
}

/// Accepts either the wrapped document (`{"airlines": [...]}`) or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum AirlineFile {
    Document { airlines: Vec<Airline> },
    List(Vec<Airline>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AirportFile {
    Document { airports: Vec<Airport> },
    List(Vec<Airport>),
}

pub fn load_airlines(path: impl AsRef<Path>) -> Result<Vec<Airline>, ConfigError> {
    Ok(match read_json_file::<AirlineFile>(path)? {
        AirlineFile::Document { airlines } => airlines,
        AirlineFile::List(airlines) => airlines,
    })
}

pub fn load_airports(path: impl AsRef<Path>) -> Result<Vec<Airport>, ConfigError> {
    Ok(match read_json_file::<AirportFile>(path)? {
        AirportFile::Document { airports } => airports,
        AirportFile::List(airports) => airports,
    })
}
