use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ConfigError;
use crate::serde_utils::read_json_file;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_CONFIG_PATH: &str = "data/config.json";
pub const DEFAULT_AIRLINES_PATH: &str = "data/airlines.json";
pub const DEFAULT_AIRPORTS_PATH: &str = "data/airports.json";

/// Longest generation window, in days.
pub const MAX_SCHEDULE_DAYS: u32 = 366;
/// Longest period accepted for either timer.
pub const MAX_CADENCE_SECONDS: f64 = 366.0 * 24.0 * 3600.0;

/// Tuning knobs for schedule generation, remarks cadence and the exposed view.
///
/// Keys are camelCase on disk so existing board configuration files load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Number of flights produced by each regeneration.
    pub num_flights: usize,
    /// Gate prefixes, one is picked per flight.
    pub terminals: Vec<String>,
    /// Upper bound (inclusive) of the two-digit gate number.
    pub max_gate: u32,
    /// A flight is delayed with probability `1 / delay_chance`.
    pub delay_chance: u32,
    /// Upper bound (inclusive) of a delay, in minutes.
    pub max_delay: u32,
    /// A flight is cancelled with probability `1 / cancelled_chance`.
    pub cancelled_chance: u32,
    pub refresh_schedule_hours: f64,
    pub update_remarks_seconds: f64,
    /// Minutes relative to departure (negative once departed) below which a
    /// flight is `done` and hidden from the exposed view.
    pub filter_start: i64,
    pub max_results: usize,
    /// Length of the generation window, starting at midnight today.
    pub schedule_days: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            num_flights: 200,
            terminals: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            max_gate: 40,
            delay_chance: 6,
            max_delay: 90,
            cancelled_chance: 40,
            refresh_schedule_hours: 24.0,
            update_remarks_seconds: 10.0,
            filter_start: -30,
            max_results: 100,
            schedule_days: 2,
        }
    }
}

impl BoardConfig {
    /// Reads a board configuration document. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json_file(path)
    }

    /// Applies `DEPARTURES_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(env_lookup)
    }

    /// Applies overrides resolved through `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        self.num_flights = override_value(&lookup, "DEPARTURES_NUM_FLIGHTS", self.num_flights)?;
        self.max_gate = override_value(&lookup, "DEPARTURES_MAX_GATE", self.max_gate)?;
        self.delay_chance = override_value(&lookup, "DEPARTURES_DELAY_CHANCE", self.delay_chance)?;
        self.max_delay = override_value(&lookup, "DEPARTURES_MAX_DELAY", self.max_delay)?;
        self.cancelled_chance =
            override_value(&lookup, "DEPARTURES_CANCELLED_CHANCE", self.cancelled_chance)?;
        self.refresh_schedule_hours = override_value(
            &lookup,
            "DEPARTURES_REFRESH_SCHEDULE_HOURS",
            self.refresh_schedule_hours,
        )?;
        self.update_remarks_seconds = override_value(
            &lookup,
            "DEPARTURES_UPDATE_REMARKS_SECONDS",
            self.update_remarks_seconds,
        )?;
        self.filter_start = override_value(&lookup, "DEPARTURES_FILTER_START", self.filter_start)?;
        self.max_results = override_value(&lookup, "DEPARTURES_MAX_RESULTS", self.max_results)?;
        self.schedule_days =
            override_value(&lookup, "DEPARTURES_SCHEDULE_DAYS", self.schedule_days)?;

        if let Some(terminals) = lookup("DEPARTURES_TERMINALS")?.map(|raw| split_list(&raw)) {
            if !terminals.is_empty() {
                self.terminals = terminals;
            }
        }

        Ok(self)
    }

    /// Rejects configurations that would make generation emit malformed flights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_flights == 0 {
            return Err(ConfigError::NonPositive("numFlights"));
        }
        if self.delay_chance == 0 {
            return Err(ConfigError::NonPositive("delayChance"));
        }
        if self.cancelled_chance == 0 {
            return Err(ConfigError::NonPositive("cancelledChance"));
        }
        if self.max_gate == 0 {
            return Err(ConfigError::NonPositive("maxGate"));
        }
        if self.max_delay == 0 {
            return Err(ConfigError::NonPositive("maxDelay"));
        }
        if self.max_results == 0 {
            return Err(ConfigError::NonPositive("maxResults"));
        }
        if self.schedule_days == 0 {
            return Err(ConfigError::NonPositive("scheduleDays"));
        }
        if self.schedule_days > MAX_SCHEDULE_DAYS {
            return Err(ConfigError::invalid(
                "scheduleDays",
                format!("must not exceed {MAX_SCHEDULE_DAYS}"),
            ));
        }
        if self.terminals.iter().all(|terminal| terminal.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "terminals",
                "at least one non-empty terminal label is required",
            ));
        }
        validate_cadence("refreshScheduleHours", self.refresh_schedule_hours * 3600.0)?;
        validate_cadence("updateRemarksSeconds", self.update_remarks_seconds)?;
        Ok(())
    }

    /// Period of the full schedule regeneration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_schedule_hours * 3600.0)
            .unwrap_or(Duration::from_secs(24 * 3600))
    }

    /// Period of the remarks recomputation.
    pub fn remarks_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.update_remarks_seconds).unwrap_or(Duration::from_secs(10))
    }
}

fn validate_cadence(key: &'static str, seconds: f64) -> Result<(), ConfigError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::NonPositive(key));
    }
    if seconds > MAX_CADENCE_SECONDS {
        return Err(ConfigError::invalid(
            key,
            format!("period must not exceed {MAX_CADENCE_SECONDS} seconds"),
        ));
    }
    Duration::try_from_secs_f64(seconds)
        .map(|_| ())
        .map_err(|err| ConfigError::invalid(key, err.to_string()))
}

/// Process level settings for the HTTP service and the files it reads.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    /// Explicitly configured board configuration path, if any.
    pub config_path: Option<PathBuf>,
    pub airlines_path: PathBuf,
    pub airports_path: PathBuf,
    pub public_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            config_path: None,
            airlines_path: PathBuf::from(DEFAULT_AIRLINES_PATH),
            airports_path: PathBuf::from(DEFAULT_AIRPORTS_PATH),
            public_dir: None,
            log_level: None,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = Self::default();
        let non_blank = |key: &'static str| -> Result<Option<String>, ConfigError> {
            Ok(lookup(key)?
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()))
        };

        Ok(Self {
            bind_address: non_blank("DEPARTURES_BIND")?.unwrap_or(defaults.bind_address),
            config_path: non_blank("DEPARTURES_CONFIG")?.map(PathBuf::from),
            airlines_path: non_blank("DEPARTURES_AIRLINES")?
                .map(PathBuf::from)
                .unwrap_or(defaults.airlines_path),
            airports_path: non_blank("DEPARTURES_AIRPORTS")?
                .map(PathBuf::from)
                .unwrap_or(defaults.airports_path),
            public_dir: non_blank("DEPARTURES_PUBLIC_DIR")?.map(PathBuf::from),
            log_level: non_blank("DEPARTURES_LOG")?,
        })
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// Resolves, overrides and validates the board configuration.
    ///
    /// An explicitly configured file must exist; the default location is optional.
    pub fn load_board_config(&self) -> Result<BoardConfig, ConfigError> {
        let base = match &self.config_path {
            Some(path) => BoardConfig::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    BoardConfig::from_file(path)?
                } else {
                    warn!(path = %path.display(), "board configuration not found, using defaults");
                    BoardConfig::default()
                }
            }
        };

        let config = base.apply_env_overrides()?;
        config.validate()?;
        info!(
            flights = config.num_flights,
            days = config.schedule_days,
            filter_start = config.filter_start,
            max_results = config.max_results,
            "board configuration loaded"
        );
        Ok(config)
    }
}

fn env_lookup(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::InvalidEnvVar { key, source: err }),
    }
}

fn override_value<T, F>(lookup: &F, key: &'static str, current: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, lookup(key)?, current)
}

fn parse_value<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(default)
            } else {
                T::from_str(trimmed).map_err(|err| ConfigError::invalid(key, err.to_string()))
            }
        }
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(
        pairs: &[(&'static str, &'static str)],
    ) -> impl Fn(&'static str) -> Result<Option<String>, ConfigError> {
        let map: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        move |key| Ok(map.get(key).cloned())
    }

    #[test]
    fn defaults_are_valid() {
        BoardConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"numFlights": 12, "terminals": ["T"], "filterStart": -45}}"#)
            .expect("write config");

        let config = BoardConfig::from_file(file.path()).expect("config loads");
        assert_eq!(config.num_flights, 12);
        assert_eq!(config.terminals, vec!["T".to_string()]);
        assert_eq!(config.filter_start, -45);
        assert_eq!(config.max_results, BoardConfig::default().max_results);
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = BoardConfig::default()
            .apply_overrides(lookup_from(&[
                ("DEPARTURES_NUM_FLIGHTS", "50"),
                ("DEPARTURES_FILTER_START", "-10"),
                ("DEPARTURES_TERMINALS", "N, S ,"),
                ("DEPARTURES_MAX_GATE", "  "),
            ]))
            .expect("overrides apply");

        assert_eq!(config.num_flights, 50);
        assert_eq!(config.filter_start, -10);
        assert_eq!(config.terminals, vec!["N".to_string(), "S".to_string()]);
        assert_eq!(config.max_gate, BoardConfig::default().max_gate);
    }

    #[test]
    fn unparsable_override_is_rejected() {
        let err = BoardConfig::default()
            .apply_overrides(lookup_from(&[("DEPARTURES_DELAY_CHANCE", "often")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "DEPARTURES_DELAY_CHANCE",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_denominators() {
        let config = BoardConfig {
            delay_chance: 0,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("delayChance"))
        ));

        let config = BoardConfig {
            cancelled_chance: 0,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("cancelledChance"))
        ));

        let config = BoardConfig {
            num_flights: 0,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive("numFlights"))
        ));
    }

    #[test]
    fn rejects_unusable_cadence() {
        let config = BoardConfig {
            update_remarks_seconds: 0.0,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BoardConfig {
            refresh_schedule_hours: f64::NAN,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_window_and_cadence() {
        let config = BoardConfig {
            schedule_days: 100_000_000,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "scheduleDays", .. })
        ));

        let config = BoardConfig {
            schedule_days: MAX_SCHEDULE_DAYS,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = BoardConfig {
            refresh_schedule_hours: 1e12,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "refreshScheduleHours", .. })
        ));

        let config = BoardConfig {
            update_remarks_seconds: 1e15,
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "updateRemarksSeconds", .. })
        ));
    }

    #[test]
    fn rejects_blank_terminals() {
        let config = BoardConfig {
            terminals: vec![" ".into()],
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "terminals", .. })
        ));
    }

    #[test]
    fn intervals_follow_cadence() {
        let config = BoardConfig {
            refresh_schedule_hours: 0.5,
            update_remarks_seconds: 2.5,
            ..BoardConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1800));
        assert_eq!(config.remarks_interval(), Duration::from_millis(2500));
    }

    #[test]
    fn service_config_uses_defaults_for_blank_values() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("DEPARTURES_BIND", " "),
            ("DEPARTURES_PUBLIC_DIR", "public"),
        ]))
        .expect("service config");

        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.public_dir, Some(PathBuf::from("public")));
        assert_eq!(config.airlines_path, PathBuf::from(DEFAULT_AIRLINES_PATH));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let config = ServiceConfig {
            config_path: Some(PathBuf::from("/definitely/not/here.json")),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.load_board_config(),
            Err(ConfigError::Io { .. })
        ));
    }
}
