use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use departures_core::{Airline, BoardConfig, ReferenceData};
use rand::Rng;

use crate::error::ScheduleError;
use crate::flight::Flight;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const SLOT_MILLIS: i64 = 5 * 60 * 1000;
const FLIGHT_NUMBERS: std::ops::Range<u32> = 100..5000;

/// Produces randomized but plausible schedules from the reference directories.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    config: BoardConfig,
    reference: Arc<ReferenceData>,
    terminals: Vec<String>,
    airlines_by_country: HashMap<String, Vec<usize>>,
}

impl ScheduleGenerator {
    /// Validates the configuration and reference data up front so that
    /// generation itself cannot fail.
    pub fn new(config: BoardConfig, reference: Arc<ReferenceData>) -> Result<Self, ScheduleError> {
        config.validate()?;
        if reference.airports().is_empty() {
            return Err(ScheduleError::NoAirports);
        }
        if reference.airlines().is_empty() {
            return Err(ScheduleError::NoAirlines);
        }

        let terminals = config
            .terminals
            .iter()
            .map(|terminal| terminal.trim().to_string())
            .filter(|terminal| !terminal.is_empty())
            .collect();

        let mut airlines_by_country: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, airline) in reference.airlines().iter().enumerate() {
            airlines_by_country
                .entry(airline.country.clone())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            config,
            reference,
            terminals,
            airlines_by_country,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    /// A fresh schedule of `numFlights` flights sorted by scheduled time.
    pub fn generate<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> Vec<Flight> {
        let window_start = start_of_day(now);
        let mut flights: Vec<Flight> = (0..self.config.num_flights)
            .map(|_| self.generate_flight(rng, window_start))
            .collect();
        flights.sort_by_key(|flight| flight.time);
        flights
    }

    fn generate_flight<R: Rng>(&self, rng: &mut R, window_start: DateTime<Utc>) -> Flight {
        let airports = self.reference.airports();
        let airport = &airports[rng.gen_range(0..airports.len())];
        let airline = self.pick_airline(rng, &airport.country);
        let time = random_departure_time(rng, window_start, self.config.schedule_days);

        let flight_number = format!("{:04}", rng.gen_range(FLIGHT_NUMBERS));
        let terminal = &self.terminals[rng.gen_range(0..self.terminals.len())];
        let gate = format!("{}{:02}", terminal, rng.gen_range(1..=self.config.max_gate));

        let delay = if one_in(rng, self.config.delay_chance) {
            rng.gen_range(1..=self.config.max_delay)
        } else {
            0
        };
        let cancelled = one_in(rng, self.config.cancelled_chance);

        Flight::builder(&airline.code, flight_number, &airport.code, time)
            .gate(gate)
            .delay(delay)
            .cancelled(cancelled)
            .build()
    }

    /// Airlines sharing the destination's country, or any airline when the
    /// country has none.
    fn pick_airline<R: Rng>(&self, rng: &mut R, country: &str) -> &Airline {
        let airlines = self.reference.airlines();
        match self.airlines_by_country.get(country) {
            Some(candidates) if !candidates.is_empty() => {
                &airlines[candidates[rng.gen_range(0..candidates.len())]]
            }
            _ => &airlines[rng.gen_range(0..airlines.len())],
        }
    }
}

/// One-shot generation for callers that do not keep a generator around.
pub fn generate_schedule<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    config: &BoardConfig,
    reference: Arc<ReferenceData>,
) -> Result<Vec<Flight>, ScheduleError> {
    let generator = ScheduleGenerator::new(config.clone(), reference)?;
    Ok(generator.generate(rng, now))
}

/// Midnight (UTC) of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::default()))
}

/// Uniform instant in `[window_start, window_start + days)`, rounded down to
/// the 5 minute grid.
pub fn random_departure_time<R: Rng>(
    rng: &mut R,
    window_start: DateTime<Utc>,
    days: u32,
) -> DateTime<Utc> {
    let window = MILLIS_PER_DAY * i64::from(days.max(1));
    let offset = rng.gen_range(0..window);
    window_start + Duration::milliseconds(offset - offset.rem_euclid(SLOT_MILLIS))
}

fn one_in<R: Rng>(rng: &mut R, chance: u32) -> bool {
    rng.gen_range(1..=chance.max(1)) == 1
}
