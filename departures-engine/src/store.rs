use std::sync::Arc;

use chrono::{DateTime, Utc};
use departures_core::{BoardConfig, ReferenceData, ServiceConfig};
use parking_lot::RwLock;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::error::ScheduleError;
use crate::flight::Flight;
use crate::generator::ScheduleGenerator;
use crate::remarks::RemarksEngine;
use crate::view::current_view;

/// Bookkeeping about the schedule currently held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    /// Number of regenerations since startup.
    pub generation: u64,
    /// Number of remarks refreshes since startup.
    pub refreshes: u64,
    pub flights: usize,
    pub generated_at: Option<DateTime<Utc>>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct ScheduleState {
    flights: Vec<Flight>,
    stats: ScheduleStats,
}

/// Shared owner of the schedule.
///
/// A regeneration builds and annotates the new sequence before taking the
/// write lock, so readers see either the old schedule or the complete new one.
/// Remarks refreshes mutate flights in place under the same lock.
#[derive(Clone)]
pub struct ScheduleStore {
    state: Arc<RwLock<ScheduleState>>,
    generator: Arc<ScheduleGenerator>,
    remarks: Arc<RemarksEngine>,
}

impl ScheduleStore {
    /// Creates an empty store. Fails on invalid configuration or empty
    /// reference directories.
    pub fn new(config: BoardConfig, reference: Arc<ReferenceData>) -> Result<Self, ScheduleError> {
        let remarks = RemarksEngine::standard(config.filter_start);
        let generator = ScheduleGenerator::new(config, reference)?;

        Ok(Self {
            state: Arc::new(RwLock::new(ScheduleState::default())),
            generator: Arc::new(generator),
            remarks: Arc::new(remarks),
        })
    }

    /// Resolves the board configuration and reference files named by the
    /// service configuration.
    pub fn from_service_config(config: &ServiceConfig) -> Result<Self, ScheduleError> {
        let board = config.load_board_config()?;
        let reference = ReferenceData::load(&config.airlines_path, &config.airports_path)?;
        info!(
            airlines = reference.airlines().len(),
            airports = reference.airports().len(),
            "reference data loaded"
        );
        Self::new(board, Arc::new(reference))
    }

    pub fn config(&self) -> &BoardConfig {
        self.generator.config()
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        self.generator.reference()
    }

    /// Replaces the whole schedule with a freshly generated one.
    pub fn regenerate(&self, now: DateTime<Utc>) -> ScheduleStats {
        self.regenerate_with(&mut rand::thread_rng(), now)
    }

    pub fn regenerate_with<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> ScheduleStats {
        let mut flights = self.generator.generate(rng, now);
        self.remarks.refresh(&mut flights, now);

        let stats = {
            let mut state = self.state.write();
            state.stats.generation += 1;
            state.stats.flights = flights.len();
            state.stats.generated_at = Some(now);
            state.stats.refreshed_at = Some(now);
            state.flights = flights;
            state.stats.clone()
        };

        info!(
            generation = stats.generation,
            flights = stats.flights,
            "schedule regenerated"
        );
        stats
    }

    /// Recomputes minutes and remarks for every flight as of `now`.
    pub fn refresh_remarks(&self, now: DateTime<Utc>) {
        let mut state = self.state.write();
        let ScheduleState { flights, stats } = &mut *state;
        self.remarks.refresh(flights, now);
        stats.refreshes += 1;
        stats.refreshed_at = Some(now);
    }

    /// Filtered and capped copy of the schedule; empty before the first generation.
    pub fn view(&self) -> Vec<Flight> {
        let config = self.generator.config();
        let state = self.state.read();
        current_view(&state.flights, config.filter_start, config.max_results)
    }

    /// Full copy of the schedule, including flights hidden from the view.
    pub fn snapshot(&self) -> Vec<Flight> {
        self.state.read().flights.clone()
    }

    pub fn stats(&self) -> ScheduleStats {
        self.state.read().stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::Remarks;
    use chrono::{Duration, TimeZone};
    use departures_core::{Airline, Airport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store(config: BoardConfig) -> ScheduleStore {
        let reference = Arc::new(ReferenceData::new(
            vec![Airline::new("AC", "CA"), Airline::new("AF", "FR")],
            vec![Airport::new("YUL", "CA"), Airport::new("CDG", "FR")],
        ));
        ScheduleStore::new(config, reference).expect("store")
    }

    fn small_config() -> BoardConfig {
        BoardConfig {
            num_flights: 120,
            max_results: 25,
            ..BoardConfig::default()
        }
    }

    #[test]
    fn view_is_empty_before_first_generation() {
        let store = store(small_config());
        assert!(store.view().is_empty());
        assert_eq!(store.stats(), ScheduleStats::default());

        store.refresh_remarks(now());
        assert!(store.view().is_empty());
    }

    #[test]
    fn regeneration_replaces_every_flight() {
        let store = store(small_config());
        let mut rng = StdRng::seed_from_u64(42);

        store.regenerate_with(&mut rng, now());
        let before: HashSet<_> = store.snapshot().iter().map(|flight| flight.id).collect();

        let stats = store.regenerate_with(&mut rng, now());
        let after = store.snapshot();

        assert_eq!(stats.generation, 2);
        assert_eq!(after.len(), 120);
        assert!(after.iter().all(|flight| !before.contains(&flight.id)));
        assert!(after.windows(2).all(|pair| pair[0].time <= pair[1].time));
    }

    #[test]
    fn regenerated_schedule_is_annotated_immediately() {
        let store = store(small_config());
        store.regenerate_with(&mut StdRng::seed_from_u64(1), now());

        assert!(store
            .snapshot()
            .iter()
            .all(|flight| flight.remarks.is_some() && flight.minutes_until_departure.is_some()));
    }

    #[test]
    fn view_respects_cap_and_filter() {
        let store = store(small_config());
        store.regenerate_with(&mut StdRng::seed_from_u64(9), now());

        let later = now() + Duration::hours(20);
        store.refresh_remarks(later);

        let view = store.view();
        assert!(view.len() <= 25);
        assert!(view
            .iter()
            .all(|flight| flight.minutes_until_departure.unwrap_or(i64::MIN) > -30));
        assert!(view.iter().all(|flight| flight.remarks != Some(Remarks::Done)));

        let expected: Vec<_> = store
            .snapshot()
            .into_iter()
            .filter(|flight| flight.minutes_until_departure.unwrap_or(i64::MIN) > -30)
            .take(25)
            .map(|flight| flight.id)
            .collect();
        let actual: Vec<_> = view.into_iter().map(|flight| flight.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn refresh_keeps_order_and_identity() {
        let store = store(small_config());
        store.regenerate_with(&mut StdRng::seed_from_u64(3), now());
        let ids: Vec<_> = store.snapshot().iter().map(|flight| flight.id).collect();

        let later = now() + Duration::minutes(90);
        store.refresh_remarks(later);

        let refreshed = store.snapshot();
        assert_eq!(refreshed.iter().map(|flight| flight.id).collect::<Vec<_>>(), ids);
        assert_eq!(store.stats().refreshed_at, Some(later));
        assert_eq!(store.stats().refreshes, 1);
        assert_eq!(store.stats().generated_at, Some(now()));
    }

    #[test]
    fn readers_never_observe_partial_schedules() {
        let store = store(small_config());
        store.regenerate(now());

        let writers: Vec<_> = (0..2)
            .map(|idx| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for round in 0..20 {
                        if idx == 0 {
                            store.regenerate(now());
                        } else {
                            store.refresh_remarks(now() + Duration::minutes(round));
                        }
                    }
                })
            })
            .collect();

        for _ in 0..200 {
            let snapshot = store.snapshot();
            assert_eq!(snapshot.len(), 120);
            assert!(snapshot.iter().all(|flight| flight.remarks.is_some()));
            assert!(snapshot.windows(2).all(|pair| pair[0].time <= pair[1].time));
        }

        for writer in writers {
            writer.join().expect("writer thread");
        }
    }
}
