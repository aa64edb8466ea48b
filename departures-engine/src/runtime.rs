use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::store::ScheduleStore;

/// Drives the two periodic jobs of the board: full regeneration on a slow
/// cadence and remarks recomputation on a fast one.
pub struct BoardRuntime {
    store: ScheduleStore,
    shutdown: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

impl BoardRuntime {
    pub fn new(store: ScheduleStore) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            store,
            shutdown,
            workers: Vec::new(),
        }
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    /// Generates the first schedule if none exists yet, then spawns both timers.
    /// The first tick of each timer fires one full period after start.
    pub fn start(&mut self) {
        if self.store.stats().generation == 0 {
            self.store.regenerate(Utc::now());
        }

        let config = self.store.config();
        let regenerate_every = config.refresh_interval();
        let refresh_every = config.remarks_interval();

        info!(
            regenerate_every = ?regenerate_every,
            refresh_every = ?refresh_every,
            "starting board runtime"
        );

        let store = self.store.clone();
        let regenerate = self.spawn_job("regenerate", regenerate_every, move || {
            store.regenerate(Utc::now());
        });

        let store = self.store.clone();
        let remarks = self.spawn_job("remarks", refresh_every, move || {
            store.refresh_remarks(Utc::now());
        });

        self.workers.push(regenerate);
        self.workers.push(remarks);
    }

    fn spawn_job<F>(&self, job: &'static str, period: Duration, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        debug!(job, "board job tick");
                        tick();
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.workers {
            if let Err(err) = handle.await {
                error!("board job crashed: {:?}", err);
            }
        }
        info!("board runtime stopped");
    }
}
