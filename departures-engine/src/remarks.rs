//! Time-driven remarks derivation.
//!
//! Remarks are a pure function of the wall clock and a flight's fixed fields.
//! The chain below is evaluated top to bottom and the first matching rule
//! wins, so the order of [`RemarksEngine::standard`] is the tie-break policy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::flight::{Flight, Remarks};

/// Predicate over `(minutes until departure, delay minutes)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemarksCondition {
    /// Minutes until departure are strictly below the bound.
    MinutesBelow { minutes: i64 },
    /// The flight carries a nonzero delay.
    Delayed,
    Always,
}

impl RemarksCondition {
    pub fn matches(&self, minutes: i64, delay_minutes: u32) -> bool {
        match self {
            RemarksCondition::MinutesBelow { minutes: bound } => minutes < *bound,
            RemarksCondition::Delayed => delay_minutes > 0,
            RemarksCondition::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemarksRule {
    pub condition: RemarksCondition,
    pub remarks: Remarks,
}

impl RemarksRule {
    pub const fn below(minutes: i64, remarks: Remarks) -> Self {
        Self {
            condition: RemarksCondition::MinutesBelow { minutes },
            remarks,
        }
    }
}

/// Ordered rule chain that labels every flight on each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RemarksEngine {
    rules: Vec<RemarksRule>,
}

impl RemarksEngine {
    /// Builds an engine that evaluates `rules` in the given order.
    pub fn new(rules: Vec<RemarksRule>) -> Self {
        Self { rules }
    }

    /// The board's chain. `filter_start` is minutes relative to departure,
    /// negative once the flight has left.
    pub fn standard(filter_start: i64) -> Self {
        Self::new(vec![
            RemarksRule::below(filter_start, Remarks::Done),
            RemarksRule::below(0, Remarks::Departed),
            RemarksRule::below(20, Remarks::Closed),
            RemarksRule::below(30, Remarks::FinalCall),
            RemarksRule::below(60, Remarks::Boarding),
            RemarksRule::below(90, Remarks::GoGate),
            RemarksRule {
                condition: RemarksCondition::Delayed,
                remarks: Remarks::Delayed,
            },
            RemarksRule::below(180, Remarks::CheckIn),
            RemarksRule {
                condition: RemarksCondition::Always,
                remarks: Remarks::OnTime,
            },
        ])
    }

    pub fn rules(&self) -> &[RemarksRule] {
        &self.rules
    }

    /// First matching label, `OnTime` when nothing matches.
    pub fn classify(&self, minutes: i64, delay_minutes: u32) -> Remarks {
        self.rules
            .iter()
            .find(|rule| rule.condition.matches(minutes, delay_minutes))
            .map(|rule| rule.remarks)
            .unwrap_or(Remarks::OnTime)
    }

    /// Minutes until departure and the label for `flight` as of `now`.
    /// Cancellation overrides the whole chain.
    pub fn derive(&self, flight: &Flight, now: DateTime<Utc>) -> (i64, Remarks) {
        let minutes = minutes_until_departure(flight.time, now, flight.delay_minutes);
        let remarks = if flight.cancelled {
            Remarks::Cancelled
        } else {
            self.classify(minutes, flight.delay_minutes)
        };
        (minutes, remarks)
    }

    /// Recomputes the derived fields of every flight in place.
    pub fn refresh(&self, flights: &mut [Flight], now: DateTime<Utc>) {
        for flight in flights.iter_mut() {
            let (minutes, remarks) = self.derive(flight, now);
            flight.minutes_until_departure = Some(minutes);
            flight.remarks = Some(remarks);
        }
        debug!(flights = flights.len(), %now, "remarks refreshed");
    }
}

/// `floor((time - now) / 1 min) + delay`; negative once the flight has left.
pub fn minutes_until_departure(time: DateTime<Utc>, now: DateTime<Utc>, delay_minutes: u32) -> i64 {
    let delta = time - now;
    let whole = delta.num_minutes();
    // num_minutes truncates toward zero; step down for a negative remainder.
    let floored = if delta < Duration::minutes(whole) {
        whole - 1
    } else {
        whole
    };
    floored + i64::from(delay_minutes)
}
