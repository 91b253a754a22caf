//! # Stats
//! Counter snapshots and the pure arithmetic over them.
//!
//! A [`Snapshot`] is one observation of the four tracked counters. Deltas are
//! the same shape with signed values, trends the same shape with `f64`
//! growth-rate differences. Nothing in here performs I/O.

pub mod day;
pub mod delta;
pub mod threshold;

use serde::{Deserialize, Serialize};

/// The four tracked counters, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Cases,
    Deaths,
    Recoveries,
    Active,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::Cases,
        Counter::Deaths,
        Counter::Recoveries,
        Counter::Active,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Counter::Cases => "cases",
            Counter::Deaths => "deaths",
            Counter::Recoveries => "recoveries",
            Counter::Active => "active",
        }
    }

    /// Discord emoji shortcode shown in front of the counter line.
    pub fn icon(self) -> &'static str {
        match self {
            Counter::Cases => "radioactive",
            Counter::Deaths => "skull_crossbones",
            Counter::Recoveries => "house_with_garden",
            Counter::Active => "zombie",
        }
    }
}

/// Field-wise container for one value per [`Counter`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Counters<T> {
    pub cases: T,
    pub deaths: T,
    pub recoveries: T,
    pub active: T,
}

impl<T: Copy> Counters<T> {
    pub fn get(&self, counter: Counter) -> T {
        match counter {
            Counter::Cases => self.cases,
            Counter::Deaths => self.deaths,
            Counter::Recoveries => self.recoveries,
            Counter::Active => self.active,
        }
    }

    pub fn zip_with<U: Copy, R>(self, other: Counters<U>, f: impl Fn(T, U) -> R) -> Counters<R> {
        Counters {
            cases: f(self.cases, other.cases),
            deaths: f(self.deaths, other.deaths),
            recoveries: f(self.recoveries, other.recoveries),
            active: f(self.active, other.active),
        }
    }
}

/// One observation of a source. `active` is stored as supplied, never recomputed.
pub type Snapshot = Counters<i64>;

/// `latest - previous`, field by field.
pub type Delta = Counters<i64>;

/// Day-over-day growth rate, `delta / previous`. May hold non-finite values.
pub type Percentages = Counters<f64>;

/// Difference between two consecutive growth rates. Only the sign is rendered.
pub type Trend = Counters<f64>;

impl Snapshot {
    pub fn new(cases: i64, deaths: i64, recoveries: i64, active: i64) -> Self {
        Self {
            cases,
            deaths,
            recoveries,
            active,
        }
    }

    /// Builds a snapshot from raw counters, deriving `active` as
    /// `cases - deaths - recoveries`.
    pub fn with_derived_active(cases: i64, deaths: i64, recoveries: i64) -> Self {
        Self::new(cases, deaths, recoveries, cases - deaths - recoveries)
    }

    /// True when every counter is zero (used for "nothing changed" deltas).
    pub fn is_zero(&self) -> bool {
        Counter::ALL.iter().all(|&c| self.get(c) == 0)
    }
}

/// Maps a parsed float onto a counter value; NaN and infinities become 0.
pub fn neutralize(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}
