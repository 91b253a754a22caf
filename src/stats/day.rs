//! Calendar day keys.
//!
//! Keys are fixed-width `YYYY-MM-DD`, so lexicographic order is chronological.

use chrono::{Days, Local, NaiveDate};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// `formatDay(date, offset)`: the key of `date` shifted by `offset_days`.
pub fn day_key(date: NaiveDate, offset_days: i64) -> String {
    let shifted = if offset_days >= 0 {
        date.checked_add_days(Days::new(offset_days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(offset_days.unsigned_abs()))
    };
    shifted.unwrap_or(date).format(DAY_KEY_FORMAT).to_string()
}

/// Today according to the host clock.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// The three keys a run looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDays {
    pub today: String,
    pub yesterday: String,
    pub before_yesterday: String,
}

impl RunDays {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            today: day_key(date, 0),
            yesterday: day_key(date, -1),
            before_yesterday: day_key(date, -2),
        }
    }
}
