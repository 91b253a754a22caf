//! Day-over-day deltas and two-step trends.

use super::{Delta, Percentages, Snapshot, Trend};

/// `latest - previous` for every counter.
pub fn delta(latest: &Snapshot, previous: &Snapshot) -> Delta {
    latest.zip_with(*previous, |l, p| l - p)
}

/// `delta / previous` for every counter. Division by zero follows IEEE rules.
pub fn percentages(delta: &Delta, previous: &Snapshot) -> Percentages {
    delta.zip_with(*previous, |d, p| d as f64 / p as f64)
}

/// Change in growth rate between yesterday→today and before-yesterday→yesterday.
///
/// Non-finite components are possible when a previous counter was zero; the
/// renderer drops them.
pub fn trend(delta_today: &Delta, yesterday: &Snapshot, before_yesterday: &Snapshot) -> Trend {
    let delta_yesterday = delta(yesterday, before_yesterday);
    let pct_today = percentages(delta_today, yesterday);
    let pct_yesterday = percentages(&delta_yesterday, before_yesterday);
    pct_today.zip_with(pct_yesterday, |t, y| t - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_fieldwise_difference() {
        let a = Snapshot::new(100, 5, 40, 55);
        let b = Snapshot::new(80, 7, 30, 43);
        assert_eq!(delta(&a, &b), Snapshot::new(20, -2, 10, 12));
    }

    #[test]
    fn delta_of_self_is_zero() {
        let a = Snapshot::new(123_456, 789, 1_000, 121_667);
        assert!(delta(&a, &a).is_zero());
    }

    #[test]
    fn percentages_divide_by_previous() {
        let prev = Snapshot::new(100, 10, 50, 40);
        let d = Snapshot::new(10, 1, 5, 4);
        let p = percentages(&d, &prev);
        assert!((p.cases - 0.1).abs() < 1e-12);
        assert!((p.active - 0.1).abs() < 1e-12);
    }

    #[test]
    fn percentages_by_zero_are_non_finite() {
        let prev = Snapshot::new(100, 0, 0, 100);
        let d = Snapshot::new(10, 1, 0, 9);
        let p = percentages(&d, &prev);
        assert!(p.deaths.is_infinite());
        assert!(p.recoveries.is_nan());
    }

    #[test]
    fn accelerating_growth_has_positive_trend() {
        let before = Snapshot::new(100, 10, 10, 80);
        let yesterday = Snapshot::new(110, 11, 11, 88); // +10%
        let today = Snapshot::new(132, 11, 12, 109); // +20% cases
        let t = trend(&delta(&today, &yesterday), &yesterday, &before);
        assert!(t.cases > 0.0);
        assert_eq!(t.deaths, -0.1);
    }

    #[test]
    fn steady_growth_has_zero_trend() {
        let before = Snapshot::new(100, 0, 0, 100);
        let yesterday = Snapshot::new(200, 0, 0, 200);
        let today = Snapshot::new(400, 0, 0, 400);
        let t = trend(&delta(&today, &yesterday), &yesterday, &before);
        assert_eq!(t.cases, 0.0);
    }
}
