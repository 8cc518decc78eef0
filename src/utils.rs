//! Utility functions for the pod-ledger crate

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round a rating delta to the given number of decimal places.
///
/// Deltas are rounded exactly once, at the persistence boundary, so that a
/// full ledger replay reproduces stored ratings bit-for-bit.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Win rate as a fraction in [0, 1]; zero games yields 0.0
pub fn win_rate(wins: u64, games: u64) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to_places(20.264660548828, 2), 20.26);
        assert_eq!(round_to_places(-11.517920006248, 2), -11.52);
        assert_eq!(round_to_places(16.0, 2), 16.0);
        assert_eq!(round_to_places(1.005, 0), 1.0);
    }

    #[test]
    fn test_round_is_idempotent() {
        let once = round_to_places(-7.688098347345, 2);
        assert_eq!(round_to_places(once, 2), once);
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(1, 2), 0.5);
        assert_eq!(win_rate(3, 4), 0.75);
    }
}
