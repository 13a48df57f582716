use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tracks faction time: days accumulated toward the next cycle, cycles run,
/// and the current game date string.
///
/// When a calendar date is attached, the date string follows it as days
/// advance. Without one the string is whatever the caller last set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionClock {
    days_accumulated: u32,
    cycles_completed: u64,
    current_date: String,
    calendar: Option<NaiveDate>,
}

impl FactionClock {
    /// Create a clock, optionally following a calendar date.
    pub fn new(start: Option<NaiveDate>) -> Self {
        Self {
            days_accumulated: 0,
            cycles_completed: 0,
            current_date: start.map(format_date).unwrap_or_default(),
            calendar: start,
        }
    }

    /// Rebuild a clock from persisted parts.
    pub fn from_parts(
        days_accumulated: u32,
        cycles_completed: u64,
        current_date: String,
        calendar: Option<NaiveDate>,
    ) -> Self {
        Self {
            days_accumulated,
            cycles_completed,
            current_date,
            calendar,
        }
    }

    /// Add days. Returns `true` when a cycle is due, in which case one
    /// cadence is consumed and any remainder carries over. At most one cycle
    /// is reported per call.
    pub fn advance(&mut self, days: u32, cadence: u32) -> bool {
        if let Some(date) = self.calendar {
            let next = date.checked_add_days(Days::new(u64::from(days))).unwrap_or(date);
            self.calendar = Some(next);
            self.current_date = format_date(next);
        }
        self.days_accumulated = self.days_accumulated.saturating_add(days);
        let cadence = cadence.max(1);
        if self.days_accumulated >= cadence {
            self.days_accumulated -= cadence;
            true
        } else {
            false
        }
    }

    /// Count a cycle. Returns the new cycle number.
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycles_completed += 1;
        self.cycles_completed
    }

    /// Days accumulated toward the next cycle.
    pub fn days_accumulated(&self) -> u32 {
        self.days_accumulated
    }

    /// Cycles run so far.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// The current game date string.
    pub fn current_date(&self) -> &str {
        &self.current_date
    }

    /// The calendar date, if the clock follows one.
    pub fn calendar(&self) -> Option<NaiveDate> {
        self.calendar
    }

    /// Set the date string. A string in `YYYY-MM-DD` form also moves the
    /// calendar, if one is attached.
    pub fn set_current_date(&mut self, date: &str) {
        self.current_date = date.to_string();
        if self.calendar.is_some()
            && let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        {
            self.calendar = Some(parsed);
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clock_initial_state() {
        let clock = FactionClock::new(None);
        assert_eq!(clock.days_accumulated(), 0);
        assert_eq!(clock.cycles_completed(), 0);
        assert_eq!(clock.current_date(), "");
    }

    #[test]
    fn fires_at_cadence() {
        let mut clock = FactionClock::new(None);
        for _ in 0..6 {
            assert!(!clock.advance(1, 7));
        }
        assert!(clock.advance(1, 7));
        assert_eq!(clock.days_accumulated(), 0);
    }

    #[test]
    fn long_advance_fires_once_and_carries_remainder() {
        let mut clock = FactionClock::new(None);
        assert!(clock.advance(10, 7));
        assert_eq!(clock.days_accumulated(), 3);
        assert!(!clock.advance(3, 7));
        assert!(clock.advance(1, 7));
    }

    #[test]
    fn zero_cadence_treated_as_one() {
        let mut clock = FactionClock::new(None);
        assert!(clock.advance(1, 0));
    }

    #[test]
    fn calendar_follows_days() {
        let start = NaiveDate::from_ymd_opt(1420, 5, 28).unwrap();
        let mut clock = FactionClock::new(Some(start));
        assert_eq!(clock.current_date(), "1420-05-28");
        clock.advance(7, 7);
        assert_eq!(clock.current_date(), "1420-06-04");
    }

    #[test]
    fn set_date_moves_calendar() {
        let start = NaiveDate::from_ymd_opt(1420, 1, 1).unwrap();
        let mut clock = FactionClock::new(Some(start));
        clock.set_current_date("1421-03-01");
        clock.advance(1, 7);
        assert_eq!(clock.current_date(), "1421-03-02");

        let mut plain = FactionClock::new(None);
        plain.set_current_date("Spring, Year 3");
        plain.advance(7, 7);
        assert_eq!(plain.current_date(), "Spring, Year 3");
    }

    proptest! {
        #[test]
        fn k_cadences_fire_k_cycles(
            cadence in 1u32..15,
            k in 0u32..6,
            cuts in prop::collection::vec(1u32..15, 0..40),
        ) {
            // Split k * cadence days into chunks no larger than the cadence.
            let total = k * cadence;
            let mut chunks = Vec::new();
            let mut left = total;
            for c in cuts {
                if left == 0 {
                    break;
                }
                let step = c.min(cadence).min(left);
                chunks.push(step);
                left -= step;
            }
            while left > 0 {
                let step = left.min(cadence);
                chunks.push(step);
                left -= step;
            }

            let mut clock = FactionClock::new(None);
            let fired = chunks.iter().filter(|&&d| clock.advance(d, cadence)).count();
            prop_assert_eq!(fired as u32, k);
            prop_assert_eq!(clock.days_accumulated(), 0);
        }
    }
}
