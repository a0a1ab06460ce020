//! Inclusive daily date ranges and elapsed-time fractions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days shared by every scenario domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Number of days in the range, counting both ends. Zero when inverted.
    pub fn day_count(&self) -> usize {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Zero-based position of `date` inside the range.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        Some((date - self.start_date).num_days() as usize)
    }

    /// Fraction of the range elapsed on `day_index`: 0 on the first day, 1 on
    /// the last. Single-day ranges never elapse.
    pub fn elapsed_fraction(&self, day_index: usize) -> f64 {
        let n = self.day_count();
        if n <= 1 {
            return 0.0;
        }
        (day_index as f64 / (n - 1) as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).day_count(), 1);
        assert_eq!(DateRange::new(d(2024, 1, 1), d(2024, 12, 31)).day_count(), 366);
        assert_eq!(DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).day_count(), 0);
    }

    #[test]
    fn days_iterates_in_order_and_stops_at_end() {
        let r = DateRange::new(d(2023, 12, 30), d(2024, 1, 2));
        let days: Vec<_> = r.days().collect();
        assert_eq!(
            days,
            vec![d(2023, 12, 30), d(2023, 12, 31), d(2024, 1, 1), d(2024, 1, 2)]
        );
        assert_eq!(r.day_index(d(2024, 1, 1)), Some(2));
        assert_eq!(r.day_index(d(2024, 1, 3)), None);
    }

    #[test]
    fn elapsed_fraction_spans_zero_to_one() {
        let r = DateRange::new(d(2024, 1, 1), d(2024, 1, 5));
        assert_eq!(r.elapsed_fraction(0), 0.0);
        assert_eq!(r.elapsed_fraction(2), 0.5);
        assert_eq!(r.elapsed_fraction(4), 1.0);
        let single = DateRange::new(d(2024, 1, 1), d(2024, 1, 1));
        assert_eq!(single.elapsed_fraction(0), 0.0);
    }
}
