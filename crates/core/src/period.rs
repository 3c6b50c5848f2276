use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-date span. Dates are ISO-formatted, so lexical order
/// on their string form equals chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Degenerate single-day range, the seed for accumulation.
    pub fn single(date: NaiveDate) -> Self {
        DateRange { start: date, end: date }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Smallest range covering both operands. Commutative, so batch-level
    /// accumulation is order-independent.
    pub fn union(self, other: DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Grow the range to include `date`.
    pub fn extend(self, date: NaiveDate) -> DateRange {
        self.union(DateRange::single(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        assert!(range.contains(d(2024, 6, 15)));
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 12, 31)));
        assert!(!range.contains(d(2023, 12, 31)));
        assert!(!range.contains(d(2025, 1, 1)));
    }

    #[test]
    fn union_is_commutative() {
        let a = DateRange::new(d(2024, 1, 5), d(2024, 2, 1));
        let b = DateRange::new(d(2024, 1, 20), d(2024, 3, 15));
        assert_eq!(a.union(b), b.union(a));
        assert_eq!(a.union(b), DateRange::new(d(2024, 1, 5), d(2024, 3, 15)));
    }

    #[test]
    fn extend_grows_both_ends() {
        let range = DateRange::single(d(2024, 6, 1));
        let range = range.extend(d(2024, 5, 1)).extend(d(2024, 7, 1));
        assert_eq!(range, DateRange::new(d(2024, 5, 1), d(2024, 7, 1)));
    }

    #[test]
    fn display_format() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        assert_eq!(range.to_string(), "2024-01-01 to 2024-12-31");
    }

    #[test]
    fn start_never_after_end_under_extend() {
        let mut range = DateRange::single(d(2024, 3, 10));
        for date in [d(2024, 2, 1), d(2024, 8, 8), d(2023, 12, 25)] {
            range = range.extend(date);
            assert!(range.start <= range.end);
        }
    }
}
