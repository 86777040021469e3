use chrono::{Datelike, NaiveDate};

use crate::error::{ComputeError, Result};

/// One calendar month of one year, the scoping unit for budget summaries
/// and the monthly rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthOfYear {
    month: u32,
    year: i32,
}

impl MonthOfYear {
    /// Creates a period, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ComputeError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { month, year })
    }

    /// The month the given date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether the date falls inside this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// The month `n` months before this one, wrapping year boundaries
    /// (one month before January is December of the prior year).
    pub fn months_back(&self, n: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        Self {
            month: total.rem_euclid(12) as u32 + 1,
            year: total.div_euclid(12) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_months() {
        assert!(MonthOfYear::new(0, 2024).is_err());
        assert!(MonthOfYear::new(13, 2024).is_err());
        assert!(MonthOfYear::new(1, 2024).is_ok());
        assert!(MonthOfYear::new(12, 2024).is_ok());
    }

    #[test]
    fn test_contains() {
        let period = MonthOfYear::new(2, 2024).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
    }

    #[test]
    fn test_months_back_within_year() {
        let period = MonthOfYear::new(8, 2024).unwrap();
        let back = period.months_back(3);
        assert_eq!(back.month(), 5);
        assert_eq!(back.year(), 2024);
    }

    #[test]
    fn test_months_back_wraps_year_boundary() {
        let period = MonthOfYear::new(2, 2024).unwrap();

        // Five months before February is September of the prior year.
        let back = period.months_back(5);
        assert_eq!(back.month(), 9);
        assert_eq!(back.year(), 2023);

        // Going back zero months is the identity.
        assert_eq!(period.months_back(0), period);

        // A full year lands on the same month one year earlier.
        let back = period.months_back(12);
        assert_eq!(back.month(), 2);
        assert_eq!(back.year(), 2023);
    }

    #[test]
    fn test_months_back_from_january() {
        let period = MonthOfYear::new(1, 2024).unwrap();
        let back = period.months_back(1);
        assert_eq!(back.month(), 12);
        assert_eq!(back.year(), 2023);
    }
}
