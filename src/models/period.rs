use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A billing cycle, ordered by year then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Builds a period, rejecting months outside 1..=12
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The period a calendar date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following period, wrapping December into January of the next year
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Due date of a coupon issued for this period.
    ///
    /// `due_day` is clamped to 1..=28 so every month has that day.
    pub fn due_date(self, due_day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, due_day.clamp(1, 28))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_within_year() {
        let period = Period::new(6, 2024).unwrap();
        assert_eq!(period.next(), Period::new(7, 2024).unwrap());
    }

    #[test]
    fn test_next_wraps_december() {
        let period = Period::new(12, 2024).unwrap();
        assert_eq!(period.next(), Period::new(1, 2025).unwrap());
    }

    #[test]
    fn test_rejects_invalid_month() {
        assert!(Period::new(0, 2024).is_none());
        assert!(Period::new(13, 2024).is_none());
    }

    #[test]
    fn test_ordering_is_year_then_month() {
        let dec_2023 = Period::new(12, 2023).unwrap();
        let jan_2024 = Period::new(1, 2024).unwrap();
        assert!(dec_2023 < jan_2024);
    }

    #[test]
    fn test_due_date_clamps_day() {
        let feb = Period::new(2, 2024).unwrap();
        assert_eq!(
            feb.due_date(31),
            NaiveDate::from_ymd_opt(2024, 2, 28)
        );
        assert_eq!(feb.due_date(0), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(Period::new(3, 2025).unwrap().to_string(), "3/2025");
    }
}
