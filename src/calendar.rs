// src/calendar.rs
use chrono::{Datelike, Local, Month, NaiveDate};

/// The month shown on the booking screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: Month,
}

impl MonthCursor {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::from_date(today)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        // month() is always 1..=12
        let month = Month::try_from(date.month() as u8).unwrap_or(Month::January);
        Self::new(date.year(), month)
    }

    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.succ()),
        }
    }

    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.pred()),
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month.name(), self.year)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1);
        let next = self.next();
        let next_first = NaiveDate::from_ymd_opt(next.year, next.month.number_from_month(), 1);
        match (first, next_first) {
            (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
            _ => 0,
        }
    }

    /// The date for `day` in this month, if the month has that day.
    pub fn select_day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_into_next_year() {
        let cursor = MonthCursor::new(2025, Month::December).next();
        assert_eq!(cursor, MonthCursor::new(2026, Month::January));
    }

    #[test]
    fn test_previous_wraps_into_previous_year() {
        let cursor = MonthCursor::new(2026, Month::January).previous();
        assert_eq!(cursor, MonthCursor::new(2025, Month::December));
        assert_eq!(cursor.next(), MonthCursor::new(2026, Month::January));
    }

    #[test]
    fn test_twelve_steps_is_a_full_cycle() {
        let start = MonthCursor::new(2026, Month::March);
        let mut cursor = start;
        for _ in 0..12 {
            cursor = cursor.next();
        }
        assert_eq!(cursor, MonthCursor::new(2027, Month::March));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthCursor::new(2024, Month::February).days_in_month(), 29);
        assert_eq!(MonthCursor::new(2026, Month::February).days_in_month(), 28);
        assert_eq!(MonthCursor::new(2026, Month::December).days_in_month(), 31);
        assert_eq!(MonthCursor::new(2026, Month::April).days_in_month(), 30);
    }

    #[test]
    fn test_select_day() {
        let cursor = MonthCursor::new(2026, Month::April);
        assert_eq!(cursor.select_day(30), NaiveDate::from_ymd_opt(2026, 4, 30));
        assert_eq!(cursor.select_day(31), None);
        assert_eq!(cursor.select_day(0), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(MonthCursor::new(2026, Month::March).label(), "March 2026");
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(MonthCursor::from_date(date), MonthCursor::new(2026, Month::October));
    }
}
