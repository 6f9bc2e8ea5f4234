// Trending time-window resolution.
// Maps a range selector to the calendar-date lower bound for `created:>`.

use chrono::{Days, Months, NaiveDate};

/// Time window for trending discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TimeRange {
    /// Parse a range selector. Unknown values fall back to the daily rule.
    pub fn parse(value: &str) -> Self {
        match value {
            "weekly" => TimeRange::Weekly,
            "monthly" => TimeRange::Monthly,
            _ => TimeRange::Daily,
        }
    }

    /// Display label for the range selector.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Daily => "Today",
            TimeRange::Weekly => "This Week",
            TimeRange::Monthly => "This Month",
        }
    }

    /// Cycle to the next range.
    pub fn next(&self) -> Self {
        match self {
            TimeRange::Daily => TimeRange::Weekly,
            TimeRange::Weekly => TimeRange::Monthly,
            TimeRange::Monthly => TimeRange::Daily,
        }
    }
}

/// Resolve the lower-bound date for a range relative to `today`.
///
/// Monthly subtracts one calendar month with clamping: the 31st of a
/// 31-day month resolves to the last day of the shorter prior month.
pub fn date_since(range: TimeRange, today: NaiveDate) -> NaiveDate {
    match range {
        TimeRange::Daily => today.checked_sub_days(Days::new(1)).unwrap_or(today),
        TimeRange::Weekly => today.checked_sub_days(Days::new(7)).unwrap_or(today),
        TimeRange::Monthly => today.checked_sub_months(Months::new(1)).unwrap_or(today),
    }
}
