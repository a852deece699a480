//! Recruiting deadline derivation.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Default number of days between the recruiting deadline and the lesson start.
pub const DEFAULT_DEADLINE_LEAD_DAYS: u32 = 7;

/// Upper bound accepted for the lead time.
pub const MAX_DEADLINE_LEAD_DAYS: u32 = 365;

/// Which self-service path is open to an enrolled student at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationWindow {
    /// Before the deadline: free, immediate cancellation.
    Open,
    /// On or after the deadline: refunds go through review.
    Closed,
}

/// Policy deriving a lesson's recruiting deadline from its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    lead_days: u32,
}

impl DeadlinePolicy {
    /// Creates a policy with the given lead time.
    ///
    /// # Errors
    ///
    /// The lead time must be at least one day so that the deadline always
    /// falls strictly before the start date.
    pub fn new(lead_days: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_DEADLINE_LEAD_DAYS).contains(&lead_days) {
            return Err(ValidationError::out_of_range(
                "deadline_lead_days",
                1,
                i64::from(MAX_DEADLINE_LEAD_DAYS),
                i64::from(lead_days),
            ));
        }
        Ok(Self { lead_days })
    }

    /// Returns the configured lead time in days.
    pub fn lead_days(&self) -> u32 {
        self.lead_days
    }

    /// Computes the recruiting deadline for a lesson starting on `start_date`.
    pub fn compute_deadline(&self, start_date: NaiveDate) -> Result<NaiveDate, ValidationError> {
        start_date
            .checked_sub_days(Days::new(u64::from(self.lead_days)))
            .ok_or_else(|| {
                ValidationError::invalid_format("start_date", "too early to derive a deadline")
            })
    }

    /// Returns true if `now` falls strictly before the first instant of the
    /// deadline date (00:00:00 UTC).
    pub fn is_before_deadline(now: Timestamp, deadline: NaiveDate) -> bool {
        now < Timestamp::start_of(deadline)
    }

    /// Names the cancellation path available at `now`.
    pub fn window_at(now: Timestamp, deadline: NaiveDate) -> CancellationWindow {
        if Self::is_before_deadline(now, deadline) {
            CancellationWindow::Open
        } else {
            CancellationWindow::Closed
        }
    }
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            lead_days: DEFAULT_DEADLINE_LEAD_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn default_deadline_is_one_week_before_start() {
        let deadline = DeadlinePolicy::default()
            .compute_deadline(date(2024, 6, 10))
            .unwrap();
        assert_eq!(deadline, date(2024, 6, 3));
    }

    #[test]
    fn deadline_crosses_month_boundaries() {
        let policy = DeadlinePolicy::new(3).unwrap();
        assert_eq!(policy.compute_deadline(date(2024, 3, 1)).unwrap(), date(2024, 2, 27));
    }

    #[test]
    fn deadline_is_always_before_start() {
        for lead in [1, 7, 30, MAX_DEADLINE_LEAD_DAYS] {
            let policy = DeadlinePolicy::new(lead).unwrap();
            let start = date(2025, 1, 1);
            assert!(policy.compute_deadline(start).unwrap() < start);
        }
    }

    #[test]
    fn rejects_zero_lead_time() {
        let err = DeadlinePolicy::new(0).unwrap_err();
        assert_eq!(err.field(), "deadline_lead_days");
    }

    #[test]
    fn rejects_excessive_lead_time() {
        assert!(DeadlinePolicy::new(MAX_DEADLINE_LEAD_DAYS + 1).is_err());
    }

    #[test]
    fn last_second_of_previous_day_is_before_deadline() {
        assert!(DeadlinePolicy::is_before_deadline(
            at("2024-06-02T23:59:59Z"),
            date(2024, 6, 3)
        ));
    }

    #[test]
    fn deadline_midnight_is_not_before_deadline() {
        assert!(!DeadlinePolicy::is_before_deadline(
            at("2024-06-03T00:00:00Z"),
            date(2024, 6, 3)
        ));
    }

    #[test]
    fn window_at_names_the_open_path() {
        let deadline = date(2024, 6, 3);
        assert_eq!(
            DeadlinePolicy::window_at(at("2024-06-01T09:00:00Z"), deadline),
            CancellationWindow::Open
        );
        assert_eq!(
            DeadlinePolicy::window_at(at("2024-06-05T09:00:00Z"), deadline),
            CancellationWindow::Closed
        );
    }
}
