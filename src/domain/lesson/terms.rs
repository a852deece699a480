//! Teacher-editable lesson terms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Maximum length of a lesson title.
pub const MAX_TITLE_LENGTH: usize = 100;

/// The fields a teacher supplies when creating or editing a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonTerms {
    pub title: String,
    /// Total price of the lesson, split among students once the group is big enough.
    pub amount: i64,
    pub min_student: u32,
    pub max_student: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LessonTerms {
    /// Checks the field-level invariants.
    ///
    /// - title is non-blank and at most `MAX_TITLE_LENGTH` characters
    /// - `amount >= 0`
    /// - `1 <= min_student <= max_student`
    /// - `start_date <= end_date`
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LENGTH as i64,
                title.chars().count() as i64,
            ));
        }
        if self.amount < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, self.amount));
        }
        if self.min_student < 1 {
            return Err(ValidationError::out_of_range(
                "min_student",
                1,
                i64::from(self.max_student.max(1)),
                i64::from(self.min_student),
            ));
        }
        if self.min_student > self.max_student {
            return Err(ValidationError::invalid_format(
                "max_student",
                format!(
                    "must be at least min_student ({}), got {}",
                    self.min_student, self.max_student
                ),
            ));
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::invalid_format(
                "end_date",
                "must not be before start_date",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> LessonTerms {
        LessonTerms {
            title: "Rust for beginners".to_string(),
            amount: 200_000,
            min_student: 4,
            max_student: 8,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
        }
    }

    #[test]
    fn accepts_well_formed_terms() {
        assert!(terms().validate().is_ok());
    }

    #[test]
    fn accepts_single_day_lesson() {
        let mut t = terms();
        t.end_date = t.start_date;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let mut t = terms();
        t.title = "  ".to_string();
        assert_eq!(t.validate().unwrap_err().field(), "title");
    }

    #[test]
    fn rejects_overlong_title() {
        let mut t = terms();
        t.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert_eq!(t.validate().unwrap_err().field(), "title");
    }

    #[test]
    fn rejects_negative_amount() {
        let mut t = terms();
        t.amount = -1;
        assert_eq!(t.validate().unwrap_err().field(), "amount");
    }

    #[test]
    fn rejects_zero_minimum() {
        let mut t = terms();
        t.min_student = 0;
        assert_eq!(t.validate().unwrap_err().field(), "min_student");
    }

    #[test]
    fn rejects_minimum_above_maximum() {
        let mut t = terms();
        t.min_student = 9;
        assert_eq!(t.validate().unwrap_err().field(), "max_student");
    }

    #[test]
    fn rejects_end_before_start() {
        let mut t = terms();
        t.end_date = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(t.validate().unwrap_err().field(), "end_date");
    }
}
