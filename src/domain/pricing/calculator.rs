//! Group-buying price calculator.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, ValidationError};

/// Per-student price derived from a lesson's total amount and head count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// What each student pays right now.
    pub per_student: i64,
    /// Discount relative to paying the full amount alone.
    pub discount_rate: Percentage,
}

impl PriceQuote {
    /// Quote for a group that has not reached its minimum size.
    pub fn undiscounted(amount: i64) -> Self {
        Self {
            per_student: amount,
            discount_rate: Percentage::ZERO,
        }
    }

    /// Returns true if the group has reached critical mass.
    pub fn is_discounted(&self) -> bool {
        self.discount_rate > Percentage::ZERO
    }
}

/// Calculator for group-buying prices.
///
/// The total amount is split evenly once `current_student >= min_student`;
/// below that threshold every student is quoted the full amount. All
/// arithmetic is integer, rounding half up.
pub struct PricingCalculator;

impl PricingCalculator {
    /// Computes the per-student price and discount rate.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `amount < 0` or `min_student < 1`.
    pub fn compute(
        amount: i64,
        min_student: u32,
        current_student: u32,
    ) -> Result<PriceQuote, ValidationError> {
        if amount < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, amount));
        }
        if min_student < 1 {
            return Err(ValidationError::out_of_range(
                "min_student",
                1,
                i64::from(u32::MAX),
                i64::from(min_student),
            ));
        }
        Ok(Self::quote(amount, min_student, current_student))
    }

    /// Infallible variant for callers that already uphold the preconditions
    /// (a constructed `Lesson` always does).
    pub(crate) fn quote(amount: i64, min_student: u32, current_student: u32) -> PriceQuote {
        if current_student < min_student.max(1) || amount <= 0 {
            return PriceQuote::undiscounted(amount.max(0));
        }

        let amount = amount as u128;
        let per_student = div_round_half_up(amount, u128::from(current_student));
        let discount = div_round_half_up((amount - per_student) * 100, amount);

        PriceQuote {
            per_student: per_student as i64,
            discount_rate: Percentage::new(discount as u8),
        }
    }
}

/// `round(numerator / denominator)` with ties rounded up. `denominator > 0`.
fn div_round_half_up(numerator: u128, denominator: u128) -> u128 {
    (numerator * 2 + denominator) / (denominator * 2)
}
