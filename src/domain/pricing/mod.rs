//! Pricing module - Group-buying price computation.
//!
//! Pure and stateless. Prices are recomputed from a lesson's `amount` and
//! `current_student` on every read and never persisted.

mod calculator;

pub use calculator::{PriceQuote, PricingCalculator};
