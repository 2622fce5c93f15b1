//! Mortgage amortization engine.
//!
//! Models a mortgage (principal, nominal rate, term, recurring extra payment
//! and one-time extra payments keyed by calendar month) and derives the
//! monthly payment, baseline interest, accelerated payoff term, interest saved
//! and, on request, the month-by-month schedule. All math in
//! `rust_decimal::Decimal`; every function in [`amortization`] is pure and
//! total, so invalid input yields neutral zero results rather than errors.

pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "share")]
pub mod share;

pub use amortization::{
    calculate_monthly_payment, calculate_mortgage_details, calculate_payoff, is_valid_mortgage,
    simulate, Mortgage, MortgageDetails, MortgageType, PayoffSummary, ScheduleEntry,
    SinglePayment,
};
pub use error::MortgageError;
pub use types::*;

/// Standard result type for the fallible (boundary) operations
pub type MortgageResult<T> = Result<T, MortgageError>;
