use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Years};

/// Amortization convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MortgageType {
    /// Fixed total monthly payment; the principal share grows over time.
    #[default]
    Annuity,
    /// Fixed principal repayment; the total payment declines as interest shrinks.
    Linear,
}

/// A one-time extra principal payment, applied in the calendar month of `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglePayment {
    #[serde(default)]
    pub id: String,
    pub amount: Money,
    pub date: NaiveDate,
}

impl SinglePayment {
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            amount,
            date,
        }
    }
}

/// A mortgage as entered by the user. Immutable per calculation: edits
/// produce a new value through the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mortgage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Principal.
    pub amount: Money,
    /// Nominal annual rate as a percentage (3.5 = 3.5%).
    pub interest_rate: Percent,
    /// Scheduled duration in years.
    pub term: Years,
    /// Recurring additional principal paid every month.
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default, rename = "type")]
    pub mortgage_type: MortgageType,
    /// Only year and month are significant.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub single_payments: Vec<SinglePayment>,
}

impl Mortgage {
    pub fn new(amount: Money, interest_rate: Percent, term: Years, start_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            amount,
            interest_rate,
            term,
            extra_payment: Decimal::ZERO,
            mortgage_type: MortgageType::Annuity,
            start_date,
            single_payments: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_extra_payment(mut self, extra_payment: Money) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    pub fn with_type(mut self, mortgage_type: MortgageType) -> Self {
        self.mortgage_type = mortgage_type;
        self
    }

    pub fn with_single_payment(mut self, amount: Money, date: NaiveDate) -> Self {
        self.single_payments.push(SinglePayment::new(amount, date));
        self
    }

    pub fn with_single_payments(mut self, payments: Vec<SinglePayment>) -> Self {
        self.single_payments = payments;
        self
    }

    /// Scheduled number of monthly payments (`term * 12`); fractional when
    /// the term is not a whole number of months. Saturates at `Decimal::MAX`.
    pub fn number_of_payments(&self) -> Decimal {
        self.term.saturating_mul(dec!(12))
    }

    /// Monthly rate as a decimal fraction (`interest_rate / 100 / 12`).
    pub fn monthly_rate(&self) -> Decimal {
        self.interest_rate / dec!(100) / dec!(12)
    }

    /// Start date moved to the first of its month.
    pub fn normalized_start_date(&self) -> NaiveDate {
        first_of_month(self.start_date)
    }
}

/// Move a date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// One simulated month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based month number.
    pub month: u32,
    pub date: NaiveDate,
    /// Scheduled gross payment (fixed for annuity, declining for linear).
    pub payment: Money,
    /// Regular principal component before extras and before the clamp.
    pub principal: Money,
    pub interest: Money,
    /// Recurring extra requested this month (nominal, pre-clamp).
    pub extra_payment: Money,
    /// Bucketed one-time payments requested this month (nominal, pre-clamp).
    pub single_payment: Money,
    /// Cash actually paid: interest plus principal applied after the clamp.
    pub total_payment: Money,
    /// Remaining principal after this month; never negative.
    pub balance: Money,
}

/// Summary metrics for one mortgage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageDetails {
    pub monthly_payment: Money,
    /// Interest under the original schedule, without any extra payment.
    pub total_interest: Money,
    /// `monthly_payment + extra_payment`.
    pub new_monthly_payment: Money,
    /// Actual payoff time in (fractional) years.
    pub new_term: Years,
    pub interest_saved: Money,
    /// Cash paid under the accelerated schedule; zero when the inputs are degenerate.
    pub total_paid_with_extras: Money,
    /// Empty unless requested.
    pub schedule: Vec<ScheduleEntry>,
}

/// Schedule-free payoff figures for summary views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSummary {
    pub new_term: Years,
    pub total_paid_with_extras: Money,
    /// Interest accrued under the accelerated schedule.
    pub total_interest_paid: Money,
    pub months_saved: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_start_date_drops_day() {
        let m = Mortgage::new(
            dec!(100_000),
            dec!(4),
            dec!(10),
            NaiveDate::from_ymd_opt(2024, 7, 23).unwrap(),
        );
        assert_eq!(
            m.normalized_start_date(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_number_of_payments_fractional_term() {
        let m = Mortgage::new(
            dec!(100_000),
            dec!(4),
            dec!(2.5),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(m.number_of_payments(), dec!(30));
    }

    #[test]
    fn test_type_deserializes_lowercase_and_defaults_to_annuity() {
        let json = r#"{
            "amount": "200000",
            "interest_rate": "4",
            "term": "20",
            "start_date": "2024-01-01"
        }"#;
        let m: Mortgage = serde_json::from_str(json).unwrap();
        assert_eq!(m.mortgage_type, MortgageType::Annuity);
        assert!(m.single_payments.is_empty());
        assert_eq!(m.extra_payment, Decimal::ZERO);

        let json = r#"{
            "amount": 200000,
            "interest_rate": 4,
            "term": 20,
            "type": "linear",
            "start_date": "2024-01-01"
        }"#;
        let m: Mortgage = serde_json::from_str(json).unwrap();
        assert_eq!(m.mortgage_type, MortgageType::Linear);
    }
}
