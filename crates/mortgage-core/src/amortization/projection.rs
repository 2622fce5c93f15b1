//! Year-end balances of the baseline schedule beside the accelerated one.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{Mortgage, ScheduleEntry};
use super::simulator::{calculate_mortgage_details, is_valid_mortgage, MAX_TERM_YEARS};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBalance {
    /// Years since the start month; year 0 is the original amount.
    pub year: u32,
    /// Remaining balance without any extra payment.
    pub regular: Money,
    /// Remaining balance with recurring and one-time extra payments.
    pub accelerated: Money,
}

/// Remaining balance after each whole year, with and without extra payments.
///
/// Stops at the first year where both balances are zero, or after the
/// scheduled term. Empty for degenerate inputs, terms beyond
/// [`MAX_TERM_YEARS`] and mortgages whose amounts overflow.
pub fn balance_projection(mortgage: &Mortgage) -> Vec<YearlyBalance> {
    if !is_valid_mortgage(mortgage) || mortgage.term > MAX_TERM_YEARS {
        return Vec::new();
    }

    let baseline = mortgage
        .clone()
        .with_extra_payment(Decimal::ZERO)
        .with_single_payments(Vec::new());
    let regular = calculate_mortgage_details(&baseline, true).schedule;
    let accelerated = calculate_mortgage_details(mortgage, true).schedule;
    if regular.is_empty() || accelerated.is_empty() {
        return Vec::new();
    }

    let years = mortgage.term.ceil().to_u32().unwrap_or(0);
    let mut rows = Vec::with_capacity(years as usize + 1);

    for year in 0..=years {
        let months = year as usize * 12;
        let row = YearlyBalance {
            year,
            regular: balance_after(&regular, mortgage.amount, months),
            accelerated: balance_after(&accelerated, mortgage.amount, months),
        };
        let paid_off = row.regular.is_zero() && row.accelerated.is_zero();
        rows.push(row);
        if paid_off {
            break;
        }
    }

    rows
}

fn balance_after(schedule: &[ScheduleEntry], amount: Money, months: usize) -> Money {
    if months == 0 {
        return amount;
    }
    schedule
        .get(months - 1)
        .or_else(|| schedule.last())
        .map(|entry| entry.balance)
        .unwrap_or(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::model::MortgageType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_projection_rows_cover_term() {
        let m = Mortgage::new(dec!(120_000), dec!(6), dec!(10), start())
            .with_type(MortgageType::Linear);
        let rows = balance_projection(&m);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].regular, dec!(120_000));
        assert_eq!(rows[1].regular, dec!(108_000));
        assert_eq!(rows[10].regular, Decimal::ZERO);
        // No extras: both lines coincide.
        assert!(rows.iter().all(|r| r.regular == r.accelerated));
    }

    #[test]
    fn test_accelerated_runs_below_regular() {
        let m = Mortgage::new(dec!(300_000), dec!(3.5), dec!(30), start())
            .with_extra_payment(dec!(500))
            .with_single_payment(dec!(25_000), NaiveDate::from_ymd_opt(2027, 3, 1).unwrap());
        let rows = balance_projection(&m);
        assert_eq!(rows.len(), 31);
        for row in &rows[1..] {
            assert!(row.accelerated <= row.regular, "year {}", row.year);
        }
        let paid_off_year = rows.iter().find(|r| r.accelerated.is_zero()).unwrap().year;
        assert!(paid_off_year < 30);
    }

    #[test]
    fn test_degenerate_projection_is_empty() {
        let m = Mortgage::new(dec!(300_000), Decimal::ZERO, dec!(30), start());
        assert!(balance_projection(&m).is_empty());

        let too_long = Mortgage::new(dec!(300_000), dec!(3), dec!(100_000_000), start());
        assert!(balance_projection(&too_long).is_empty());

        let overflowing = Mortgage::new(Decimal::from_scientific("3e28").unwrap(), dec!(10), dec!(30), start());
        assert!(balance_projection(&overflowing).is_empty());
    }
}
