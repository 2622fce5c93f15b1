//! Closed-form payment and baseline-interest formulas.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use super::model::{Mortgage, MortgageType};
use crate::types::{Money, Percent, Years};

/// Whether the payment formula can produce a meaningful payment for these inputs.
///
/// A rate of exactly zero is accepted (interest-free loan, straight-line repayment).
pub fn payment_inputs_valid(principal: Money, rate: Percent, years: Years) -> bool {
    principal > Decimal::ZERO && rate >= Decimal::ZERO && years > Decimal::ZERO
}

/// Monthly payment for a mortgage.
///
/// Annuity: `P·r·(1+r)^n / ((1+r)^n − 1)` with `r = rate/100/12`, `n = years·12`,
/// falling back to `P / n` when `r` is zero. Linear: the payment declines over
/// time, so only the first month's payment `P/n + P·r` is returned.
///
/// Returns 0 when no valid payment is computable (non-positive principal or
/// years, negative rate) or when the result does not fit in a `Decimal`.
/// Callers that must tell that apart from a genuinely zero payment should
/// check [`payment_inputs_valid`] instead.
pub fn calculate_monthly_payment(
    principal: Money,
    rate: Percent,
    years: Years,
    mortgage_type: MortgageType,
) -> Money {
    if !payment_inputs_valid(principal, rate, years) {
        return Decimal::ZERO;
    }

    let monthly_rate = rate / dec!(100) / dec!(12);
    let Some(number_of_payments) = years.checked_mul(dec!(12)) else {
        return Decimal::ZERO;
    };

    let payment = match mortgage_type {
        MortgageType::Linear => linear_payment(principal, monthly_rate, number_of_payments),
        MortgageType::Annuity => annuity_payment(principal, monthly_rate, number_of_payments),
    };
    payment.unwrap_or(Decimal::ZERO)
}

fn linear_payment(principal: Money, monthly_rate: Decimal, number_of_payments: Decimal) -> Option<Money> {
    principal
        .checked_div(number_of_payments)?
        .checked_add(principal.checked_mul(monthly_rate)?)
}

fn annuity_payment(principal: Money, monthly_rate: Decimal, number_of_payments: Decimal) -> Option<Money> {
    if monthly_rate.is_zero() {
        return principal.checked_div(number_of_payments);
    }

    match (Decimal::ONE + monthly_rate).checked_powd(number_of_payments) {
        Some(factor) => {
            let denominator = factor - Decimal::ONE;
            if denominator <= Decimal::ZERO {
                // Rate below Decimal resolution at this horizon.
                return principal.checked_div(number_of_payments);
            }
            principal
                .checked_mul(monthly_rate)?
                .checked_mul(factor.checked_div(denominator)?)
        }
        // (1+r)^n beyond Decimal range: the annuity converges to interest-only.
        None => principal.checked_mul(monthly_rate),
    }
}

/// Interest paid under the original schedule, with no extra payments.
///
/// Annuity: `payment·n − P`. Linear: `P·r·(n+1)/2`, the closed-form sum of
/// interest on a balance falling by `P/n` each month. Zero for an
/// interest-free loan, when no valid payment is computable and when the
/// total overflows.
pub fn baseline_total_interest(mortgage: &Mortgage, monthly_payment: Money) -> Money {
    if !payment_inputs_valid(mortgage.amount, mortgage.interest_rate, mortgage.term) {
        return Decimal::ZERO;
    }

    let monthly_rate = mortgage.monthly_rate();
    if monthly_rate.is_zero() {
        return Decimal::ZERO;
    }

    let number_of_payments = mortgage.number_of_payments();
    let interest = match mortgage.mortgage_type {
        MortgageType::Linear => mortgage
            .amount
            .checked_mul(monthly_rate)
            .and_then(|x| x.checked_mul(number_of_payments.checked_add(Decimal::ONE)?))
            .map(|x| x / dec!(2)),
        MortgageType::Annuity => monthly_payment
            .checked_mul(number_of_payments)
            .and_then(|x| x.checked_sub(mortgage.amount)),
    };
    interest.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_annuity_payment_30y() {
        let pmt = calculate_monthly_payment(
            dec!(300_000),
            dec!(3.5),
            dec!(30),
            MortgageType::Annuity,
        );
        assert_close(pmt, dec!(1347.13), TOL, "30y 3.5% annuity");
    }

    #[test]
    fn test_annuity_payment_20y_4pct() {
        let pmt = calculate_monthly_payment(
            dec!(200_000),
            dec!(4),
            dec!(20),
            MortgageType::Annuity,
        );
        assert_close(pmt, dec!(1211.96), TOL, "20y 4% annuity");
    }

    #[test]
    fn test_linear_returns_initial_payment() {
        // 240_000 over 20y at 6%: 1000 principal + 1200 interest
        let pmt = calculate_monthly_payment(
            dec!(240_000),
            dec!(6),
            dec!(20),
            MortgageType::Linear,
        );
        assert_eq!(pmt, dec!(2200));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = calculate_monthly_payment(
            dec!(100_000),
            Decimal::ZERO,
            dec!(10),
            MortgageType::Annuity,
        );
        assert_eq!(pmt, dec!(100_000) / dec!(120));
    }

    #[test]
    fn test_invalid_inputs_return_zero() {
        let cases = [
            (Decimal::ZERO, dec!(3), dec!(30)),
            (dec!(-1), dec!(3), dec!(30)),
            (dec!(100_000), dec!(-0.5), dec!(30)),
            (dec!(100_000), dec!(3), Decimal::ZERO),
            (dec!(100_000), dec!(3), dec!(-5)),
        ];
        for (p, r, y) in cases {
            for t in [MortgageType::Annuity, MortgageType::Linear] {
                assert_eq!(
                    calculate_monthly_payment(p, r, y, t),
                    Decimal::ZERO,
                    "principal={p} rate={r} years={y} type={t:?}"
                );
            }
        }
    }

    #[test]
    fn test_extreme_rate_converges_to_interest_only() {
        // (1 + 10)^3600 overflows Decimal; payment approaches P·r.
        let pmt = calculate_monthly_payment(
            dec!(1000),
            dec!(12000),
            dec!(300),
            MortgageType::Annuity,
        );
        assert_eq!(pmt, dec!(10000));
    }

    #[test]
    fn test_out_of_range_inputs_return_zero() {
        // P·r exceeds Decimal::MAX once the rate is this large.
        let huge_rate = Decimal::from_scientific("1e27").unwrap();
        assert_eq!(
            calculate_monthly_payment(dec!(300_000), huge_rate, dec!(30), MortgageType::Annuity),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_monthly_payment(dec!(300_000), huge_rate, dec!(30), MortgageType::Linear),
            Decimal::ZERO
        );
        // years·12 itself overflows.
        assert_eq!(
            calculate_monthly_payment(dec!(1000), dec!(3), Decimal::MAX, MortgageType::Linear),
            Decimal::ZERO
        );
        // P / n overflows for a vanishing term.
        let near_max = Decimal::from_scientific("7e28").unwrap();
        assert_eq!(
            calculate_monthly_payment(near_max, Decimal::ZERO, dec!(0.0000000001), MortgageType::Annuity),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_baseline_interest_overflow_is_zero() {
        let m = Mortgage::new(
            Decimal::from_scientific("3e28").unwrap(),
            dec!(10),
            dec!(30),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let pmt = calculate_monthly_payment(m.amount, m.interest_rate, m.term, m.mortgage_type);
        assert!(pmt > Decimal::ZERO);
        // pmt·360 is beyond Decimal range.
        assert_eq!(baseline_total_interest(&m, pmt), Decimal::ZERO);
    }

    #[test]
    fn test_baseline_interest_annuity() {
        let m = Mortgage::new(
            dec!(300_000),
            dec!(3.5),
            dec!(30),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let pmt = calculate_monthly_payment(m.amount, m.interest_rate, m.term, m.mortgage_type);
        let interest = baseline_total_interest(&m, pmt);
        assert_close(interest, dec!(184_968.26), dec!(1), "30y 3.5% total interest");
    }

    #[test]
    fn test_baseline_interest_linear_closed_form() {
        // 120_000 over 10y at 12%: r = 0.01, n = 120 → 120_000·0.01·121/2
        let m = Mortgage::new(
            dec!(120_000),
            dec!(12),
            dec!(10),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_type(MortgageType::Linear);
        let pmt = calculate_monthly_payment(m.amount, m.interest_rate, m.term, m.mortgage_type);
        assert_eq!(baseline_total_interest(&m, pmt), dec!(72_600));
    }

    #[test]
    fn test_baseline_interest_zero_for_invalid_or_free_loans() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let free = Mortgage::new(dec!(100_000), Decimal::ZERO, dec!(10), start);
        assert_eq!(baseline_total_interest(&free, dec!(833.33)), Decimal::ZERO);

        let empty = Mortgage::new(Decimal::ZERO, dec!(4), dec!(10), start);
        assert_eq!(baseline_total_interest(&empty, Decimal::ZERO), Decimal::ZERO);
    }
}
