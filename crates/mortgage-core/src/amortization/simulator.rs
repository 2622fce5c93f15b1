//! Month-by-month amortization with recurring and one-time extra payments.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::model::{Mortgage, MortgageDetails, MortgageType, PayoffSummary, ScheduleEntry};
use super::payment::{baseline_total_interest, calculate_monthly_payment};
use super::single_payments::{bucket_single_payments, SinglePaymentsByMonth};
use crate::types::Money;

/// Upper bound on the schedule pre-allocation; longer schedules still grow normally.
const MAX_SCHEDULE_PREALLOC: usize = 1_200;

/// Longest term the simulator runs (12 000 months). Longer terms are treated
/// like degenerate inputs.
pub const MAX_TERM_YEARS: Decimal = dec!(1000);

/// Whether the simulator will run for this mortgage: positive amount, rate
/// and term, and a non-negative recurring extra payment.
pub fn is_valid_mortgage(mortgage: &Mortgage) -> bool {
    mortgage.amount > Decimal::ZERO
        && mortgage.interest_rate > Decimal::ZERO
        && mortgage.term > Decimal::ZERO
        && mortgage.extra_payment >= Decimal::ZERO
}

/// Raw output of one pass of the amortization loop.
#[derive(Debug, Clone)]
pub(crate) struct AmortizationRun {
    /// Months simulated until payoff or the end of the scheduled term.
    pub months: u32,
    pub number_of_payments: Decimal,
    pub total_paid: Money,
    pub total_interest_paid: Money,
    pub single_payments: SinglePaymentsByMonth,
    pub schedule: Vec<ScheduleEntry>,
}

impl AmortizationRun {
    pub fn new_term(&self) -> Decimal {
        Decimal::from(self.months) / dec!(12)
    }
}

/// Run the amortization loop, or `None` when the inputs are degenerate, the
/// term exceeds [`MAX_TERM_YEARS`] or an amount leaves the `Decimal` range.
///
/// Each month: interest accrues on the balance, then the regular principal
/// (annuity: `payment − interest`; linear: `amount / n`), the recurring extra
/// and that month's bucketed one-time payments are applied. The balance is
/// clamped at zero, so the final month pays only what is left. Buckets the
/// loop never reaches because the loan is already repaid are not applied.
pub(crate) fn run_amortization(
    mortgage: &Mortgage,
    monthly_payment: Money,
    include_schedule: bool,
) -> Option<AmortizationRun> {
    if !is_valid_mortgage(mortgage) {
        debug!(
            amount = %mortgage.amount,
            interest_rate = %mortgage.interest_rate,
            term = %mortgage.term,
            extra_payment = %mortgage.extra_payment,
            "degenerate mortgage inputs, skipping amortization"
        );
        return None;
    }
    if mortgage.term > MAX_TERM_YEARS {
        debug!(term = %mortgage.term, max = %MAX_TERM_YEARS, "term too long, skipping amortization");
        return None;
    }

    let run = amortize(mortgage, monthly_payment, include_schedule);
    match &run {
        Some(run) => debug!(
            months = run.months,
            scheduled = %run.number_of_payments,
            total_paid = %run.total_paid,
            "amortization complete"
        ),
        None => debug!(
            amount = %mortgage.amount,
            interest_rate = %mortgage.interest_rate,
            "amounts out of Decimal range, amortization abandoned"
        ),
    }
    run
}

fn amortize(mortgage: &Mortgage, monthly_payment: Money, include_schedule: bool) -> Option<AmortizationRun> {
    let monthly_rate = mortgage.monthly_rate();
    let number_of_payments = mortgage.number_of_payments();
    let start_date = mortgage.normalized_start_date();
    let single_payments = bucket_single_payments(mortgage, start_date, number_of_payments);
    let linear_principal = mortgage.amount.checked_div(number_of_payments)?;

    let mut schedule = if include_schedule {
        let expected = number_of_payments.ceil().to_usize().unwrap_or(0);
        Vec::with_capacity(expected.min(MAX_SCHEDULE_PREALLOC))
    } else {
        Vec::new()
    };

    let mut balance = mortgage.amount;
    let mut month: u32 = 0;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest_paid = Decimal::ZERO;

    while balance > Decimal::ZERO && Decimal::from(month) < number_of_payments {
        let interest = balance.checked_mul(monthly_rate)?;
        let (regular_principal, scheduled_payment) = match mortgage.mortgage_type {
            MortgageType::Linear => (linear_principal, linear_principal.checked_add(interest)?),
            MortgageType::Annuity => (monthly_payment.checked_sub(interest)?, monthly_payment),
        };

        let single_payment = single_payments.amount_for(month);
        let requested_principal = regular_principal
            .checked_add(mortgage.extra_payment)?
            .checked_add(single_payment)?;
        let new_balance = balance.checked_sub(requested_principal)?.max(Decimal::ZERO);
        let total_payment = interest.checked_add(balance.checked_sub(new_balance)?)?;

        if include_schedule {
            schedule.push(ScheduleEntry {
                month: month + 1,
                date: payment_date(start_date, month),
                payment: scheduled_payment,
                principal: regular_principal,
                interest,
                extra_payment: mortgage.extra_payment,
                single_payment,
                total_payment,
                balance: new_balance,
            });
        }

        total_paid = total_paid.checked_add(total_payment)?;
        total_interest_paid = total_interest_paid.checked_add(interest)?;
        balance = new_balance;
        month += 1;
    }

    Some(AmortizationRun {
        months: month,
        number_of_payments,
        total_paid,
        total_interest_paid,
        single_payments,
        schedule,
    })
}

fn payment_date(start_date: NaiveDate, month: u32) -> NaiveDate {
    start_date
        .checked_add_months(Months::new(month))
        .unwrap_or(NaiveDate::MAX)
}

/// Simulate a mortgage against a given base monthly payment.
///
/// `total_interest` is the closed-form interest of the original schedule and
/// `interest_saved` compares it with the interest actually paid under the
/// accelerated schedule (`total_paid_with_extras − amount`). Degenerate inputs
/// return the original term, zero totals and an empty schedule.
pub fn simulate(mortgage: &Mortgage, monthly_payment: Money, include_schedule: bool) -> MortgageDetails {
    let run = run_amortization(mortgage, monthly_payment, include_schedule);
    assemble_details(mortgage, monthly_payment, run)
}

pub(crate) fn assemble_details(
    mortgage: &Mortgage,
    monthly_payment: Money,
    run: Option<AmortizationRun>,
) -> MortgageDetails {
    let total_interest = baseline_total_interest(mortgage, monthly_payment);
    let new_monthly_payment = monthly_payment.saturating_add(mortgage.extra_payment);

    match run {
        Some(run) => MortgageDetails {
            monthly_payment,
            total_interest,
            new_monthly_payment,
            new_term: run.new_term(),
            interest_saved: total_interest.saturating_sub(run.total_paid.saturating_sub(mortgage.amount)),
            total_paid_with_extras: run.total_paid,
            schedule: run.schedule,
        },
        None => MortgageDetails {
            monthly_payment,
            total_interest,
            new_monthly_payment,
            new_term: mortgage.term,
            interest_saved: Decimal::ZERO,
            total_paid_with_extras: Decimal::ZERO,
            schedule: Vec::new(),
        },
    }
}

/// Monthly payment, baseline interest, accelerated payoff and (optionally)
/// the full schedule for one mortgage.
///
/// Schedule generation is proportional to the term; pass `false` on
/// interactive recalculation and request it only when the month-by-month
/// view is shown.
pub fn calculate_mortgage_details(mortgage: &Mortgage, include_schedule: bool) -> MortgageDetails {
    let monthly_payment = calculate_monthly_payment(
        mortgage.amount,
        mortgage.interest_rate,
        mortgage.term,
        mortgage.mortgage_type,
    );
    simulate(mortgage, monthly_payment, include_schedule)
}

/// Schedule-free payoff figures: new term, cash paid, interest paid and
/// whole months saved against the scheduled term.
pub fn calculate_payoff(mortgage: &Mortgage, monthly_payment: Money) -> PayoffSummary {
    match run_amortization(mortgage, monthly_payment, false) {
        Some(run) => PayoffSummary {
            new_term: run.new_term(),
            total_paid_with_extras: run.total_paid,
            total_interest_paid: run.total_interest_paid,
            months_saved: (run.number_of_payments - Decimal::from(run.months))
                .floor()
                .to_u32()
                .unwrap_or(0),
        },
        None => PayoffSummary {
            new_term: mortgage.term,
            total_paid_with_extras: Decimal::ZERO,
            total_interest_paid: Decimal::ZERO,
            months_saved: 0,
        },
    }
}
