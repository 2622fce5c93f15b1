//! Single-mortgage analysis wrapped in the standard computation envelope.

use std::time::Instant;

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{Mortgage, MortgageDetails, MortgageType};
use super::payment::calculate_monthly_payment;
use super::simulator::{assemble_details, is_valid_mortgage, run_amortization, MAX_TERM_YEARS};
use super::single_payments::months_between;
use crate::types::{ComputationOutput, Money};

/// Mortgage plus the schedule flag, as accepted from files, stdin and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    #[serde(flatten)]
    pub mortgage: Mortgage,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    /// False when the inputs were degenerate and the amortization was skipped.
    pub is_valid: bool,
    #[serde(flatten)]
    pub details: MortgageDetails,
    /// Interest accrued under the accelerated schedule.
    pub total_interest_paid: Money,
    /// Whole months between payoff and the end of the scheduled term.
    pub months_saved: u32,
}

/// Analyse a mortgage, reporting every input that the engine ignored.
///
/// The figures are those of [`calculate_mortgage_details`]; the envelope
/// warnings additionally name degenerate fields, one-time payments dropped at
/// bucketing time, and bucketed payments never applied because the loan was
/// repaid before their month.
///
/// [`calculate_mortgage_details`]: super::simulator::calculate_mortgage_details
pub fn analyze_mortgage(input: &MortgageInput) -> ComputationOutput<MortgageAnalysis> {
    let start = Instant::now();
    let mortgage = &input.mortgage;
    let mut warnings: Vec<String> = Vec::new();

    let monthly_payment = calculate_monthly_payment(
        mortgage.amount,
        mortgage.interest_rate,
        mortgage.term,
        mortgage.mortgage_type,
    );
    let run = run_amortization(mortgage, monthly_payment, input.include_schedule);

    let months_simulated = run.as_ref().map_or(0, |run| run.months);
    let (total_interest_paid, months_saved) = match &run {
        Some(run) => {
            warnings.extend(ignored_single_payments(mortgage, run.number_of_payments));
            let start_date = mortgage.normalized_start_date();
            for (month, amount) in run.single_payments.from_month(run.months) {
                warnings.push(format!(
                    "One-time payment of {amount} due {} was not applied: the mortgage is repaid after {} months",
                    month_label(start_date, month),
                    run.months
                ));
            }
            let saved = run.number_of_payments - Decimal::from(run.months);
            (run.total_interest_paid, saved.floor().to_u32().unwrap_or(0))
        }
        None => {
            warnings.extend(degenerate_reasons(mortgage));
            (Decimal::ZERO, 0)
        }
    };

    let output = MortgageAnalysis {
        is_valid: run.is_some(),
        details: assemble_details(mortgage, monthly_payment, run),
        total_interest_paid,
        months_saved,
    };

    let methodology = match mortgage.mortgage_type {
        MortgageType::Annuity => "Annuity amortization with recurring and one-time extra payments",
        MortgageType::Linear => "Linear amortization with recurring and one-time extra payments",
    };

    ComputationOutput::new(
        output,
        methodology,
        serde_json::json!({
            "amount": mortgage.amount.to_string(),
            "interest_rate_pct": mortgage.interest_rate.to_string(),
            "term_years": mortgage.term.to_string(),
            "extra_payment": mortgage.extra_payment.to_string(),
            "start_month": mortgage.normalized_start_date().format("%Y-%m").to_string(),
            "single_payments": mortgage.single_payments.len(),
            "include_schedule": input.include_schedule,
        }),
        warnings,
        start,
        months_simulated,
    )
}

/// Human-readable reasons the simulator refuses to run.
///
/// Inputs that pass every field check but still produce no schedule have
/// amounts beyond `Decimal` range, which is reported as the reason.
pub fn degenerate_reasons(mortgage: &Mortgage) -> Vec<String> {
    let mut reasons = Vec::new();
    if mortgage.amount <= Decimal::ZERO {
        reasons.push(format!(
            "Amount {} is not positive; amortization skipped",
            mortgage.amount
        ));
    }
    if mortgage.interest_rate <= Decimal::ZERO {
        reasons.push(format!(
            "Interest rate {}% is not positive; amortization skipped",
            mortgage.interest_rate
        ));
    }
    if mortgage.term <= Decimal::ZERO {
        reasons.push(format!(
            "Term {} years is not positive; amortization skipped",
            mortgage.term
        ));
    }
    if mortgage.extra_payment < Decimal::ZERO {
        reasons.push(format!(
            "Extra payment {} is negative; amortization skipped",
            mortgage.extra_payment
        ));
    }
    if mortgage.term > MAX_TERM_YEARS {
        reasons.push(format!(
            "Term {} years exceeds the {MAX_TERM_YEARS} year limit; amortization skipped",
            mortgage.term
        ));
    }
    if reasons.is_empty() && is_valid_mortgage(mortgage) {
        reasons.push("Amounts exceed the representable range; amortization skipped".into());
    }
    reasons
}

fn ignored_single_payments(mortgage: &Mortgage, number_of_payments: Decimal) -> Vec<String> {
    let start_date = mortgage.normalized_start_date();
    let mut warnings = Vec::new();

    for (idx, payment) in mortgage.single_payments.iter().enumerate() {
        let label = if payment.id.is_empty() {
            format!("#{}", idx + 1)
        } else {
            payment.id.clone()
        };
        if payment.amount <= Decimal::ZERO {
            warnings.push(format!(
                "One-time payment {label} on {} ignored: amount {} is not positive",
                payment.date, payment.amount
            ));
            continue;
        }
        let months_diff = months_between(start_date, payment.date);
        if months_diff < 0 || Decimal::from(months_diff) >= number_of_payments {
            warnings.push(format!(
                "One-time payment {label} on {} ignored: outside the mortgage term starting {}",
                payment.date,
                start_date.format("%Y-%m")
            ));
        }
    }

    warnings
}

fn month_label(start_date: NaiveDate, month: u32) -> String {
    start_date
        .checked_add_months(Months::new(month))
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_else(|| format!("in month {}", month + 1))
}
