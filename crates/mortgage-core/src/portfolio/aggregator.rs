//! Portfolio totals and amount-weighted averages across mortgages.

use std::collections::HashSet;
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{calculate_mortgage_details, Mortgage, MortgageDetails};
use crate::error::MortgageError;
use crate::types::{ComputationOutput, Money, Percent, Years};
use crate::MortgageResult;

/// Per-mortgage line of a portfolio summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageBreakdown {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub term: Years,
    pub details: MortgageDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_amount: Money,
    pub total_monthly_payment: Money,
    pub total_new_monthly_payment: Money,
    pub total_extra_payment: Money,
    pub total_interest: Money,
    pub total_interest_saved: Money,
    pub total_paid_with_extras: Money,
    /// Interest still paid under the accelerated schedules.
    pub new_total_interest: Money,
    /// Principal plus baseline interest.
    pub total_cost: Money,
    /// Principal plus interest under the accelerated schedules.
    pub new_total_cost: Money,
    /// Amount-weighted scheduled term; zero for an empty or zero-amount portfolio.
    pub weighted_term: Years,
    /// Amount-weighted payoff term.
    pub weighted_new_term: Years,
    /// Amount-weighted nominal rate.
    pub weighted_interest_rate: Percent,
    pub mortgages: Vec<MortgageBreakdown>,
}

/// Input for the portfolio analysis envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub mortgages: Vec<Mortgage>,
}

/// Reduce already-computed details into portfolio totals.
///
/// `details[i]` must belong to `mortgages[i]`; surplus entries on either
/// side are ignored. Weighted averages use each mortgage's amount as weight
/// and fall back to zero when the total amount is zero. Totals saturate at
/// the `Decimal` bounds instead of overflowing.
pub fn aggregate(mortgages: &[Mortgage], details: &[MortgageDetails]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_amount: Decimal::ZERO,
        total_monthly_payment: Decimal::ZERO,
        total_new_monthly_payment: Decimal::ZERO,
        total_extra_payment: Decimal::ZERO,
        total_interest: Decimal::ZERO,
        total_interest_saved: Decimal::ZERO,
        total_paid_with_extras: Decimal::ZERO,
        new_total_interest: Decimal::ZERO,
        total_cost: Decimal::ZERO,
        new_total_cost: Decimal::ZERO,
        weighted_term: Decimal::ZERO,
        weighted_new_term: Decimal::ZERO,
        weighted_interest_rate: Decimal::ZERO,
        mortgages: Vec::with_capacity(mortgages.len()),
    };

    let mut term_weight = Decimal::ZERO;
    let mut new_term_weight = Decimal::ZERO;
    let mut rate_weight = Decimal::ZERO;

    for (mortgage, d) in mortgages.iter().zip(details) {
        let new_total_interest = d.total_interest.saturating_sub(d.interest_saved);

        summary.total_amount = summary.total_amount.saturating_add(mortgage.amount);
        summary.total_monthly_payment = summary.total_monthly_payment.saturating_add(d.monthly_payment);
        summary.total_new_monthly_payment =
            summary.total_new_monthly_payment.saturating_add(d.new_monthly_payment);
        summary.total_extra_payment = summary.total_extra_payment.saturating_add(mortgage.extra_payment);
        summary.total_interest = summary.total_interest.saturating_add(d.total_interest);
        summary.total_interest_saved = summary.total_interest_saved.saturating_add(d.interest_saved);
        summary.total_paid_with_extras =
            summary.total_paid_with_extras.saturating_add(d.total_paid_with_extras);
        summary.new_total_interest = summary.new_total_interest.saturating_add(new_total_interest);
        summary.total_cost = summary
            .total_cost
            .saturating_add(mortgage.amount.saturating_add(d.total_interest));
        summary.new_total_cost = summary
            .new_total_cost
            .saturating_add(mortgage.amount.saturating_add(new_total_interest));

        term_weight = term_weight.saturating_add(mortgage.term.saturating_mul(mortgage.amount));
        new_term_weight = new_term_weight.saturating_add(d.new_term.saturating_mul(mortgage.amount));
        rate_weight = rate_weight.saturating_add(mortgage.interest_rate.saturating_mul(mortgage.amount));

        summary.mortgages.push(MortgageBreakdown {
            id: mortgage.id.clone(),
            name: mortgage.name.clone(),
            amount: mortgage.amount,
            term: mortgage.term,
            details: d.clone(),
        });
    }

    if !summary.total_amount.is_zero() {
        summary.weighted_term = weighted(term_weight, summary.total_amount);
        summary.weighted_new_term = weighted(new_term_weight, summary.total_amount);
        summary.weighted_interest_rate = weighted(rate_weight, summary.total_amount);
    }

    summary
}

/// Amount-weighted average; zero when the quotient leaves `Decimal` range.
fn weighted(weight: Decimal, total_amount: Money) -> Decimal {
    weight.checked_div(total_amount).unwrap_or(Decimal::ZERO)
}

/// Compute every mortgage's details (without schedules) and aggregate them.
pub fn summarize_portfolio(mortgages: &[Mortgage]) -> PortfolioSummary {
    let details: Vec<MortgageDetails> = mortgages
        .iter()
        .map(|m| calculate_mortgage_details(m, false))
        .collect();
    aggregate(mortgages, &details)
}

/// Portfolio summary in the standard computation envelope.
pub fn analyze_portfolio(
    input: &PortfolioInput,
) -> MortgageResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.mortgages.is_empty() {
        return Err(MortgageError::InsufficientData(
            "Portfolio analysis requires at least one mortgage".into(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for (idx, mortgage) in input.mortgages.iter().enumerate() {
        if !mortgage.id.is_empty() && !seen_ids.insert(mortgage.id.as_str()) {
            return Err(MortgageError::InvalidInput {
                field: format!("mortgages[{idx}].id"),
                reason: format!("duplicate mortgage id '{}'", mortgage.id),
            });
        }
    }

    for (idx, mortgage) in input.mortgages.iter().enumerate() {
        if !crate::amortization::is_valid_mortgage(mortgage) {
            let label = if mortgage.name.is_empty() {
                format!("#{}", idx + 1)
            } else {
                mortgage.name.clone()
            };
            warnings.push(format!(
                "Mortgage {label} has degenerate inputs; its payoff equals its scheduled term"
            ));
        }
    }

    let summary = summarize_portfolio(&input.mortgages);
    if summary.total_amount.is_zero() {
        warnings.push("Total mortgage amount is zero; weighted averages reported as 0".into());
    }

    let months_simulated = summary
        .mortgages
        .iter()
        .map(|m| loop_months(&m.details))
        .fold(0u32, u32::saturating_add);

    Ok(ComputationOutput::new(
        summary,
        "Portfolio aggregation (amount-weighted terms and rate)",
        serde_json::json!({
            "mortgages": input.mortgages.len(),
        }),
        warnings,
        start,
        months_simulated,
    ))
}

/// Months the loop ran for one mortgage. Degenerate details pay nothing.
fn loop_months(details: &MortgageDetails) -> u32 {
    if details.total_paid_with_extras.is_zero() {
        return 0;
    }
    (details.new_term * dec!(12)).round().to_u32().unwrap_or(0)
}
