use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::amortization::{
    analyze_mortgage, balance_projection, payment::payment_inputs_valid, MortgageInput,
};
use mortgage_core::{calculate_monthly_payment, calculate_payoff, Mortgage, MortgageType, SinglePayment};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Annuity,
    Linear,
}

impl From<TypeArg> for MortgageType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Annuity => MortgageType::Annuity,
            TypeArg::Linear => MortgageType::Linear,
        }
    }
}

/// Arguments describing a single mortgage
#[derive(Args)]
pub struct MortgageArgs {
    /// Principal (e.g. 300000)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 3.5 for 3.5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Recurring extra principal paid every month
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// Amortization convention
    #[arg(long = "type", value_enum, default_value = "annuity")]
    pub mortgage_type: TypeArg,

    /// First payment month (YYYY-MM-DD; the day is ignored). Defaults to today.
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// One-time extra payment as YYYY-MM-DD=AMOUNT (repeatable)
    #[arg(long = "single-payment", value_parser = parse_single_payment)]
    pub single_payments: Vec<SinglePayment>,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the details command
#[derive(Args)]
pub struct DetailsArgs {
    #[command(flatten)]
    pub mortgage: MortgageArgs,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,
}

fn parse_single_payment(raw: &str) -> Result<SinglePayment, String> {
    let (date, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected YYYY-MM-DD=AMOUNT, got '{raw}'"))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{date}': {e}"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok(SinglePayment::new(amount, date))
}

/// Resolve a mortgage from `--input`, piped JSON, or the individual flags.
pub fn resolve_mortgage(args: MortgageArgs) -> Result<MortgageInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let start_date = args.start_date.unwrap_or_else(|| Local::now().date_naive());
    let mut mortgage = Mortgage::new(
        args.amount.ok_or("--amount is required (or provide --input)")?,
        args.interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        args.term.ok_or("--term is required (or provide --input)")?,
        start_date,
    )
    .with_type(args.mortgage_type.into())
    .with_extra_payment(args.extra_payment.unwrap_or(Decimal::ZERO))
    .with_single_payments(args.single_payments);
    if let Some(name) = args.name {
        mortgage = mortgage.with_name(name);
    }

    Ok(MortgageInput {
        mortgage,
        include_schedule: false,
    })
}

pub fn run_payment(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let m = resolve_mortgage(args)?.mortgage;
    let monthly_payment =
        calculate_monthly_payment(m.amount, m.interest_rate, m.term, m.mortgage_type);

    Ok(serde_json::json!({
        "monthly_payment": monthly_payment,
        "new_monthly_payment": monthly_payment.saturating_add(m.extra_payment),
        "type": m.mortgage_type,
        "valid_inputs": payment_inputs_valid(m.amount, m.interest_rate, m.term),
    }))
}

pub fn run_details(args: DetailsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut mortgage_input = resolve_mortgage(args.mortgage)?;
    mortgage_input.include_schedule |= args.schedule;
    let result = analyze_mortgage(&mortgage_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut mortgage_input = resolve_mortgage(args)?;
    mortgage_input.include_schedule = true;
    let result = analyze_mortgage(&mortgage_input);
    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
    Ok(serde_json::to_value(result.result.details.schedule)?)
}

pub fn run_payoff(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let m = resolve_mortgage(args)?.mortgage;
    let monthly_payment =
        calculate_monthly_payment(m.amount, m.interest_rate, m.term, m.mortgage_type);
    let result = calculate_payoff(&m, monthly_payment);
    Ok(serde_json::to_value(result)?)
}

pub fn run_projection(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let m = resolve_mortgage(args)?.mortgage;
    Ok(serde_json::to_value(balance_projection(&m))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_single_payment() {
        let p = parse_single_payment("2026-03-15=10000").unwrap();
        assert_eq!(p.amount, dec!(10000));
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert!(p.id.is_empty());
    }

    #[test]
    fn test_parse_single_payment_rejects_garbage() {
        assert!(parse_single_payment("10000").is_err());
        assert!(parse_single_payment("2026-13-01=5").is_err());
        assert!(parse_single_payment("2026-01-01=lots").is_err());
    }
}
