use chrono::Local;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use mortgage_core::portfolio::{analyze_portfolio, unified_timeline, PortfolioInput};
use mortgage_core::share::{decode_share_state, share_param};
use mortgage_core::Mortgage;

use crate::input;

/// Arguments for portfolio-wide commands
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON or YAML file: `{"mortgages": [...]}` or a bare list
    #[arg(long)]
    pub input: Option<String>,

    /// Share link or bare share payload to load the portfolio from
    #[arg(long, conflicts_with = "input")]
    pub share: Option<String>,
}

/// Both document shapes accepted for a portfolio.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioDocument {
    Wrapped(PortfolioInput),
    Bare(Vec<Mortgage>),
}

impl From<PortfolioDocument> for Vec<Mortgage> {
    fn from(doc: PortfolioDocument) -> Self {
        match doc {
            PortfolioDocument::Wrapped(input) => input.mortgages,
            PortfolioDocument::Bare(mortgages) => mortgages,
        }
    }
}

/// Resolve the portfolio from `--share`, `--input`, or piped JSON.
pub fn resolve_portfolio(args: &PortfolioArgs) -> Result<Vec<Mortgage>, Box<dyn std::error::Error>> {
    if let Some(ref shared) = args.share {
        let today = Local::now().date_naive();
        return Ok(decode_share_state(&share_param(shared), today, &Local)?);
    }
    let doc: PortfolioDocument = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file>, --share <link> or stdin required for portfolio analysis".into());
    };
    Ok(doc.into())
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgages = resolve_portfolio(&args)?;
    let result = analyze_portfolio(&PortfolioInput { mortgages })?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_timeline(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgages = resolve_portfolio(&args)?;
    Ok(serde_json::to_value(unified_timeline(&mortgages))?)
}
