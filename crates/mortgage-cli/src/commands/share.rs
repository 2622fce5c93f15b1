use chrono::Local;
use clap::Args;
use serde_json::Value;

use mortgage_core::share::{
    decode_share_state, encode_share_state, restore_portfolio, share_param, share_url,
};

use super::portfolio::{resolve_portfolio, PortfolioArgs};

/// Arguments for encoding a share link
#[derive(Args)]
pub struct ShareEncodeArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    /// Page URL to append `?data=` to
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for decoding a share link
#[derive(Args)]
pub struct ShareDecodeArgs {
    /// Share link or bare base64 payload
    pub payload: String,

    /// Fall back to the default portfolio instead of failing
    #[arg(long)]
    pub fallback: bool,
}

pub fn run_share_encode(args: ShareEncodeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgages = resolve_portfolio(&args.portfolio)?;
    let encoded = encode_share_state(&mortgages, &Local)?;
    let url = args
        .base_url
        .map(|base| share_url(&base, &mortgages, &Local))
        .transpose()?;

    Ok(serde_json::json!({
        "encoded": encoded,
        "url": url,
        "mortgages": mortgages.len(),
    }))
}

pub fn run_share_decode(args: ShareDecodeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();

    if args.fallback {
        let restored = restore_portfolio(Some(&args.payload), today, &Local);
        return Ok(serde_json::to_value(restored)?);
    }

    let mortgages = decode_share_state(&share_param(&args.payload), today, &Local)?;
    Ok(serde_json::to_value(mortgages)?)
}
