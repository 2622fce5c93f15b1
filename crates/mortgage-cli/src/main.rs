mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::mortgage::{DetailsArgs, MortgageArgs};
use commands::portfolio::PortfolioArgs;
use commands::share::{ShareDecodeArgs, ShareEncodeArgs};

/// Mortgage amortization with recurring and one-time extra payments
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Mortgage amortization with recurring and one-time extra payments",
    long_about = "A CLI for modelling one or more mortgages with decimal precision. \
                  Computes monthly payments, baseline interest, the payoff term under \
                  extra payments, interest saved, amortization schedules, portfolio \
                  totals and shareable portfolio links."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment for a mortgage
    Payment(MortgageArgs),
    /// Payment, baseline interest, payoff term and interest saved
    Details(DetailsArgs),
    /// Month-by-month amortization schedule
    Schedule(MortgageArgs),
    /// Payoff term, cash paid and months saved
    Payoff(MortgageArgs),
    /// Year-end balances with and without extra payments
    Projection(MortgageArgs),
    /// Totals and amount-weighted averages across mortgages
    Portfolio(PortfolioArgs),
    /// All schedules of a portfolio merged by date
    Timeline(PortfolioArgs),
    /// Encode a portfolio as a share payload or link
    ShareEncode(ShareEncodeArgs),
    /// Decode a share payload or link into mortgages
    ShareDecode(ShareDecodeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Details(args) => commands::mortgage::run_details(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Payoff(args) => commands::mortgage::run_payoff(args),
        Commands::Projection(args) => commands::mortgage::run_projection(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Timeline(args) => commands::portfolio::run_timeline(args),
        Commands::ShareEncode(args) => commands::share::run_share_encode(args),
        Commands::ShareDecode(args) => commands::share::run_share_decode(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
