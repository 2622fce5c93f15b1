use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Nominal annual rates expressed as percentages (3.5 = 3.5%), as entered by the user.
pub type Percent = Decimal;

/// Year counts; may be fractional (a payoff after 17 months is 1.41666… years).
pub type Years = Decimal;

/// Rate convention every figure is computed under.
pub const RATE_BASIS: &str = "nominal annual percent, compounded monthly (rate / 100 / 12)";

/// Analysis result with the inputs it assumed and every input the engine ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub engine_version: String,
    pub computation_time_us: u64,
    /// Months stepped by the amortization loop, summed over all mortgages;
    /// 0 when every mortgage took the degenerate path.
    pub months_simulated: u32,
    pub rate_basis: String,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Wrap `result`, timing the computation from `started`.
    pub fn new(
        result: T,
        methodology: impl Into<String>,
        assumptions: serde_json::Value,
        warnings: Vec<String>,
        started: Instant,
        months_simulated: u32,
    ) -> Self {
        ComputationOutput {
            result,
            methodology: methodology.into(),
            assumptions,
            warnings,
            metadata: ComputationMetadata {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                computation_time_us: started.elapsed().as_micros() as u64,
                months_simulated,
                rate_basis: RATE_BASIS.to_string(),
            },
        }
    }
}
