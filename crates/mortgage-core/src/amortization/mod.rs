pub mod analysis;
pub mod model;
pub mod payment;
pub mod projection;
pub mod simulator;
pub mod single_payments;

pub use analysis::{analyze_mortgage, MortgageAnalysis, MortgageInput};
pub use model::{Mortgage, MortgageDetails, MortgageType, PayoffSummary, ScheduleEntry, SinglePayment};
pub use payment::calculate_monthly_payment;
pub use projection::{balance_projection, YearlyBalance};
pub use simulator::{calculate_mortgage_details, calculate_payoff, is_valid_mortgage, simulate};
pub use single_payments::{bucket_single_payments, SinglePaymentsByMonth};
