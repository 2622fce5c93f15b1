pub mod aggregator;
pub mod timeline;

pub use aggregator::{
    aggregate, analyze_portfolio, summarize_portfolio, MortgageBreakdown, PortfolioInput,
    PortfolioSummary,
};
pub use timeline::{unified_timeline, TimelineEntry};
