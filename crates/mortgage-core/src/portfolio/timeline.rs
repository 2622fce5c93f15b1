//! Month-by-month payments of every mortgage merged into one dated timeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{calculate_mortgage_details, Mortgage};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub mortgage_id: String,
    pub mortgage_name: String,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub extra_payment: Money,
    pub single_payment: Money,
    pub total_payment: Money,
    pub balance: Money,
}

/// Every mortgage's full schedule, tagged with its id and name and sorted by
/// date. Entries sharing a date keep the portfolio order.
pub fn unified_timeline(mortgages: &[Mortgage]) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = mortgages
        .iter()
        .flat_map(|mortgage| {
            calculate_mortgage_details(mortgage, true)
                .schedule
                .into_iter()
                .map(move |entry| TimelineEntry {
                    date: entry.date,
                    mortgage_id: mortgage.id.clone(),
                    mortgage_name: mortgage.name.clone(),
                    payment: entry.payment,
                    principal: entry.principal,
                    interest: entry.interest,
                    extra_payment: entry.extra_payment,
                    single_payment: entry.single_payment,
                    total_payment: entry.total_payment,
                    balance: entry.balance,
                })
        })
        .collect();

    entries.sort_by_key(|e| e.date);
    entries
}
