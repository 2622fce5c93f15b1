//! Month bucketing of one-time extra payments.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::Mortgage;
use crate::types::Money;

/// Sparse map from month index (0 = start month) to the summed one-time
/// payments falling in that month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinglePaymentsByMonth(BTreeMap<u32, Money>);

impl SinglePaymentsByMonth {
    /// Amount due in `month`, zero when nothing is scheduled.
    pub fn amount_for(&self, month: u32) -> Money {
        self.0.get(&month).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Money)> + '_ {
        self.0.iter().map(|(m, a)| (*m, *a))
    }

    /// Buckets at or after `month`, i.e. those a loop that stopped at
    /// `month` never reached.
    pub fn from_month(&self, month: u32) -> impl Iterator<Item = (u32, Money)> + '_ {
        self.0.range(month..).map(|(m, a)| (*m, *a))
    }

    pub fn total(&self) -> Money {
        self.0.values().fold(Decimal::ZERO, |acc, a| acc.saturating_add(*a))
    }

    fn add(&mut self, month: u32, amount: Money) {
        let bucket = self.0.entry(month).or_insert(Decimal::ZERO);
        *bucket = bucket.saturating_add(amount);
    }
}

/// Calendar months from `start` to `date`, ignoring the day of month.
pub fn months_between(start: NaiveDate, date: NaiveDate) -> i64 {
    (date.year() as i64 - start.year() as i64) * 12 + (date.month() as i64 - start.month() as i64)
}

/// Bucket the mortgage's one-time payments by month offset from `start_date`.
///
/// Payments with a non-positive amount are skipped. Payments landing before
/// the start month or at/after `number_of_payments` months fall outside the
/// active window and are dropped. Payments sharing a month are summed.
pub fn bucket_single_payments(
    mortgage: &Mortgage,
    start_date: NaiveDate,
    number_of_payments: Decimal,
) -> SinglePaymentsByMonth {
    let mut buckets = SinglePaymentsByMonth::default();

    for payment in &mortgage.single_payments {
        if payment.amount <= Decimal::ZERO {
            continue;
        }
        let months_diff = months_between(start_date, payment.date);
        if months_diff < 0 || Decimal::from(months_diff) >= number_of_payments {
            continue;
        }
        if let Ok(month) = u32::try_from(months_diff) {
            buckets.add(month, payment.amount);
        }
    }

    buckets
}
