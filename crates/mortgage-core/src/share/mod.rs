//! Shareable portfolio state: a base64-encoded JSON list of mortgages carried
//! in a single `data` URL query parameter.
//!
//! The wire shape is the front end's: camelCase keys, plain JSON numbers and
//! ISO-8601 UTC timestamps of local midnight. Dates are converted through the
//! caller's time zone both ways, so a link keeps its calendar months between
//! the browser that made it and the process reading it. Decoding is lenient about what an older or
//! hand-edited link may lack (ids, names, single payments, start dates) but
//! rejects anything that is not a non-empty list of mortgage records.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::amortization::{Mortgage, MortgageType, SinglePayment};
use crate::error::MortgageError;
use crate::MortgageResult;

/// Query parameter holding the encoded portfolio.
pub const SHARE_PARAM: &str = "data";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedMortgage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "number_or_zero")]
    amount: Decimal,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "number_or_zero")]
    interest_rate: Decimal,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "number_or_zero")]
    term: Decimal,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "number_or_zero")]
    extra_payment: Decimal,
    #[serde(default, rename = "type")]
    mortgage_type: MortgageType,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    single_payments: Option<Vec<SharedSinglePayment>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SharedSinglePayment {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "number_or_zero")]
    amount: Decimal,
    #[serde(default)]
    date: Option<String>,
}

/// JSON number, numeric string or `null` (an emptied form field serializes
/// as `null`); `null` reads as zero.
fn number_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Decimal> = rust_decimal::serde::float_option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Encode mortgages as base64 JSON for a share link.
///
/// Dates are written as the UTC instant of local midnight in `tz`.
pub fn encode_share_state<Tz: TimeZone>(mortgages: &[Mortgage], tz: &Tz) -> MortgageResult<String> {
    let records: Vec<SharedMortgage> = mortgages.iter().map(|m| to_shared(m, tz)).collect();
    let json = serde_json::to_string(&records)?;
    Ok(STANDARD.encode(json))
}

/// Decode a share-link payload back into mortgages.
///
/// Timestamps are read as calendar dates in `tz`; bare `YYYY-MM-DD` dates and
/// offset-less timestamps are taken as written. `today` stands in for a
/// missing start date.
pub fn decode_share_state<Tz: TimeZone>(
    encoded: &str,
    today: NaiveDate,
    tz: &Tz,
) -> MortgageResult<Vec<Mortgage>> {
    let bytes = decode_base64(encoded)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| MortgageError::InvalidShareState(format!("payload is not JSON: {e}")))?;

    match &value {
        serde_json::Value::Array(items) if !items.is_empty() => {}
        _ => {
            return Err(MortgageError::InvalidShareState(
                "expected a non-empty list of mortgages".into(),
            ))
        }
    }

    let records: Vec<SharedMortgage> = serde_json::from_value(value)
        .map_err(|e| MortgageError::InvalidShareState(format!("malformed mortgage record: {e}")))?;

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| from_shared(idx, record, today, tz))
        .collect()
}

/// Build a share URL: `{base}?data={encoded}`.
pub fn share_url<Tz: TimeZone>(base: &str, mortgages: &[Mortgage], tz: &Tz) -> MortgageResult<String> {
    let encoded = encode_share_state(mortgages, tz)?;
    Ok(format!("{base}?{SHARE_PARAM}={encoded}"))
}

/// Extract the `data` value from a full share URL; anything without a
/// `data=` parameter is returned trimmed, as an already-bare payload.
pub fn share_param(url_or_value: &str) -> String {
    let trimmed = url_or_value.trim();
    let needle = format!("{SHARE_PARAM}=");

    let query = trimmed.split_once('?').map(|(_, q)| q).unwrap_or(trimmed);
    let param = query
        .split(['&', '#'])
        .find_map(|pair| pair.strip_prefix(needle.as_str()));

    match param {
        Some(raw) => raw
            .replace("%2B", "+")
            .replace("%2F", "/")
            .replace("%3D", "="),
        None => trimmed.to_string(),
    }
}

/// Outcome of restoring a portfolio from an optional share payload.
#[derive(Debug, Clone, Serialize)]
pub struct RestoredPortfolio {
    pub mortgages: Vec<Mortgage>,
    /// Set when the payload loaded (success notice) or failed (fallback notice).
    pub notice: Option<String>,
    pub from_share: bool,
}

/// Restore a portfolio from a share payload, falling back to the default
/// single-mortgage portfolio when there is no payload or it cannot be decoded.
pub fn restore_portfolio<Tz: TimeZone>(
    encoded: Option<&str>,
    today: NaiveDate,
    tz: &Tz,
) -> RestoredPortfolio {
    let Some(encoded) = encoded.filter(|e| !e.trim().is_empty()) else {
        return RestoredPortfolio {
            mortgages: default_portfolio(today),
            notice: None,
            from_share: false,
        };
    };

    match decode_share_state(&share_param(encoded), today, tz) {
        Ok(mortgages) => RestoredPortfolio {
            mortgages,
            notice: Some("Shared mortgage data loaded".into()),
            from_share: true,
        },
        Err(e) => {
            warn!(error = %e, "failed to load shared mortgage data, using defaults");
            RestoredPortfolio {
                mortgages: default_portfolio(today),
                notice: Some(format!("Failed to load shared data: {e}")),
                from_share: false,
            }
        }
    }
}

/// Portfolio shown before the user enters anything.
pub fn default_portfolio(today: NaiveDate) -> Vec<Mortgage> {
    vec![Mortgage::new(dec!(300_000), dec!(3.5), dec!(30), today)
        .with_id("mortgage-1")
        .with_name("Primary Mortgage")
        .with_extra_payment(dec!(200))]
}

/// Template for the mortgage added at 1-based position `number`.
pub fn default_mortgage(number: usize, today: NaiveDate) -> Mortgage {
    Mortgage::new(dec!(200_000), dec!(3.5), dec!(30), today)
        .with_id(format!("mortgage-{number}"))
        .with_name(format!("Mortgage {number}"))
        .with_extra_payment(dec!(100))
}

fn decode_base64(encoded: &str) -> MortgageResult<Vec<u8>> {
    // Form decoding of an unescaped query turns '+' into ' '.
    let cleaned: String = encoded.trim().replace(' ', "+");

    let mut last_err = None;
    for engine in [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD] {
        match engine.decode(&cleaned) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e.into()),
        None => Err(MortgageError::InvalidShareState("empty payload".into())),
    }
}

fn to_shared<Tz: TimeZone>(mortgage: &Mortgage, tz: &Tz) -> SharedMortgage {
    SharedMortgage {
        id: Some(mortgage.id.clone()),
        name: Some(mortgage.name.clone()),
        amount: mortgage.amount,
        interest_rate: mortgage.interest_rate,
        term: mortgage.term,
        extra_payment: mortgage.extra_payment,
        mortgage_type: mortgage.mortgage_type,
        start_date: Some(iso_date(mortgage.start_date, tz)),
        single_payments: Some(
            mortgage
                .single_payments
                .iter()
                .map(|p| SharedSinglePayment {
                    id: Some(p.id.clone()),
                    amount: p.amount,
                    date: Some(iso_date(p.date, tz)),
                })
                .collect(),
        ),
    }
}

fn from_shared<Tz: TimeZone>(
    idx: usize,
    record: SharedMortgage,
    today: NaiveDate,
    tz: &Tz,
) -> MortgageResult<Mortgage> {
    let number = idx + 1;
    let id = non_empty(record.id).unwrap_or_else(|| format!("mortgage-{number}"));
    let name = non_empty(record.name).unwrap_or_else(|| format!("Mortgage {number}"));
    let start_date = match record.start_date.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_share_date(s, tz)?,
        _ => today,
    };

    let mut single_payments = Vec::new();
    for (p_idx, payment) in record.single_payments.unwrap_or_default().into_iter().enumerate() {
        // A payment without a date can never be bucketed.
        let Some(date) = payment.date.as_deref().filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        single_payments.push(SinglePayment {
            id: non_empty(payment.id).unwrap_or_else(|| format!("payment-{}", p_idx + 1)),
            amount: payment.amount,
            date: parse_share_date(date, tz)?,
        });
    }

    Ok(Mortgage {
        id,
        name,
        amount: record.amount,
        interest_rate: record.interest_rate,
        term: record.term,
        extra_payment: record.extra_payment,
        mortgage_type: record.mortgage_type,
        start_date,
        single_payments,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn iso_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> String {
    let midnight = date.and_time(NaiveTime::MIN);
    // Midnight may fall in a DST gap; UTC midnight keeps the calendar date then.
    let instant = tz
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight));
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Calendar date in `tz` of an ISO-8601 timestamp, or a bare date as written.
fn parse_share_date<Tz: TimeZone>(s: &str, tz: &Tz) -> MortgageResult<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(tz).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt.with_timezone(tz).date_naive());
    }
    Err(MortgageError::DateError(format!("unrecognised date '{s}'")))
}
