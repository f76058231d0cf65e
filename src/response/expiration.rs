//! `x-amz-expiration` header decoding.

use crate::types::Expiration;
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EXPIRY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"expiry-date="(.*)","#).expect("valid expiry-date pattern"));

static RULE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"rule-id="(.*)""#).expect("valid rule-id pattern"));

/// Decode an `x-amz-expiration` header value.
///
/// The header looks like
/// `expiry-date="Fri, 23 Dec 2012 00:00:00 GMT", rule-id="1"`. The date and
/// rule ID are extracted independently; a result is returned only when both
/// are found and the date parses.
pub fn extract_expiration(header: &str) -> Option<Expiration> {
    let expiry_date = EXPIRY_DATE
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| normalize_http_date(m.as_str()));

    let rule_id = RULE_ID
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    match (expiry_date, rule_id) {
        (Some(expiry_date), Some(rule_id)) => Some(Expiration {
            expiry_date,
            rule_id,
        }),
        _ => None,
    }
}

/// Convert an RFC 1123 date to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// A leading weekday is dropped before parsing since it is redundant with the
/// date and is not always consistent with it.
fn normalize_http_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let without_weekday = match trimmed.split_once(',') {
        Some((weekday, rest)) if weekday.chars().all(|c| c.is_ascii_alphabetic()) => rest.trim(),
        _ => trimmed,
    };

    DateTime::parse_from_rfc2822(without_weekday)
        .ok()
        .map(|date| {
            date.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
}
