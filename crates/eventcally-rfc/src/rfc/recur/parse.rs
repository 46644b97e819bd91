//! Line parser for recurrence text.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use eventcally_core::constants::{DATE_COMPACT_FORMAT, DATE_PART_FORMAT};
use rrule::{RRule, Unvalidated};

use super::core::{DateValue, DateZone, RecurrenceRule};
use super::date::end_of_day;
use crate::error::{RfcError, RfcResult};

/// ## Summary
/// Parses newline-separated `RRULE`/`EXDATE`/`RDATE` property lines.
///
/// Property names are case-insensitive, blank lines and unknown properties
/// are skipped, and date lists may be comma-separated.
///
/// ## Errors
/// Returns `RfcError::InvalidRecurrenceRule` if a line has no `:` separator,
/// the `RRULE` value is rejected by the `rrule` crate, or a date value is
/// malformed. Returns `RfcError::UnknownTimezone` for an unresolvable `TZID`.
pub fn parse_recurrence_rule(text: &str) -> RfcResult<RecurrenceRule> {
    let mut rule = RecurrenceRule::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((head, value)) = line.split_once(':') else {
            return Err(RfcError::InvalidRecurrenceRule(format!(
                "line {}: missing ':' in {line:?}",
                index + 1
            )));
        };

        let mut head_parts = head.split(';');
        let name = head_parts.next().unwrap_or_default().trim().to_ascii_uppercase();
        let params = parse_params(head_parts)?;

        match name.as_str() {
            "RRULE" => {
                let value = value.trim();
                parse_rrule(value, &chrono_tz::UTC)?;
                rule.rrules.push(value.to_string());
            }
            "EXDATE" => rule.exdates.extend(parse_date_list(value, &params)?),
            "RDATE" => rule.rdates.extend(parse_date_list(value, &params)?),
            _ => {
                tracing::trace!(property = %name, "Ignoring unsupported recurrence property");
            }
        }
    }

    tracing::trace!(
        rrules = rule.rrules.len(),
        exdates = rule.exdates.len(),
        rdates = rule.rdates.len(),
        "Parsed recurrence rule"
    );
    Ok(rule)
}

impl FromStr for RecurrenceRule {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_recurrence_rule(s)
    }
}

/// ## Summary
/// Parses one `RRULE` value after moving its `UNTIL` into UTC.
///
/// A floating `UNTIL` is read in `tz`; a date-only `UNTIL` covers the whole
/// day. The `rrule` crate only accepts a UTC `UNTIL` for zoned anchors.
///
/// ## Errors
/// Returns `RfcError::InvalidRecurrenceRule` if the value or its `UNTIL` is
/// malformed.
pub(crate) fn parse_rrule(value: &str, tz: &chrono_tz::Tz) -> RfcResult<RRule<Unvalidated>> {
    let normalized = value
        .split(';')
        .map(|part| -> RfcResult<String> {
            match part.split_once('=') {
                Some((key, until)) if key.trim().eq_ignore_ascii_case("UNTIL") => {
                    let until = parse_date_value(until.trim(), &DateParams::default())?;
                    let local = if until.date_only {
                        end_of_day(until.local)
                    } else {
                        until.local
                    };
                    let instant = DateValue { local, ..until }.resolve(tz).with_timezone(&Utc);
                    Ok(format!("UNTIL={}Z", instant.format(DATE_COMPACT_FORMAT)))
                }
                _ => Ok(part.to_string()),
            }
        })
        .collect::<RfcResult<Vec<_>>>()?
        .join(";");

    normalized
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| RfcError::InvalidRecurrenceRule(err.to_string()))
}

#[derive(Debug, Default)]
struct DateParams {
    zone: Option<chrono_tz::Tz>,
    date_only: bool,
}

fn parse_params<'a>(params: impl Iterator<Item = &'a str>) -> RfcResult<DateParams> {
    let mut parsed = DateParams::default();

    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            return Err(RfcError::InvalidRecurrenceRule(format!(
                "malformed parameter {param:?}"
            )));
        };

        match key.trim().to_ascii_uppercase().as_str() {
            "TZID" => {
                let tzid = value.trim().trim_matches('"');
                let tz = tzid
                    .parse::<chrono_tz::Tz>()
                    .map_err(|_err| RfcError::UnknownTimezone(tzid.to_string()))?;
                parsed.zone = Some(tz);
            }
            "VALUE" => match value.trim().to_ascii_uppercase().as_str() {
                "DATE" => parsed.date_only = true,
                "DATE-TIME" => parsed.date_only = false,
                other => {
                    return Err(RfcError::InvalidRecurrenceRule(format!(
                        "unsupported VALUE type {other}"
                    )));
                }
            },
            _ => {}
        }
    }

    Ok(parsed)
}

fn parse_date_list(value: &str, params: &DateParams) -> RfcResult<Vec<DateValue>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_date_value(item, params))
        .collect()
}

fn parse_date_value(item: &str, params: &DateParams) -> RfcResult<DateValue> {
    let invalid = || RfcError::InvalidRecurrenceRule(format!("invalid date value {item:?}"));

    let (body, utc) = match item.strip_suffix('Z').or_else(|| item.strip_suffix('z')) {
        Some(body) => (body, true),
        None => (item, false),
    };

    let (local, date_only) = if body.len() == 8 {
        let date = NaiveDate::parse_from_str(body, DATE_PART_FORMAT).map_err(|_err| invalid())?;
        (date.and_time(NaiveTime::MIN), true)
    } else {
        if params.date_only {
            return Err(invalid());
        }
        let local = NaiveDateTime::parse_from_str(&body.to_ascii_uppercase(), DATE_COMPACT_FORMAT)
            .map_err(|_err| invalid())?;
        (local, false)
    };

    let zone = match (utc, params.zone) {
        (true, _) => DateZone::Utc,
        (false, Some(tz)) => DateZone::Named(tz),
        (false, None) => DateZone::Floating,
    };

    Ok(DateValue {
        local,
        zone,
        date_only,
    })
}
