//! Paging through a (possibly unbounded) recurrence for display.
//!
//! Every considered date, generated or excluded, takes one index. Exclusions
//! therefore shift later dates the same way on every page, and a page can be
//! computed without materializing the ones before it.

use std::collections::{HashSet, VecDeque};

use chrono::format::{Item, StrftimeItems};
use eventcally_core::constants::{BATCH_DELTA, DATE_COMPACT_FORMAT, MAX_EXPANDED_OCCURRENCES};
use eventcally_rfc::rfc::recur::DateValue;
use serde::Serialize;

use super::parse_generating_rule;
use crate::error::{ServiceError, ServiceResult};
use crate::model::ZonedDateTime;

/// Why a date appears in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceType {
    /// The anchor itself.
    Start,
    /// Generated by an `RRULE`.
    Rrule,
    /// Listed in an `RDATE`.
    Rdate,
    /// Listed in an `EXDATE`; shown in place but not an occurrence.
    Exdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOccurrence {
    /// `YYYYMMDDTHHMMSS` in the anchor's zone.
    pub date: String,
    #[serde(rename = "formattedDate")]
    pub formatted_date: String,
    #[serde(rename = "type")]
    pub kind: OccurrenceType,
}

/// Pagination metadata of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchInfo {
    /// Batch-aligned index of the first entry.
    pub start: usize,
    /// Number of indices known, counted up to a cap for unbounded rules.
    pub end: usize,
    pub batch_size: usize,
    /// 1-based `(first, last)` index ranges of the navigable batches.
    pub batches: Vec<(usize, usize)>,
    /// Position of this batch in `batches`.
    #[serde(rename = "currentBatch")]
    pub current_batch: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub occurrences: Vec<BatchOccurrence>,
    pub batch: BatchInfo,
}

/// Renders dates with a pre-validated strftime template.
struct DateFormatter<'a> {
    items: Vec<Item<'a>>,
}

impl<'a> DateFormatter<'a> {
    fn new(date_format: &'a str) -> ServiceResult<Self> {
        let items: Vec<Item<'a>> = StrftimeItems::new(date_format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(ServiceError::InvalidDateFormat(date_format.to_string()));
        }
        Ok(Self { items })
    }

    fn entry(&self, date: &ZonedDateTime, kind: OccurrenceType) -> BatchOccurrence {
        BatchOccurrence {
            date: date.format(DATE_COMPACT_FORMAT).to_string(),
            formatted_date: date.format_with_items(self.items.iter()).to_string(),
            kind,
        }
    }
}

/// ## Summary
/// Computes the page of `rrule_str`'s dates that contains index `start`.
///
/// `start` is snapped down to a multiple of `batch_size`. The page holds up
/// to `batch_size` entries: dates generated from the rule (tagged `start`,
/// `rrule` or `rdate`) and `EXDATE` markers in chronological position.
/// `EXDATE`s after the rule's last date are appended on the last page.
/// Requests past the last page are answered with the last page. `start` is
/// clamped to `MAX_EXPANDED_OCCURRENCES`, which bounds the walk for
/// unbounded rules.
///
/// ## Errors
/// - `ServiceError::InvalidRecurrenceRule` for malformed text or a rule with
///   neither `RRULE` nor `RDATE`.
/// - `ServiceError::InvalidDateFormat` if `date_format` is not a valid
///   strftime template.
/// - `ServiceError::ValidationError` for a zero `batch_size` or one above
///   `MAX_EXPANDED_OCCURRENCES`.
#[tracing::instrument(skip(date_format))]
pub fn calculate_batch(
    start_date: &ZonedDateTime,
    date_format: &str,
    rrule_str: &str,
    start: usize,
    batch_size: usize,
) -> ServiceResult<BatchResult> {
    let start = clamped_start(start, batch_size)?;

    let formatter = DateFormatter::new(date_format)?;
    let rule = parse_generating_rule(rrule_str)?;

    let tz = start_date.timezone();
    let rdates: HashSet<ZonedDateTime> =
        rule.rdates.iter().map(|value| value.resolve(&tz)).collect();
    let mut exdates = sorted_exdates(&rule.exdates, &tz);

    let rrule_set = rule.build(start_date)?;
    let mut dates = (&rrule_set).into_iter().map(|date| date.with_timezone(&tz));

    let current_batch = start / batch_size;
    let window_start = current_batch * batch_size;
    let window_end = window_start.saturating_add(batch_size);
    let in_window = |index: usize| (window_start..window_end).contains(&index);

    let classify = |date: &ZonedDateTime| {
        if rdates.contains(date) {
            OccurrenceType::Rdate
        } else if date == start_date {
            OccurrenceType::Start
        } else {
            OccurrenceType::Rrule
        }
    };

    let mut index = 0;
    let mut occurrences = Vec::new();
    // Date taken from the iterator when the window filled up.
    let mut overflow = None;

    'walk: for date in dates.by_ref() {
        while exdates.front().is_some_and(|exdate| *exdate <= date) {
            if index >= window_end {
                overflow = Some(date);
                break 'walk;
            }
            if let Some(exdate) = exdates.pop_front() {
                if in_window(index) {
                    occurrences.push(formatter.entry(&exdate, OccurrenceType::Exdate));
                }
                index += 1;
            }
        }

        if index >= window_end {
            overflow = Some(date);
            break;
        }
        if in_window(index) {
            occurrences.push(formatter.entry(&date, classify(&date)));
        }
        index += 1;
    }

    let total = if let Some(date) = overflow {
        let cap = batch_size
            .saturating_mul((2 * BATCH_DELTA).max(current_batch.saturating_add(BATCH_DELTA)))
            .saturating_sub(window_start);
        let remaining = count_remaining(std::iter::once(date).chain(dates), exdates, cap);
        window_end.saturating_add(remaining)
    } else {
        // The rule ended inside this window.
        for exdate in exdates.drain(..) {
            if in_window(index) {
                occurrences.push(formatter.entry(&exdate, OccurrenceType::Exdate));
            }
            index += 1;
        }
        index
    };

    let max_batch = total.saturating_sub(1) / batch_size;
    if current_batch > max_batch {
        tracing::debug!(current_batch, max_batch, "Requested batch past the end");
        let last_start = max_batch * batch_size;
        return calculate_batch(start_date, date_format, rrule_str, last_start, batch_size);
    }

    let (batches, position) = navigation(current_batch, max_batch, batch_size);

    tracing::debug!(
        occurrences = occurrences.len(),
        total,
        current_batch,
        "Calculated occurrence batch"
    );

    Ok(BatchResult {
        occurrences,
        batch: BatchInfo {
            start: window_start,
            end: total,
            batch_size,
            batches,
            current_batch: position,
        },
    })
}

/// Checks `batch_size` and limits `start` to `MAX_EXPANDED_OCCURRENCES`.
fn clamped_start(start: usize, batch_size: usize) -> ServiceResult<usize> {
    if batch_size == 0 {
        return Err(ServiceError::ValidationError(
            "batch size must be positive".to_string(),
        ));
    }
    if batch_size > MAX_EXPANDED_OCCURRENCES {
        return Err(ServiceError::ValidationError(format!(
            "batch size must not exceed {MAX_EXPANDED_OCCURRENCES}"
        )));
    }
    if start > MAX_EXPANDED_OCCURRENCES {
        tracing::debug!(start, "Clamping start index");
    }
    Ok(start.min(MAX_EXPANDED_OCCURRENCES))
}

fn sorted_exdates(values: &[DateValue], tz: &chrono_tz::Tz) -> VecDeque<ZonedDateTime> {
    let mut exdates: Vec<ZonedDateTime> = values.iter().map(|value| value.resolve(tz)).collect();
    exdates.sort();
    exdates.dedup();
    VecDeque::from(exdates)
}

/// Batches around `current_batch` (up to `BATCH_DELTA` each side, at least
/// `2 * BATCH_DELTA + 1` when available) and the position of `current_batch`
/// among them.
fn navigation(
    current_batch: usize,
    max_batch: usize,
    batch_size: usize,
) -> (Vec<(usize, usize)>, usize) {
    let mut first_batch = current_batch.saturating_sub(BATCH_DELTA);
    let mut last_batch = (2 * BATCH_DELTA).max(current_batch + BATCH_DELTA);
    if last_batch > max_batch {
        last_batch = max_batch;
        first_batch = max_batch.saturating_sub(2 * BATCH_DELTA);
    }

    let batches = (first_batch..=last_batch)
        .map(|batch| (batch * batch_size + 1, (batch + 1) * batch_size))
        .collect();
    (batches, current_batch - first_batch)
}

/// Counts further indices (dates plus interleaved exclusions), stopping at `cap`.
fn count_remaining(
    dates: impl Iterator<Item = ZonedDateTime>,
    mut exdates: VecDeque<ZonedDateTime>,
    cap: usize,
) -> usize {
    let mut counted = 0;

    for date in dates {
        while exdates.front().is_some_and(|exdate| *exdate <= date) {
            if counted >= cap {
                return counted;
            }
            exdates.pop_front();
            counted += 1;
        }
        if counted >= cap {
            return counted;
        }
        counted += 1;
    }

    (counted + exdates.len()).min(cap)
}
