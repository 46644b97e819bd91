//! The recurrence engine: materializing occurrences for storage and paging
//! through a rule for display.

use eventcally_rfc::rfc::recur::{RecurrenceRule, parse_recurrence_rule};

use crate::error::{ServiceError, ServiceResult};

pub mod batch;
pub mod materialize;

pub use batch::{BatchInfo, BatchOccurrence, BatchResult, OccurrenceType, calculate_batch};
pub use materialize::{Materializer, Reconciliation, RefreshSummary};

/// Parses recurrence text that must generate dates on its own.
///
/// ## Errors
/// Returns `ServiceError::InvalidRecurrenceRule` for malformed text or a rule
/// with neither `RRULE` nor `RDATE`.
pub(crate) fn parse_generating_rule(rrule_str: &str) -> ServiceResult<RecurrenceRule> {
    let rule = parse_recurrence_rule(rrule_str)?;
    if rule.is_empty() {
        return Err(ServiceError::InvalidRecurrenceRule(
            "recurrence rule has neither RRULE nor RDATE".to_string(),
        ));
    }
    Ok(rule)
}
