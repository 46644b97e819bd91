//! Binding a [`RecurrenceRule`] to an anchor and walking the result.

use chrono::{DateTime, TimeZone};
use eventcally_core::constants::MAX_EXPANDED_OCCURRENCES;
use rrule::RRuleSet;

use super::core::RecurrenceRule;
use super::parse::parse_rrule;
use crate::error::{RfcError, RfcResult};

/// Converts a zoned value into the zone type the `rrule` crate iterates in.
#[must_use]
pub fn to_rrule_tz<Tz: TimeZone>(value: &DateTime<Tz>, tz: chrono_tz::Tz) -> DateTime<rrule::Tz> {
    value.with_timezone(&rrule::Tz::Tz(tz))
}

impl RecurrenceRule {
    /// ## Summary
    /// Builds an `RRuleSet` with `DTSTART` set to `anchor`.
    ///
    /// Floating `EXDATE`/`RDATE` values are read in the anchor's zone.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidRecurrenceRule` if the `rrule` crate rejects a
    /// pattern for this anchor, such as an out-of-range `BYMONTHDAY`.
    pub fn build(&self, anchor: &DateTime<chrono_tz::Tz>) -> RfcResult<RRuleSet> {
        let anchor_tz = anchor.timezone();
        let dt_start = to_rrule_tz(anchor, anchor_tz);

        let mut rrule_set = RRuleSet::new(dt_start);
        for text in &self.rrules {
            let rrule = parse_rrule(text, &anchor_tz)?;
            let validated = rrule
                .validate(dt_start)
                .map_err(|err| RfcError::InvalidRecurrenceRule(err.to_string()))?;
            rrule_set = rrule_set.rrule(validated);
        }

        if !self.exdates.is_empty() {
            let exdates = self
                .exdates
                .iter()
                .map(|value| to_rrule_tz(&value.resolve(&anchor_tz), anchor_tz))
                .collect();
            rrule_set = rrule_set.set_exdates(exdates);
        }

        if !self.rdates.is_empty() {
            let rdates = self
                .rdates
                .iter()
                .map(|value| to_rrule_tz(&value.resolve(&anchor_tz), anchor_tz))
                .collect();
            rrule_set = rrule_set.set_rdates(rdates);
        }

        Ok(rrule_set)
    }
}

/// Inclusive range of instants an expansion is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionWindow {
    pub from: DateTime<chrono_tz::Tz>,
    pub until: DateTime<chrono_tz::Tz>,
}

impl ExpansionWindow {
    #[must_use]
    pub fn contains(&self, value: &DateTime<chrono_tz::Tz>) -> bool {
        *value >= self.from && *value <= self.until
    }
}

/// ## Summary
/// Collects the dates of `rrule_set` that fall inside `window`.
///
/// Iteration stops at the first date after the window, so unbounded rules
/// terminate. At most `MAX_EXPANDED_OCCURRENCES` dates are returned.
#[must_use]
pub fn dates_in_window(
    rrule_set: &RRuleSet,
    window: &ExpansionWindow,
) -> Vec<DateTime<chrono_tz::Tz>> {
    let tz = window.from.timezone();
    let from = to_rrule_tz(&window.from, tz);
    let until = to_rrule_tz(&window.until, tz);

    let dates: Vec<_> = rrule_set
        .into_iter()
        .skip_while(|date| *date < from)
        .take_while(|date| *date <= until)
        .take(MAX_EXPANDED_OCCURRENCES)
        .map(|date| date.with_timezone(&tz))
        .collect();

    if dates.len() == MAX_EXPANDED_OCCURRENCES {
        tracing::warn!(
            limit = MAX_EXPANDED_OCCURRENCES,
            "Recurrence expansion truncated at the occurrence limit"
        );
    }
    tracing::trace!(count = dates.len(), from = %window.from, until = %window.until, "Expanded window");
    dates
}
