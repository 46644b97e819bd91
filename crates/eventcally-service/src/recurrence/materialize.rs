//! Expands an event's date definitions into stored occurrences.

use std::collections::HashSet;

use chrono::{Months, NaiveDate, NaiveDateTime, TimeZone};
use eventcally_core::clock::Clock;
use eventcally_core::config::{PastOccurrencePolicy, RecurrenceConfig};
use eventcally_rfc::rfc::recur::{
    CalendarDelta, ExpansionWindow, begin_of_day, dates_in_window, end_of_day, localize,
};

use super::parse_generating_rule;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{DateDefinition, DateOccurrence, EventDates, OccurrenceKey};

/// ## Summary
/// Outcome of reconciling generated occurrences with stored ones.
///
/// `removed` holds the stale occurrences taken out of the event, ids
/// included, so the caller can delete those rows in the same transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub kept: usize,
    pub added: usize,
    pub removed: Vec<DateOccurrence>,
}

impl Reconciliation {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed.is_empty()
    }
}

/// Totals of a [`Materializer::refresh_recurring`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub added: usize,
    pub removed: Vec<DateOccurrence>,
}

/// ## Summary
/// Turns date definitions into the authoritative set of occurrences.
///
/// Recurring definitions are expanded at day granularity inside a forward
/// window of `window_years`; where the window starts depends on the
/// [`PastOccurrencePolicy`]. "Today" is read from the injected clock on
/// every call.
#[derive(Debug, Clone)]
pub struct Materializer<C> {
    clock: C,
    policy: PastOccurrencePolicy,
    window_years: u32,
}

impl<C: Clock> Materializer<C> {
    #[must_use]
    pub fn new(clock: C, config: &RecurrenceConfig) -> Self {
        Self {
            clock,
            policy: config.past_occurrences,
            window_years: config.window_years,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PastOccurrencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// ## Summary
    /// Resynchronizes `event.occurrences` with its definitions.
    ///
    /// Definitions are replaced by their normalized form. Stored occurrences
    /// whose `(start, end, allday)` is still generated are kept as they are,
    /// the rest are removed, and missing ones are appended without an id. The
    /// resulting collection is ordered by start.
    ///
    /// ## Errors
    /// Nothing is modified when an error is returned.
    /// - `ServiceError::InvariantViolation` if the event has no definitions.
    /// - `ServiceError::ValidationError` for an invalid definition.
    /// - `ServiceError::InvalidRecurrenceRule` for malformed recurrence text.
    /// - `ServiceError::EmptyOccurrenceSet` if nothing would remain.
    #[tracing::instrument(skip(self, event), fields(event_id = ?event.event_id))]
    pub fn materialize(&self, event: &mut EventDates) -> ServiceResult<Reconciliation> {
        if event.definitions.is_empty() {
            return Err(ServiceError::InvariantViolation(
                "event has no date definitions",
            ));
        }

        let definitions: Vec<DateDefinition> = event
            .definitions
            .iter()
            .map(DateDefinition::normalized)
            .collect();

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for definition in &definitions {
            definition.validate()?;
            for key in self.expand(definition)? {
                if seen.insert(key) {
                    targets.push(key);
                }
            }
        }

        if targets.is_empty() {
            return Err(ServiceError::EmptyOccurrenceSet);
        }

        let mut pending = seen;
        let mut reconciliation = Reconciliation::default();
        let mut occurrences = Vec::with_capacity(targets.len());

        for occurrence in std::mem::take(&mut event.occurrences) {
            if pending.remove(&occurrence.key()) {
                reconciliation.kept += 1;
                occurrences.push(occurrence);
            } else {
                reconciliation.removed.push(occurrence);
            }
        }

        for key in targets {
            if pending.contains(&key) {
                reconciliation.added += 1;
                occurrences.push(DateOccurrence::from(key));
            }
        }

        occurrences.sort_by_key(|occurrence| (occurrence.start, occurrence.end));
        event.definitions = definitions;
        event.occurrences = occurrences;

        tracing::debug!(
            kept = reconciliation.kept,
            added = reconciliation.added,
            removed = reconciliation.removed.len(),
            "Materialized event occurrences"
        );
        Ok(reconciliation)
    }

    /// ## Summary
    /// Re-materializes every recurring event, e.g. from a nightly job, so the
    /// forward window keeps moving.
    ///
    /// Events without recurrence text are skipped. An event that fails is
    /// logged, counted and left as it was; the run continues.
    #[tracing::instrument(skip_all)]
    pub fn refresh_recurring<'a, I>(&self, events: I) -> RefreshSummary
    where
        I: IntoIterator<Item = &'a mut EventDates>,
    {
        let mut summary = RefreshSummary::default();

        for event in events {
            if !event.is_recurring() {
                summary.skipped += 1;
                continue;
            }

            match self.materialize(event) {
                Ok(reconciliation) => {
                    summary.refreshed += 1;
                    summary.added += reconciliation.added;
                    summary.removed.extend(reconciliation.removed);
                }
                Err(err) => {
                    tracing::warn!(
                        event_id = ?event.event_id,
                        error = %err,
                        "Failed to refresh recurring event dates"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            refreshed = summary.refreshed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Recurring event dates refreshed"
        );
        summary
    }

    /// ## Summary
    /// Generates the occurrence keys of one normalized definition.
    ///
    /// Each recurrence day receives the definition's time of day in the
    /// definition's zone; the end is the start shifted by the definition's
    /// calendar delta.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidRecurrenceRule` for malformed recurrence
    /// text and `ServiceError::ValidationError` if a date cannot be
    /// represented.
    pub fn expand(&self, definition: &DateDefinition) -> ServiceResult<Vec<OccurrenceKey>> {
        let tz = definition.start.timezone();
        let local_start = definition.start.naive_local();

        let delta = definition
            .end
            .map(|end| {
                CalendarDelta::between(local_start, end.with_timezone(&tz).naive_local())
                    .ok_or_else(|| {
                        ServiceError::ValidationError(
                            "The start must be before the end.".to_string(),
                        )
                    })
            })
            .transpose()?;

        let days = match definition.recurrence_text() {
            Some(text) => self.recurrence_days(local_start, &tz, text)?,
            None => vec![local_start.date()],
        };

        days.into_iter()
            .map(|day| -> ServiceResult<OccurrenceKey> {
                let occurrence_start = day.and_time(local_start.time());
                let end = delta
                    .map(|delta| {
                        delta
                            .apply(occurrence_start)
                            .map(|local_end| localize(&tz, local_end))
                            .ok_or_else(|| {
                                ServiceError::ValidationError(format!(
                                    "occurrence end after {occurrence_start} is out of range"
                                ))
                            })
                    })
                    .transpose()?;

                Ok(OccurrenceKey {
                    start: localize(&tz, occurrence_start),
                    end,
                    allday: definition.allday,
                })
            })
            .collect()
    }

    /// Calendar days produced by `text`, anchored at midnight of the start day.
    fn recurrence_days(
        &self,
        local_start: NaiveDateTime,
        tz: &chrono_tz::Tz,
        text: &str,
    ) -> ServiceResult<Vec<NaiveDate>> {
        let rule = parse_generating_rule(text)?.into_day_granular(tz);

        // Floating midnight: UTC has no DST, so every date stays on 00:00.
        let floating = |local: NaiveDateTime| chrono_tz::UTC.from_utc_datetime(&local);

        let anchor = floating(begin_of_day(local_start));
        let rrule_set = rule.build(&anchor)?;

        let window_start = match self.policy {
            PastOccurrencePolicy::Keep => begin_of_day(local_start),
            PastOccurrencePolicy::Prune => {
                let today = begin_of_day(self.clock.now().with_timezone(tz).naive_local());
                today.max(begin_of_day(local_start))
            }
        };
        let window_end = window_start
            .checked_add_months(Months::new(self.window_years.saturating_mul(12)))
            .map(end_of_day)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "expansion window after {window_start} is out of range"
                ))
            })?;

        let window = ExpansionWindow {
            from: floating(window_start),
            until: floating(window_end),
        };
        let days: Vec<NaiveDate> = dates_in_window(&rrule_set, &window)
            .into_iter()
            .map(|date| date.date_naive())
            .collect();

        tracing::trace!(
            rule = %text,
            policy = ?self.policy,
            %window_start,
            %window_end,
            count = days.len(),
            "Expanded recurrence days"
        );
        Ok(days)
    }
}
