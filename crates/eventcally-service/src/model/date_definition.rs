use chrono::TimeDelta;
use eventcally_core::constants::MAX_EVENT_DURATION_DAYS;
use eventcally_rfc::rfc::recur::{begin_of_day, end_of_day, localize};

use super::ZonedDateTime;
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Template an event's occurrences are generated from.
///
/// `recurrence_rule` holds newline-separated `RRULE`/`EXDATE`/`RDATE` lines;
/// without it the definition yields exactly one occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDefinition {
    pub start: ZonedDateTime,
    pub end: Option<ZonedDateTime>,
    pub allday: bool,
    pub recurrence_rule: Option<String>,
}

impl DateDefinition {
    #[must_use]
    pub const fn new(start: ZonedDateTime) -> Self {
        Self {
            start,
            end: None,
            allday: false,
            recurrence_rule: None,
        }
    }

    #[must_use]
    pub fn with_end(mut self, end: ZonedDateTime) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn all_day(mut self) -> Self {
        self.allday = true;
        self
    }

    #[must_use]
    pub fn with_recurrence_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    /// The recurrence text, if it has any content.
    #[must_use]
    pub fn recurrence_text(&self) -> Option<&str> {
        self.recurrence_rule
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurrence_text().is_some()
    }

    /// ## Summary
    /// Returns the definition with all-day boundaries applied.
    ///
    /// An all-day definition starts at 00:00:00 of its start day and ends at
    /// 23:59:59 of its end day, or of its start day when it has no end. Other
    /// definitions are returned unchanged.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if !self.allday {
            return self.clone();
        }

        let tz = self.start.timezone();
        let start = localize(&tz, begin_of_day(self.start.naive_local()));
        let end = match &self.end {
            Some(end) => localize(&end.timezone(), end_of_day(end.naive_local())),
            None => localize(&tz, end_of_day(self.start.naive_local())),
        };

        Self {
            start,
            end: Some(end),
            allday: true,
            recurrence_rule: self.recurrence_rule.clone(),
        }
    }

    /// ## Summary
    /// Checks the start/end relationship.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if the start lies after the end
    /// or the definition spans more than 180 days.
    pub fn validate(&self) -> ServiceResult<()> {
        let Some(end) = &self.end else {
            return Ok(());
        };

        if self.start > *end {
            return Err(ServiceError::ValidationError(
                "The start must be before the end.".to_string(),
            ));
        }

        if *end > self.start + TimeDelta::days(MAX_EVENT_DURATION_DAYS) {
            return Err(ServiceError::ValidationError(format!(
                "An event can last a maximum of {MAX_EVENT_DURATION_DAYS} days."
            )));
        }

        Ok(())
    }
}
