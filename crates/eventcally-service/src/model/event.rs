use eventcally_core::clock::Clock;
use eventcally_rfc::rfc::recur::begin_of_day;

use super::{DateDefinition, DateOccurrence};

/// ## Summary
/// The date-related part of an event: its definitions and the occurrences
/// materialized from them.
///
/// Occurrences belong to the event as a whole, not to a single definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDates {
    pub event_id: Option<i64>,
    pub definitions: Vec<DateDefinition>,
    pub occurrences: Vec<DateOccurrence>,
}

impl EventDates {
    #[must_use]
    pub fn new(definitions: Vec<DateDefinition>) -> Self {
        Self {
            event_id: None,
            definitions,
            occurrences: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// True when any definition carries recurrence text.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.definitions.iter().any(DateDefinition::is_recurring)
    }

    /// ## Summary
    /// Occurrences starting today or later, ordered by start.
    ///
    /// "Today" begins at midnight in each occurrence's own zone.
    #[must_use]
    pub fn upcoming(&self, clock: &impl Clock) -> Vec<&DateOccurrence> {
        let now = clock.now();
        let mut upcoming: Vec<_> = self
            .occurrences
            .iter()
            .filter(|occurrence| {
                let today = begin_of_day(now.with_timezone(&occurrence.start.timezone()).naive_local());
                occurrence.start.naive_local() >= today
            })
            .collect();
        upcoming.sort_by_key(|occurrence| occurrence.start);
        upcoming
    }
}
