use super::ZonedDateTime;

/// Identity used to match generated occurrences against stored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OccurrenceKey {
    pub start: ZonedDateTime,
    pub end: Option<ZonedDateTime>,
    pub allday: bool,
}

/// ## Summary
/// A materialized occurrence of an event.
///
/// `id` is `None` until the persistence layer stores the row. Two
/// occurrences describe the same date when their [`OccurrenceKey`]s are
/// equal; the id is not part of that comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOccurrence {
    pub id: Option<i64>,
    pub start: ZonedDateTime,
    pub end: Option<ZonedDateTime>,
    pub allday: bool,
}

impl DateOccurrence {
    #[must_use]
    pub const fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            start: self.start,
            end: self.end,
            allday: self.allday,
        }
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl From<OccurrenceKey> for DateOccurrence {
    fn from(key: OccurrenceKey) -> Self {
        Self {
            id: None,
            start: key.start,
            end: key.end,
            allday: key.allday,
        }
    }
}
