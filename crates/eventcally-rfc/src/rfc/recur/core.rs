use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::date::{begin_of_day, localize};

/// Zone a recurrence date value was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateZone {
    /// No zone marker; interpreted in the anchor's zone.
    Floating,
    /// Trailing `Z`.
    Utc,
    /// `TZID=` parameter.
    Named(chrono_tz::Tz),
}

/// A single `EXDATE`/`RDATE` value as written in the rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    pub local: NaiveDateTime,
    pub zone: DateZone,
    /// `VALUE=DATE` or an 8-digit value without a time part.
    pub date_only: bool,
}

impl DateValue {
    #[must_use]
    pub const fn floating(local: NaiveDateTime) -> Self {
        Self {
            local,
            zone: DateZone::Floating,
            date_only: false,
        }
    }

    /// ## Summary
    /// Resolves the value to an instant expressed in `anchor_tz`.
    #[must_use]
    pub fn resolve(&self, anchor_tz: &chrono_tz::Tz) -> DateTime<chrono_tz::Tz> {
        match self.zone {
            DateZone::Floating => localize(anchor_tz, self.local),
            DateZone::Utc => Utc.from_utc_datetime(&self.local).with_timezone(anchor_tz),
            DateZone::Named(tz) => localize(&tz, self.local).with_timezone(anchor_tz),
        }
    }

    /// Floating midnight of the calendar day this value falls on in `tz`.
    #[must_use]
    pub fn day_in(&self, tz: &chrono_tz::Tz) -> Self {
        Self {
            local: begin_of_day(self.resolve(tz).naive_local()),
            zone: DateZone::Floating,
            date_only: true,
        }
    }
}

/// ## Summary
/// Parsed recurrence text: the repeating patterns plus explicit exclusions
/// and additions.
///
/// `RRULE` values are kept as text because their `UNTIL` can only be put
/// into the anchor's zone once [`RecurrenceRule::build`] binds a `DTSTART`.
/// Each value has already been checked by the `rrule` parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub rrules: Vec<String>,
    pub exdates: Vec<DateValue>,
    pub rdates: Vec<DateValue>,
}

impl RecurrenceRule {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rrules.is_empty() && self.rdates.is_empty()
    }

    /// ## Summary
    /// Reduces every `EXDATE`/`RDATE` to the calendar day it falls on in `tz`.
    ///
    /// Materialization expands rules anchored at midnight, so only the day of
    /// an exclusion or addition can match. `Z` and `TZID` values are moved
    /// into `tz` before the day is taken.
    #[must_use]
    pub fn into_day_granular(self, tz: &chrono_tz::Tz) -> Self {
        let days = |values: Vec<DateValue>| -> Vec<DateValue> {
            values.iter().map(|value| value.day_in(tz)).collect()
        };
        Self {
            rrules: self.rrules,
            exdates: days(self.exdates),
            rdates: days(self.rdates),
        }
    }
}
