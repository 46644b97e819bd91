//! Day-boundary snapping, zone localization and calendar-aware deltas.

use chrono::{
    DateTime, Datelike, LocalResult, Months, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// 00:00:00 on the same calendar day.
#[must_use]
pub fn begin_of_day(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

/// 23:59:59 on the same calendar day.
#[must_use]
pub fn end_of_day(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(END_OF_DAY)
}

/// ## Summary
/// Attaches `tz` to a wall-clock value.
///
/// Ambiguous values (DST fold) resolve to the earlier instant. Values inside a
/// DST gap are moved forward by the width of a typical gap; if that still
/// does not exist the value is read as UTC.
#[must_use]
pub fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(value) | LocalResult::Ambiguous(value, _) => value,
        LocalResult::None => {
            tracing::trace!(%local, "Local time falls into a DST gap");
            tz.from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&local))
        }
    }
}

/// ## Summary
/// Wall-clock difference between two values split into whole months and a
/// remainder.
///
/// Adding the delta to another start first advances by the months (clamping
/// to the end of shorter months) and then by the remainder, so an event from
/// the 31st to the 2nd of the next month keeps spanning the month boundary
/// wherever it is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDelta {
    pub months: u32,
    pub remainder: TimeDelta,
}

impl CalendarDelta {
    /// Returns `None` when `end` lies before `start`.
    #[must_use]
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if end < start {
            return None;
        }

        let span = (i64::from(end.year()) - i64::from(start.year())) * 12
            + i64::from(end.month())
            - i64::from(start.month());
        let mut months = u32::try_from(span.max(0)).ok()?;

        let shifted = loop {
            let candidate = start.checked_add_months(Months::new(months))?;
            if candidate <= end || months == 0 {
                break candidate;
            }
            months -= 1;
        };

        Some(Self {
            months,
            remainder: end - shifted,
        })
    }

    /// Returns `None` when the result is out of chrono's range.
    #[must_use]
    pub fn apply(&self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        start
            .checked_add_months(Months::new(self.months))?
            .checked_add_signed(self.remainder)
    }
}
