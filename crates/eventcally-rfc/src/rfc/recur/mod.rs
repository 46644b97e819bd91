//! Recurrence text (`RRULE`, `EXDATE`, `RDATE` lines) and its expansion.
//!
//! The text format is the subset of RFC 5545 the event forms produce: one
//! property per line, an `RRULE` describing the pattern, and optional
//! `EXDATE`/`RDATE` lists. Expansion is delegated to the `rrule` crate.

pub mod core;
pub mod date;
pub mod expand;
pub mod parse;

pub use self::core::{DateValue, DateZone, RecurrenceRule};
pub use date::{CalendarDelta, begin_of_day, end_of_day, localize};
pub use expand::{ExpansionWindow, dates_in_window, to_rrule_tz};
pub use parse::parse_recurrence_rule;
