//! Event date records the recurrence engine reads and writes.
//!
//! Persistence is owned by the caller: these types carry the row identity
//! (`id`) through reconciliation but never touch storage themselves.

pub mod date_definition;
pub mod event;
pub mod occurrence;

pub use date_definition::DateDefinition;
pub use event::EventDates;
pub use occurrence::{DateOccurrence, OccurrenceKey};

/// Wall-clock value with its IANA zone.
pub type ZonedDateTime = chrono::DateTime<chrono_tz::Tz>;
