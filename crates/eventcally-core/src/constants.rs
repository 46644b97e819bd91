/// Zone used for naive request anchors when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Display template the rrule widget expects, quotes included.
pub const DEFAULT_DATE_FORMAT: &str = "\"%d.%m.%Y\"";

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Forward window for materialized occurrences.
pub const DEFAULT_WINDOW_YEARS: u32 = 1;

/// Batches shown before and after the current one.
pub const BATCH_DELTA: usize = 3;

/// Longest span a single date definition may cover.
pub const MAX_EVENT_DURATION_DAYS: i64 = 180;

/// Machine-readable occurrence format (`20300101T000000`).
pub const DATE_COMPACT_FORMAT: &str = const_str::concat!(DATE_PART_FORMAT, "T", TIME_PART_FORMAT);
pub const DATE_PART_FORMAT: &str = "%Y%m%d";
pub const TIME_PART_FORMAT: &str = "%H%M%S";

/// Hard cap on dates produced by a single windowed expansion.
pub const MAX_EXPANDED_OCCURRENCES: usize = 10_000;
