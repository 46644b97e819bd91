//! Time source injected into every computation that needs "now".

use chrono::{DateTime, Utc};

/// ## Summary
/// Provides the current instant.
///
/// Recurrence expansion never reads the system time directly; callers pass a
/// clock so that "today" is evaluated per call and can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    #[must_use]
    pub fn at<Tz: chrono::TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
