//! Time source abstraction.
//!
//! The decision pipeline never calls `Local::now()` directly; it asks a
//! [`TimeSource`] so tests can pin the clock to a chosen instant and move it
//! between daemon ticks.

use chrono::{DateTime, Local};

/// Trait for abstracting the current time.
pub trait TimeSource: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Local>;
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Real-time implementation that uses the system clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a settable instant.
#[cfg(any(test, feature = "testing-support"))]
pub struct FixedTimeSource {
    current: std::sync::Mutex<DateTime<Local>>,
}

#[cfg(any(test, feature = "testing-support"))]
impl FixedTimeSource {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            current: std::sync::Mutex::new(at),
        }
    }

    /// Today's date in the local timezone at `hour:minute`.
    pub fn today_at(hour: u32, minute: u32) -> Self {
        Self::new(local_today_at(hour, minute))
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.current.lock().unwrap() = at;
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap()
    }
}

/// Build a local instant for today at `hour:minute`.
///
/// Falls back to interpreting the wall time as UTC when it does not exist
/// locally (DST gap).
#[cfg(any(test, feature = "testing-support"))]
pub fn local_today_at(hour: u32, minute: u32) -> DateTime<Local> {
    use chrono::TimeZone;

    let naive = Local::now()
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .expect("valid wall clock time");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
