use std::{
    sync::Arc,
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// A source of wall-clock time in Unix milliseconds.
///
/// Generators subtract their configured epoch from this value, so
/// implementations report absolute time rather than an offset. Tests plug in
/// scripted clocks to reproduce rollbacks and request storms.
///
/// # Example
///
/// ```
/// use shiftflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_723_132_800_042
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_723_132_800_042);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> i64;

    /// Parks the caller for roughly `millis` milliseconds.
    ///
    /// Used by the blocking wait for the next millisecond. Scripted clocks
    /// override this to advance themselves instead of sleeping.
    fn sleep_millis(&self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn sleep_millis(&self, millis: u64) {
        (**self).sleep_millis(millis);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn sleep_millis(&self, millis: u64) {
        (**self).sleep_millis(millis);
    }
}

/// The operating system's wall clock.
///
/// Unlike a monotonic timer this clock follows NTP corrections and manual
/// adjustments, so it can move backward. The drift engine compensates for
/// that; the basic engine only reports it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            // The host clock sits before 1970; report it as negative time.
            Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
        }
    }
}

/// Converts Unix milliseconds into a [`SystemTime`].
pub fn system_time_from_millis(millis: i64) -> SystemTime {
    let magnitude = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        UNIX_EPOCH + magnitude
    } else {
        UNIX_EPOCH - magnitude
    }
}
