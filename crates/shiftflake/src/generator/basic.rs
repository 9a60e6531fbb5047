use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    config::{Method, Options},
    error::Result,
    generator::{BaseState, IdEngine, Mutex, Params},
    time::TimeSource,
};

/// A lock-based generator that waits out sequence exhaustion.
///
/// Every call runs its whole read-modify-compose step under one mutex, so a
/// single instance can be shared across threads.
///
/// ## Behavior
/// - Within one millisecond the sequence climbs from `min_seq` to `max_seq`.
/// - Past `max_seq` the caller is held (with the lock taken) until the clock
///   reaches the next millisecond.
/// - ⚠️ If the clock moves backward the generator reports it and follows the
///   clock: the next identifier uses the earlier timestamp and may sort below
///   identifiers already issued. Use [`DriftEngine`] when that matters.
///
/// [`DriftEngine`]: crate::DriftEngine
pub struct BasicEngine<T>
where
    T: TimeSource,
{
    options: Options,
    params: Params,
    state: Mutex<BaseState>,
    time: T,
}

impl<T> BasicEngine<T>
where
    T: TimeSource,
{
    /// Creates a new [`BasicEngine`] after validating `options` against the
    /// current reading of `time`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`].
    ///
    /// # Example
    /// ```
    /// use shiftflake::{BasicEngine, Method, Options, SystemClock};
    ///
    /// let options = Options { method: Method::Basic, ..Options::new(1) };
    /// let engine = BasicEngine::new(options, SystemClock).unwrap();
    ///
    /// let a = engine.next_id();
    /// let b = engine.next_id();
    /// assert!(a < b);
    /// ```
    ///
    /// [`ConfigError`]: crate::ConfigError
    pub fn new(options: Options, time: T) -> Result<Self> {
        options.validate(time.current_millis())?;
        let state = BaseState::new(0, options.min_seq);
        Ok(Self::from_validated(options, state, time))
    }

    /// Creates an engine preloaded with a timestamp slot (milliseconds since
    /// the epoch) and sequence value.
    ///
    /// Useful for resuming from a known point. Prefer [`Self::new`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`]. A negative
    /// `timestamp`, or a `sequence` outside `[min_seq, max_seq + 1]`, is
    /// rejected as well.
    ///
    /// [`ConfigError`]: crate::ConfigError
    pub fn from_components(
        options: Options,
        timestamp: i64,
        sequence: u32,
        time: T,
    ) -> Result<Self> {
        options.validate(time.current_millis())?;
        let state = BaseState::checked(&options, timestamp, sequence)?;
        Ok(Self::from_validated(options, state, time))
    }

    pub(crate) fn from_validated(options: Options, state: BaseState, time: T) -> Self {
        let options = Options {
            method: Method::Basic,
            ..options
        };
        Self {
            params: Params::from_options(&options),
            options,
            state: Mutex::new(state),
            time,
        }
    }

    /// Generates the next identifier, waiting for the next millisecond if
    /// the current one is exhausted.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> i64 {
        let params = &self.params;
        let mut state = self.state.lock();

        let now = params.elapsed(&self.time);
        match now.cmp(&state.timestamp) {
            Ordering::Equal => {
                state.sequence += 1;
                if state.sequence > params.max_seq {
                    let next = params.wait_past(&self.time, state.timestamp);
                    state.roll_to(next, params);
                }
            }
            Ordering::Greater => state.roll_to(now, params),
            Ordering::Less => Self::cold_clock_behind(now, &mut state, params),
        }

        state.compose(params)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: i64, state: &mut BaseState, params: &Params) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            behind_ms = state.timestamp - now,
            "clock moved backward, following it without compensation"
        );
        state.roll_to(now, params);
    }
}

impl<T> IdEngine for BasicEngine<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> i64 {
        self.next_id()
    }

    fn options(&self) -> &Options {
        &self.options
    }
}
