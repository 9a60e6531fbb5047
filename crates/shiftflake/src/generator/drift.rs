#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    config::{Method, Options},
    error::Result,
    generator::{BaseState, IdEngine, Mutex, Params},
    layout::{ROLLBACK_INDEX_MAX, ROLLBACK_INDEX_MIN},
    time::TimeSource,
};

/// State of a [`DriftEngine`]: the shared slot/sequence block plus the
/// drift and rollback bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DriftState {
    base: BaseState,
    /// Running ahead of the wall clock ("over-cost" mode).
    drifting: bool,
    /// Slots advanced since drifting started.
    drift_count: u32,
    /// Next slot replayed while the clock is behind, counting down. `None`
    /// when no rollback episode is active.
    rollback_baseline: Option<i64>,
    /// Marker of the current or last rollback episode, cycling `1..=4`.
    rollback_index: u8,
}

impl DriftState {
    /// Identifier for the current slot; advances the sequence afterwards.
    fn emit(&mut self, params: &Params) -> i64 {
        let id = self.base.compose(params);
        self.base.sequence += 1;
        id
    }

    /// Identifier for `slot` carrying the rollback marker; the next replay
    /// uses the millisecond before it.
    fn emit_rollback(&mut self, slot: i64, params: &Params) -> i64 {
        let id = params.compose(slot, u32::from(self.rollback_index));
        self.rollback_baseline = Some(slot - 1);
        id
    }

    const fn next_rollback_index(&self) -> u8 {
        if self.rollback_index >= ROLLBACK_INDEX_MAX {
            ROLLBACK_INDEX_MIN
        } else {
            self.rollback_index + 1
        }
    }

    const fn settle(&mut self) {
        self.drifting = false;
        self.drift_count = 0;
    }
}

/// A lock-based generator that never waits on a busy millisecond and never
/// reissues an identifier when the clock moves backward.
///
/// ## Behavior
/// - **Drift**: when a millisecond's sequence space runs out, the timestamp
///   slot moves one step ahead of the wall clock instead of waiting. Up to
///   `max_drift_steps` steps are taken before the engine falls back to
///   waiting for the clock to pass the drifted slot.
/// - **Rollback**: while the clock reads earlier than the last slot used,
///   identifiers are built from a frozen slot that counts down one
///   millisecond per call, with the low field set to a rollback marker
///   (`1..=4`) instead of a sequence number. Regular identifiers never use
///   those values, so the two can not collide. Each new episode moves to the
///   next marker, wrapping after 4. Once the countdown reaches slot `0`
///   the engine waits for the clock to pass the last slot used.
///
/// The whole transition runs under one mutex, including the rare fallback
/// wait.
///
/// ## See Also
/// - [`BasicEngine`]
///
/// [`BasicEngine`]: crate::BasicEngine
pub struct DriftEngine<T>
where
    T: TimeSource,
{
    options: Options,
    params: Params,
    max_drift_steps: u32,
    state: Mutex<DriftState>,
    time: T,
}

impl<T> DriftEngine<T>
where
    T: TimeSource,
{
    /// Creates a new [`DriftEngine`] after validating `options` against the
    /// current reading of `time`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`].
    ///
    /// # Example
    /// ```
    /// use shiftflake::{DriftEngine, Options, SystemClock};
    ///
    /// let engine = DriftEngine::new(Options::new(1), SystemClock).unwrap();
    ///
    /// let ids: Vec<i64> = (0..1000).map(|_| engine.next_id()).collect();
    /// assert!(ids.windows(2).all(|w| w[0] != w[1]));
    /// ```
    ///
    /// [`ConfigError`]: crate::ConfigError
    pub fn new(options: Options, time: T) -> Result<Self> {
        options.validate(time.current_millis())?;
        let state = BaseState::new(0, options.min_seq);
        Ok(Self::from_validated(options, state, time))
    }

    /// Creates an engine preloaded with a timestamp slot (milliseconds since
    /// the epoch) and sequence value. The engine starts in normal mode with
    /// no rollback episode recorded.
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

    pub(crate) fn from_validated(options: Options, base: BaseState, time: T) -> Self {
        let options = Options {
            method: Method::Drift,
            ..options
        };
        Self {
            params: Params::from_options(&options),
            max_drift_steps: options.max_drift_steps,
            options,
            state: Mutex::new(DriftState {
                base,
                drifting: false,
                drift_count: 0,
                rollback_baseline: None,
                rollback_index: 0,
            }),
            time,
        }
    }

    /// Generates the next identifier.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> i64 {
        let mut state = self.state.lock();
        if state.drifting {
            self.next_over_cost_id(&mut state)
        } else {
            self.next_normal_id(&mut state)
        }
    }

    fn next_normal_id(&self, state: &mut DriftState) -> i64 {
        let params = &self.params;
        let now = params.elapsed(&self.time);
        let current = state.base.timestamp;

        if now < current {
            return self.cold_clock_behind(now, state);
        }

        // The clock has caught up with the slot it fell behind.
        if state.rollback_baseline.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                rollback_index = state.rollback_index,
                "clock caught up, rollback episode over"
            );
        }

        if now > current {
            state.base.roll_to(now, params);
            return state.emit(params);
        }

        if state.base.sequence > params.max_seq {
            state.base.roll_to(current + 1, params);
            state.drifting = true;
            state.drift_count = 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                timestamp = state.base.timestamp,
                "sequence exhausted, drifting ahead of the clock"
            );
        }

        state.emit(params)
    }

    fn next_over_cost_id(&self, state: &mut DriftState) -> i64 {
        let params = &self.params;
        let now = params.elapsed(&self.time);

        if now > state.base.timestamp {
            state.base.roll_to(now, params);
            state.settle();
            #[cfg(feature = "tracing")]
            tracing::debug!(timestamp = now, "clock passed drifted slot, drift over");
            return state.emit(params);
        }

        if state.drift_count >= self.max_drift_steps {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                drift_count = state.drift_count,
                "drift bound reached, waiting for the clock"
            );
            let next = params.wait_past(&self.time, state.base.timestamp);
            state.base.roll_to(next, params);
            state.settle();
            return state.emit(params);
        }

        if state.base.sequence > params.max_seq {
            state.base.roll_to(state.base.timestamp + 1, params);
            state.drift_count += 1;
        }

        state.emit(params)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, _now: i64, state: &mut DriftState) -> i64 {
        let params = &self.params;
        let current = state.base.timestamp;

        if state.rollback_baseline.is_none() && current > 0 {
            state.rollback_baseline = Some(current - 1);
            state.rollback_index = state.next_rollback_index();
            #[cfg(feature = "tracing")]
            tracing::warn!(
                behind_ms = current - _now,
                rollback_index = state.rollback_index,
                "clock moved backward, issuing rollback identifiers"
            );
        }

        match state.rollback_baseline {
            Some(slot) if slot >= 0 => state.emit_rollback(slot, params),
            // No slot left below the epoch.
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    timestamp = current,
                    "no rollback slot left, waiting for the clock"
                );
                let next = params.wait_past(&self.time, current);
                state.rollback_baseline = None;
                state.base.roll_to(next, params);
                state.emit(params)
            }
        }
    }
}

impl<T> IdEngine for DriftEngine<T>
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
