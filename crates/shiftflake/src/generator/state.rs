use crate::{
    config::Options,
    error::{ConfigError, Result},
    layout::Layout,
    time::TimeSource,
};

/// Frozen parameters shared by every strategy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Params {
    pub(crate) epoch: i64,
    pub(crate) worker_id: u32,
    pub(crate) min_seq: u32,
    pub(crate) max_seq: u32,
    pub(crate) layout: Layout,
}

impl Params {
    pub(crate) const fn from_options(options: &Options) -> Self {
        Self {
            epoch: options.epoch,
            worker_id: options.worker_id,
            min_seq: options.min_seq,
            max_seq: options.max_seq,
            layout: options.layout(),
        }
    }

    /// Milliseconds elapsed since the epoch according to `time`.
    pub(crate) fn elapsed<T: TimeSource>(&self, time: &T) -> i64 {
        time.current_millis() - self.epoch
    }

    /// Blocks until the clock reads strictly past `timestamp` and returns
    /// the new reading. Polls at one millisecond granularity.
    pub(crate) fn wait_past<T: TimeSource>(&self, time: &T, timestamp: i64) -> i64 {
        let mut now = self.elapsed(time);
        while now <= timestamp {
            time.sleep_millis(1);
            now = self.elapsed(time);
        }
        now
    }

    pub(crate) const fn compose(&self, timestamp: i64, low: u32) -> i64 {
        self.layout.compose(timestamp, self.worker_id, low)
    }
}

/// The timestamp slot and sequence counter every strategy advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BaseState {
    pub(crate) timestamp: i64,
    pub(crate) sequence: u32,
}

impl BaseState {
    pub(crate) const fn new(timestamp: i64, sequence: u32) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }

    /// State for a generator resuming at `timestamp` with `sequence` as the
    /// last value handed out.
    ///
    /// The sequence may not sit in the reserved range below `min_seq`, and
    /// may exceed the largest value issued per millisecond by at most one
    /// (an exhausted slot).
    pub(crate) fn checked(options: &Options, timestamp: i64, sequence: u32) -> Result<Self> {
        if timestamp < 0 {
            return Err(ConfigError::Timestamp { value: timestamp });
        }
        let max = options.max_seq.max(options.min_seq) + 1;
        if sequence < options.min_seq || sequence > max {
            return Err(ConfigError::Sequence {
                value: sequence,
                min: options.min_seq,
                max,
            });
        }
        Ok(Self::new(timestamp, sequence))
    }

    /// Moves to `timestamp` and restarts the sequence.
    pub(crate) const fn roll_to(&mut self, timestamp: i64, params: &Params) {
        self.timestamp = timestamp;
        self.sequence = params.min_seq;
    }

    /// Identifier for the current slot and sequence.
    pub(crate) const fn compose(&self, params: &Params) -> i64 {
        params.compose(self.timestamp, self.sequence)
    }
}
