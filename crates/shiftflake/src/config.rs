use crate::{
    error::{ConfigError, Result},
    layout::{
        Layout, MAX_DRIFT_STEPS, MAX_LAYOUT_BITS, MAX_SEQ_BITS, MAX_WORKER_BITS, MIN_EPOCH,
        MIN_SEQ_BITS, MIN_SEQUENCE_FLOOR, MIN_WORKER_BITS,
    },
};

/// Epoch used by [`Options::new`]: Friday, August 9, 2024 00:00:00 UTC.
pub const DEFAULT_EPOCH: i64 = 1_723_132_800_000;

/// Which generation strategy backs an [`IdGenerator`].
///
/// [`IdGenerator`]: crate::IdGenerator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Waits for the next millisecond when the sequence space runs out and
    /// does not compensate for a clock that moves backward.
    Basic,
    /// Runs ahead of the wall clock instead of waiting, and issues rollback
    /// markers while the clock is behind.
    #[default]
    Drift,
}

impl Method {
    /// Maps a numeric method code. `0` selects [`Method::Basic`]; every other
    /// code falls back to [`Method::Drift`].
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Basic,
            _ => Self::Drift,
        }
    }

    pub const fn code(self) -> u16 {
        match self {
            Self::Basic => 0,
            Self::Drift => 1,
        }
    }
}

impl From<u16> for Method {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

/// Construction-time configuration of a generator.
///
/// The record is checked once by [`Options::validate`] and frozen inside the
/// generator afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// Generation strategy.
    pub method: Method,
    /// Base instant in Unix milliseconds. Must lie in `[MIN_EPOCH, now]`.
    pub epoch: i64,
    /// Externally assigned worker id, unique per running generator.
    pub worker_id: u32,
    /// Width of the worker field, `[1, 22]`.
    pub worker_bits: u8,
    /// Width of the sequence field, `[2, 21]`.
    pub seq_bits: u8,
    /// Largest sequence value handed out within one millisecond.
    pub max_seq: u32,
    /// Sequence value every millisecond starts from. At least 5.
    pub min_seq: u32,
    /// How many slots the drift engine may run ahead before it waits,
    /// `[0, 10000]`.
    pub max_drift_steps: u32,
}

impl Options {
    /// Returns the stock configuration for `worker_id`: drift method, 6
    /// worker bits, 6 sequence bits and a drift bound of 2000.
    pub const fn new(worker_id: u32) -> Self {
        Self {
            method: Method::Drift,
            epoch: DEFAULT_EPOCH,
            worker_id,
            worker_bits: 6,
            seq_bits: 6,
            max_seq: (1 << 6) - 1,
            min_seq: MIN_SEQUENCE_FLOOR,
            max_drift_steps: 2000,
        }
    }

    /// Bit layout described by this record.
    pub const fn layout(&self) -> Layout {
        Layout::new(self.worker_bits, self.seq_bits)
    }

    /// Checks every field against its legal range.
    ///
    /// `now_millis` is the current Unix time and bounds the epoch from above.
    /// The first violation found is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] variant of the first invalid field.
    pub fn validate(&self, now_millis: i64) -> Result<()> {
        if self.epoch < MIN_EPOCH || self.epoch > now_millis {
            return Err(ConfigError::Epoch {
                value: self.epoch,
                min: MIN_EPOCH,
                max: now_millis,
            });
        }
        if !(MIN_SEQ_BITS..=MAX_SEQ_BITS).contains(&self.seq_bits) {
            return Err(ConfigError::SeqBits {
                value: self.seq_bits,
                min: MIN_SEQ_BITS,
                max: MAX_SEQ_BITS,
            });
        }
        if !(MIN_WORKER_BITS..=MAX_WORKER_BITS).contains(&self.worker_bits) {
            return Err(ConfigError::WorkerBits {
                value: self.worker_bits,
                min: MIN_WORKER_BITS,
                max: MAX_WORKER_BITS,
            });
        }
        if self.worker_bits + self.seq_bits > MAX_LAYOUT_BITS {
            return Err(ConfigError::BitBudget {
                worker_bits: self.worker_bits,
                seq_bits: self.seq_bits,
                max: MAX_LAYOUT_BITS,
            });
        }

        let layout = self.layout();
        if self.worker_id > layout.max_worker_id() {
            return Err(ConfigError::WorkerId {
                value: self.worker_id,
                max: layout.max_worker_id(),
            });
        }
        if self.max_seq > layout.max_sequence() {
            return Err(ConfigError::MaxSeq {
                value: self.max_seq,
                max: layout.max_sequence(),
            });
        }
        if self.min_seq < MIN_SEQUENCE_FLOOR || self.min_seq > layout.max_sequence() {
            return Err(ConfigError::MinSeq {
                value: self.min_seq,
                min: MIN_SEQUENCE_FLOOR,
                max: layout.max_sequence(),
            });
        }
        if self.max_drift_steps > MAX_DRIFT_STEPS {
            return Err(ConfigError::MaxDriftSteps {
                value: self.max_drift_steps,
                max: MAX_DRIFT_STEPS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn stock_options_are_valid() {
        assert_eq!(Options::new(3).validate(NOW), Ok(()));
    }

    #[test]
    fn rejects_epoch_outside_range() {
        let opts = Options {
            epoch: MIN_EPOCH - 1,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "epoch");

        let opts = Options {
            epoch: NOW + 1,
            ..Options::new(0)
        };
        assert_eq!(
            opts.validate(NOW),
            Err(ConfigError::Epoch {
                value: NOW + 1,
                min: MIN_EPOCH,
                max: NOW
            })
        );

        let opts = Options {
            epoch: NOW,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW), Ok(()));
    }

    #[test]
    fn rejects_narrow_sequence_field() {
        let opts = Options {
            seq_bits: 1,
            ..Options::new(0)
        };
        let err = opts.validate(NOW).unwrap_err();
        assert_eq!(err.field(), "seq_bits");
        assert_eq!(
            err,
            ConfigError::SeqBits {
                value: 1,
                min: 2,
                max: 21
            }
        );
    }

    #[test]
    fn rejects_worker_field_width() {
        let opts = Options {
            worker_bits: 0,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "worker_bits");
    }

    #[test]
    fn rejects_blown_bit_budget() {
        let opts = Options {
            worker_bits: 12,
            seq_bits: 11,
            ..Options::new(0)
        };
        let err = opts.validate(NOW).unwrap_err();
        assert_eq!(err.field(), "worker_bits");
        assert!(matches!(err, ConfigError::BitBudget { max: 22, .. }));

        let opts = Options {
            worker_bits: 11,
            seq_bits: 11,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW), Ok(()));
    }

    #[test]
    fn rejects_worker_id_past_field() {
        let opts = Options::new(1 << 6);
        let err = opts.validate(NOW).unwrap_err();
        assert_eq!(err.field(), "worker_id");
        assert_eq!(err, ConfigError::WorkerId { value: 64, max: 63 });

        assert_eq!(Options::new(63).validate(NOW), Ok(()));
    }

    #[test]
    fn rejects_sequence_bounds() {
        let opts = Options {
            max_seq: 64,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "max_seq");

        let opts = Options {
            min_seq: 4,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "min_seq");

        let opts = Options {
            min_seq: 64,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "min_seq");
    }

    #[test]
    fn rejects_drift_bound() {
        let opts = Options {
            max_drift_steps: MAX_DRIFT_STEPS + 1,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "max_drift_steps");
    }

    #[test]
    fn first_violation_wins() {
        let opts = Options {
            seq_bits: 1,
            worker_id: u32::MAX,
            max_drift_steps: u32::MAX,
            ..Options::new(0)
        };
        assert_eq!(opts.validate(NOW).unwrap_err().field(), "seq_bits");
    }

    #[test]
    fn every_valid_layout_keeps_sign_bit_clear() {
        let mut valid = 0;
        for worker_bits in 0..=30 {
            for seq_bits in 0..=30 {
                let opts = Options {
                    worker_bits,
                    seq_bits,
                    max_seq: 3,
                    min_seq: 5,
                    ..Options::new(0)
                };
                if opts.validate(NOW).is_err() {
                    continue;
                }
                let layout = opts.layout();
                assert!(layout.timestamp_bits() >= 41);
                let max_ts = (1_i64 << layout.timestamp_bits()) - 1;
                let id = layout.compose(max_ts, layout.max_worker_id(), layout.max_sequence());
                assert!(id > 0, "{worker_bits}/{seq_bits} overflowed");
                assert_eq!(layout.timestamp(id), max_ts);
                valid += 1;
            }
        }
        assert!(valid > 0);
    }

    #[test]
    fn method_codes_fall_back_to_drift() {
        assert_eq!(Method::from_code(0), Method::Basic);
        assert_eq!(Method::from_code(1), Method::Drift);
        assert_eq!(Method::from(7), Method::Drift);
        assert_eq!(Method::Basic.code(), 0);
    }

    #[test]
    fn error_message_names_range() {
        let err = ConfigError::WorkerId { value: 64, max: 63 };
        assert_eq!(err.to_string(), "worker_id 64 out of range [0, 63]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_serde_round_trip() {
        let opts = Options {
            method: Method::Basic,
            ..Options::new(9)
        };
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"method\":\"basic\""));
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}
