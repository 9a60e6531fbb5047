/// A result type whose error defaults to [`ConfigError`].
///
/// Only construction is fallible. Once a generator exists, every call to
/// `next_id` returns an identifier.
pub type Result<T, E = ConfigError> = core::result::Result<T, E>;

/// Every way an [`Options`] record can be rejected.
///
/// Each variant carries the offending value together with the range it had
/// to fall into. Validation stops at the first violation, so a rejected
/// record never produces a partially configured generator.
///
/// [`Options`]: crate::Options
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The epoch is older than [`MIN_EPOCH`] or lies in the future.
    ///
    /// [`MIN_EPOCH`]: crate::MIN_EPOCH
    #[error("epoch {value} out of range [{min}, {max}]")]
    Epoch { value: i64, min: i64, max: i64 },

    /// The sequence field width is outside `[2, 21]`.
    #[error("seq_bits {value} out of range [{min}, {max}]")]
    SeqBits { value: u8, min: u8, max: u8 },

    /// The worker field width is outside `[1, 22]`.
    #[error("worker_bits {value} out of range [{min}, {max}]")]
    WorkerBits { value: u8, min: u8, max: u8 },

    /// The worker and sequence fields together exceed 22 bits.
    #[error("worker_bits {worker_bits} + seq_bits {seq_bits} exceeds {max}")]
    BitBudget {
        worker_bits: u8,
        seq_bits: u8,
        max: u8,
    },

    /// The worker id does not fit in `worker_bits`.
    #[error("worker_id {value} out of range [0, {max}]")]
    WorkerId { value: u32, max: u32 },

    /// The largest sequence value does not fit in `seq_bits`.
    #[error("max_seq {value} out of range [0, {max}]")]
    MaxSeq { value: u32, max: u32 },

    /// The smallest sequence value overlaps the reserved values or does not
    /// fit in `seq_bits`.
    #[error("min_seq {value} out of range [{min}, {max}]")]
    MinSeq { value: u32, min: u32, max: u32 },

    /// The drift bound is above [`MAX_DRIFT_STEPS`].
    ///
    /// [`MAX_DRIFT_STEPS`]: crate::MAX_DRIFT_STEPS
    #[error("max_drift_steps {value} out of range [0, {max}]")]
    MaxDriftSteps { value: u32, max: u32 },

    /// A preloaded sequence value lies in the reserved range or past the
    /// first exhausted value.
    #[error("sequence {value} out of range [{min}, {max}]")]
    Sequence { value: u32, min: u32, max: u32 },

    /// A preloaded timestamp slot lies before the epoch.
    #[error("timestamp {value} is negative")]
    Timestamp { value: i64 },
}

impl ConfigError {
    /// Name of the configuration field that was rejected.
    ///
    /// A blown bit budget is reported against `worker_bits`, the field that
    /// has to shrink to make room.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Epoch { .. } => "epoch",
            Self::SeqBits { .. } => "seq_bits",
            Self::WorkerBits { .. } | Self::BitBudget { .. } => "worker_bits",
            Self::WorkerId { .. } => "worker_id",
            Self::MaxSeq { .. } => "max_seq",
            Self::MinSeq { .. } => "min_seq",
            Self::MaxDriftSteps { .. } => "max_drift_steps",
            Self::Sequence { .. } => "sequence",
            Self::Timestamp { .. } => "timestamp",
        }
    }
}
