//! # Bit layout
//!
//! Every identifier is a non-negative `i64` packed from **MSB to LSB**:
//!
//! ```text
//!  Bit Index:  63   62 ...                                          0
//!              +---+----------------+-----------------+--------------+
//!  Field:      | 0 | timestamp (T)  | worker id (W)   | sequence (S) |
//!              +---+----------------+-----------------+--------------+
//!              T = 63 - W - S, with W + S <= 22
//! ```
//!
//! The low `S` bits hold either a running sequence number (`>= min_seq`) or,
//! while the wall clock is behind the generator, a rollback marker in
//! `1..=4`. Value `0` is reserved for manually issued identifiers.

/// Oldest accepted epoch: 1990-01-01T00:00:00Z in Unix milliseconds.
pub const MIN_EPOCH: i64 = 631_123_200_000;

/// Smallest width of the sequence field.
pub const MIN_SEQ_BITS: u8 = 2;

/// Largest width of the sequence field.
pub const MAX_SEQ_BITS: u8 = 21;

/// Smallest width of the worker field.
pub const MIN_WORKER_BITS: u8 = 1;

/// Largest width of the worker field.
pub const MAX_WORKER_BITS: u8 = 22;

/// Upper bound on `worker_bits + seq_bits`. Leaves at least 41 bits of
/// timestamp below the always-clear sign bit.
pub const MAX_LAYOUT_BITS: u8 = 22;

/// Upper bound on how many slots the drift engine may run ahead of the
/// wall clock before it falls back to waiting.
pub const MAX_DRIFT_STEPS: u32 = 10_000;

/// Sequence value reserved for manually issued identifiers.
pub const MANUAL_SEQUENCE: u32 = 0;

/// First rollback marker.
pub const ROLLBACK_INDEX_MIN: u8 = 1;

/// Last rollback marker. The marker wraps back to [`ROLLBACK_INDEX_MIN`]
/// after this value.
pub const ROLLBACK_INDEX_MAX: u8 = 4;

/// Smallest sequence value a generator may hand out on its own. Everything
/// below it is reserved.
pub const MIN_SEQUENCE_FLOOR: u32 = 5;

/// Field widths of an identifier.
///
/// Obtained from [`Options::layout`] or an engine. Only widths that pass
/// [`Options::validate`] reach an engine, which keeps the timestamp field at
/// 41 bits or wider.
///
/// [`Options::layout`]: crate::Options::layout
/// [`Options::validate`]: crate::Options::validate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    worker_bits: u8,
    seq_bits: u8,
}

/// The three fields of a decoded identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: i64,
    /// Worker that issued the identifier.
    pub worker_id: u32,
    /// Running sequence number or rollback marker.
    pub sequence: u32,
}

impl Layout {
    pub(crate) const fn new(worker_bits: u8, seq_bits: u8) -> Self {
        Self {
            worker_bits,
            seq_bits,
        }
    }

    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    pub const fn seq_bits(&self) -> u8 {
        self.seq_bits
    }

    /// Width of the timestamp field.
    pub const fn timestamp_bits(&self) -> u8 {
        63 - self.worker_bits - self.seq_bits
    }

    /// How far the timestamp is shifted left.
    pub const fn timestamp_shift(&self) -> u8 {
        self.worker_bits + self.seq_bits
    }

    /// How far the worker id is shifted left.
    pub const fn worker_shift(&self) -> u8 {
        self.seq_bits
    }

    pub const fn max_worker_id(&self) -> u32 {
        (1 << self.worker_bits) - 1
    }

    pub const fn max_sequence(&self) -> u32 {
        (1 << self.seq_bits) - 1
    }

    /// Packs the three fields into an identifier.
    ///
    /// `worker_id` and `low` must already fit their fields.
    pub const fn compose(&self, timestamp: i64, worker_id: u32, low: u32) -> i64 {
        (timestamp << self.timestamp_shift())
            | ((worker_id as i64) << self.worker_shift())
            | low as i64
    }

    /// Recovers the timestamp field (milliseconds since the epoch).
    pub const fn timestamp(&self, id: i64) -> i64 {
        id >> self.timestamp_shift()
    }

    /// Splits an identifier into its fields.
    pub const fn decompose(&self, id: i64) -> IdParts {
        IdParts {
            timestamp: self.timestamp(id),
            worker_id: ((id >> self.worker_shift()) as u32) & self.max_worker_id(),
            sequence: (id as u32) & self.max_sequence(),
        }
    }
}
