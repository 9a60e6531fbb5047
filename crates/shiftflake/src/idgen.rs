use std::time::SystemTime;

use crate::{
    config::{Method, Options},
    error::Result,
    generator::{Engine, IdEngine},
    layout::IdParts,
    time::{SystemClock, TimeSource, system_time_from_millis},
};

/// Validated entry point for issuing and decoding identifiers.
///
/// The configuration is checked once in the constructor; a rejected record
/// never yields a generator. Afterwards [`IdGenerator::next_id`] always
/// succeeds.
///
/// # Example
/// ```
/// use shiftflake::{IdGenerator, Options};
///
/// let generator = IdGenerator::new(Options::new(7)).unwrap();
///
/// let id = generator.next_id();
/// assert!(id > 0);
/// assert_eq!(generator.decompose(id).worker_id, 7);
/// ```
pub struct IdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    engine: Engine<T>,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator driven by the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`].
    ///
    /// [`ConfigError`]: crate::ConfigError
    pub fn new(options: Options) -> Result<Self> {
        Self::with_clock(options, SystemClock)
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator driven by `time`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`].
    ///
    /// [`ConfigError`]: crate::ConfigError
    pub fn with_clock(options: Options, time: T) -> Result<Self> {
        options.validate(time.current_millis())?;
        let engine = Engine::from_validated(options, time);

        #[cfg(feature = "tracing")]
        tracing::info!(
            method = ?options.method,
            worker_id = options.worker_id,
            worker_bits = options.worker_bits,
            seq_bits = options.seq_bits,
            "id generator ready"
        );

        Ok(Self { engine })
    }

    /// Issues the next identifier.
    pub fn next_id(&self) -> i64 {
        self.engine.next_id()
    }

    /// Absolute instant encoded in the upper bits of `id`.
    ///
    /// Only the timestamp field is read; worker id and sequence bits are
    /// ignored.
    pub fn extract_time(&self, id: i64) -> SystemTime {
        system_time_from_millis(self.extract_millis(id))
    }

    /// Unix milliseconds encoded in the upper bits of `id`.
    pub fn extract_millis(&self, id: i64) -> i64 {
        self.engine.layout().timestamp(id) + self.options().epoch
    }

    /// Splits `id` into its timestamp (relative to the epoch), worker id and
    /// sequence or rollback marker.
    pub fn decompose(&self, id: i64) -> IdParts {
        self.engine.layout().decompose(id)
    }

    pub fn options(&self) -> &Options {
        self.engine.options()
    }

    pub const fn method(&self) -> Method {
        self.engine.method()
    }

    /// The strategy backing this generator.
    pub const fn engine(&self) -> &Engine<T> {
        &self.engine
    }
}
