use crate::{
    config::{Method, Options},
    generator::{BaseState, BasicEngine, DriftEngine, IdEngine},
    time::TimeSource,
};

/// A generation strategy chosen at construction time.
pub enum Engine<T>
where
    T: TimeSource,
{
    Basic(BasicEngine<T>),
    Drift(DriftEngine<T>),
}

impl<T> Engine<T>
where
    T: TimeSource,
{
    /// Builds the strategy named by `options.method`. The options must
    /// already be validated.
    pub(crate) fn from_validated(options: Options, time: T) -> Self {
        let state = BaseState::new(0, options.min_seq);
        match options.method {
            Method::Basic => Self::Basic(BasicEngine::from_validated(options, state, time)),
            Method::Drift => Self::Drift(DriftEngine::from_validated(options, state, time)),
        }
    }

    pub const fn method(&self) -> Method {
        match self {
            Self::Basic(_) => Method::Basic,
            Self::Drift(_) => Method::Drift,
        }
    }
}

impl<T> IdEngine for Engine<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> i64 {
        match self {
            Self::Basic(engine) => engine.next_id(),
            Self::Drift(engine) => engine.next_id(),
        }
    }

    fn options(&self) -> &Options {
        match self {
            Self::Basic(engine) => IdEngine::options(engine),
            Self::Drift(engine) => IdEngine::options(engine),
        }
    }
}
