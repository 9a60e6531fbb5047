use crate::{config::Options, layout::Layout};

/// The one capability every generation strategy provides.
///
/// Implementations own their state behind a single lock, so `next_id` takes
/// `&self` and a single engine can be shared across threads.
pub trait IdEngine {
    /// Produces the next identifier.
    ///
    /// Never fails. Sequence exhaustion and clock rollback are absorbed
    /// internally, by waiting or by drifting depending on the strategy.
    fn next_id(&self) -> i64;

    /// The validated configuration this engine was built from.
    fn options(&self) -> &Options;

    /// Field widths of the identifiers this engine produces.
    fn layout(&self) -> Layout {
        self.options().layout()
    }
}
