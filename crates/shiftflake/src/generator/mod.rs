mod basic;
mod drift;
mod engine;
mod interface;
mod mutex;
mod state;

pub use basic::*;
pub use drift::*;
pub use engine::*;
pub use interface::*;
pub(crate) use mutex::*;
pub(crate) use state::*;
