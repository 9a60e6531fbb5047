// `parking_lot` mutexes do not poison, which keeps `next_id` infallible.
pub use parking_lot::Mutex;
