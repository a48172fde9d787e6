//! Process-wide tracing setup.

pub mod tracing;

pub use self::tracing::{init, init_for_tests};
