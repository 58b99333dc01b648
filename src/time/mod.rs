//! Time handling: the process clock and instant parsing.

pub mod source;

pub use source::{FixedTimeSource, RealTimeSource, TimeSource};
