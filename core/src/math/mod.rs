pub mod stats;

pub use stats::{Bounds, StatsHelper};
