//! Shared data models spanning the analysis layers.

pub mod analysis;
pub mod candle;
pub mod series;

pub use analysis::{ExtremaSet, FibLevel, FibLevels};
pub use candle::Candle;
pub use series::{Interval, Period, PriceSeries};
