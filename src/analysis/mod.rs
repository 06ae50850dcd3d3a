//! The analysis core: swing-point detection, Fibonacci levels, and the
//! coordinator that runs one end-to-end analysis.

pub mod coordinator;
pub mod extrema;
pub mod fibonacci;

pub use coordinator::{AnalysisOutcome, AnalysisReport, AnalysisRequest, Analyzer};
pub use extrema::detect_extrema;
pub use fibonacci::fibonacci_levels;

/// Operator-facing bounds for the detection window half-width.
pub const MIN_ORDER: usize = 3;
pub const MAX_ORDER: usize = 20;
pub const DEFAULT_ORDER: usize = 5;
