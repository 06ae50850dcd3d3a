//! Fibonacci retracement and extension levels between a swing high and low.

use crate::models::{FibLevel, FibLevels};

/// Retracement fractions between the 0% and 100% anchors, in display order.
const RETRACEMENTS: [(&str, f64); 5] = [
    ("23.6%", 0.236),
    ("38.2%", 0.382),
    ("50%", 0.5),
    ("61.8%", 0.618),
    ("78.6%", 0.786),
];

/// Compute the eight standard levels for one high/low pair.
///
/// `0%` and `100%` are the anchors themselves (exact, not derived through the
/// range), the five retracements sit at `high - fraction * (high - low)`, and
/// the single extension projects `0.618 * (high - low)` beyond the high.
///
/// No validation: callers passing `high < low` get arithmetically inverted
/// levels (the retracements land above `high`). That matches the heuristic's
/// literal arithmetic and is left to callers to interpret.
pub fn fibonacci_levels(high: f64, low: f64) -> FibLevels {
    let diff = high - low;

    let mut levels = Vec::with_capacity(8);
    levels.push(FibLevel {
        label: "0%".to_string(),
        price: high,
    });
    for (label, fraction) in RETRACEMENTS {
        levels.push(FibLevel {
            label: label.to_string(),
            price: high - fraction * diff,
        });
    }
    levels.push(FibLevel {
        label: "100%".to_string(),
        price: low,
    });
    levels.push(FibLevel {
        label: "161.8% Ext".to_string(),
        price: high + 0.618 * diff,
    });

    FibLevels::from_ordered(levels)
}
