//! Derived analysis artifacts: extrema indices and Fibonacci level maps.

use serde::{Deserialize, Serialize};

/// Indices of detected swing points in a closing-price sequence.
///
/// Both lists are strictly increasing and index into the series they were
/// detected on. Either may be empty for short or flat series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremaSet {
    pub highs: Vec<usize>,
    pub lows: Vec<usize>,
}

impl ExtremaSet {
    /// Most recent swing high by detection order (last in the list).
    pub fn last_high(&self) -> Option<usize> {
        self.highs.last().copied()
    }

    /// Most recent swing low by detection order (last in the list).
    pub fn last_low(&self) -> Option<usize> {
        self.lows.last().copied()
    }
}

/// One named Fibonacci level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub label: String,
    pub price: f64,
}

/// The eight Fibonacci levels for one high/low pair, in display order.
///
/// Order is part of the contract for presentation; lookup by label is
/// positional scan since there are always exactly eight entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibLevels {
    levels: Vec<FibLevel>,
}

impl FibLevels {
    pub(crate) fn from_ordered(levels: Vec<FibLevel>) -> Self {
        Self { levels }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.levels
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FibLevel> {
        self.levels.iter()
    }

    pub fn as_slice(&self) -> &[FibLevel] {
        &self.levels
    }
}
