//! Chart data contract for the presentation layer.
//!
//! The core does not draw. It hands the frontend a serializable model with
//! the close polyline, swing markers, and horizontal level lines; what the
//! pixels look like is the frontend's business.

use crate::analysis::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the close-price polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// A detected swing point to mark on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingMarker {
    /// Index into the polyline.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// A horizontal Fibonacci level line with its legend text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLine {
    pub label: String,
    pub price: f64,
    /// Ready-made legend entry, e.g. `"61.8% 87.64"`.
    pub legend: String,
}

/// Everything needed to draw one analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    pub points: Vec<PricePoint>,
    pub highs: Vec<SwingMarker>,
    pub lows: Vec<SwingMarker>,
    pub levels: Vec<LevelLine>,
}

impl ChartModel {
    pub fn build(report: &AnalysisReport) -> Self {
        let candles = report.series.candles();

        let points: Vec<PricePoint> = candles
            .iter()
            .map(|c| PricePoint {
                timestamp: c.timestamp,
                close: c.close,
            })
            .collect();

        let marker = |&index: &usize| SwingMarker {
            index,
            timestamp: candles[index].timestamp,
            price: candles[index].close,
        };
        let highs = report.extrema.highs.iter().map(marker).collect();
        let lows = report.extrema.lows.iter().map(marker).collect();

        let levels = report
            .levels
            .iter()
            .map(|level| LevelLine {
                label: level.label.clone(),
                price: level.price,
                legend: format!("{} {:.2}", level.label, level.price),
            })
            .collect();

        Self {
            points,
            highs,
            lows,
            levels,
        }
    }
}
