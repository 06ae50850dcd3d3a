//! Coordinates one end-to-end analysis run: fetch, detect, derive levels.

use crate::analysis::{detect_extrema, fibonacci_levels};
use crate::models::{ExtremaSet, FibLevels, Interval, Period, PriceSeries};
use crate::services::cache::SeriesCache;
use crate::services::market_data::MarketDataProvider;
use std::sync::Arc;
use tracing::{debug, info};

/// Parameters for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
    /// Detection window half-width ("sensitivity"). Validated at the
    /// operator boundary; the detector itself only requires >= 1.
    pub order: usize,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            period: Period::default(),
            interval: Interval::default(),
            order: crate::analysis::DEFAULT_ORDER,
        }
    }
}

/// Everything the presentation layer needs after a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub series: PriceSeries,
    pub extrema: ExtremaSet,
    /// Close at the most recently detected swing high.
    pub last_high: f64,
    /// Close at the most recently detected swing low.
    pub last_low: f64,
    pub levels: FibLevels,
}

/// Terminal outcome of one run. `NoData` and `InsufficientExtrema` are
/// expected, user-correctable conditions, not errors; only transport
/// failures surface as `Err` from [`Analyzer::run`].
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Provider returned an empty series for the requested triple.
    NoData,
    /// Detector found zero swing highs or zero swing lows at this `order`.
    InsufficientExtrema { highs: usize, lows: usize },
    LevelsReady(AnalysisReport),
}

/// Runs analyses against an injected market data provider, optionally
/// memoizing fetches per (symbol, period, interval).
pub struct Analyzer {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    cache: Option<Arc<SeriesCache>>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn MarketDataProvider + Send + Sync>) -> Self {
        Self {
            provider,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<SeriesCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Execute one run. Sequential: fetch, detect, select the most recent
    /// high and low by detection index, compute levels.
    pub async fn run(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, Box<dyn std::error::Error + Send + Sync>> {
        debug!(
            symbol = %request.symbol,
            period = %request.period,
            interval = %request.interval,
            order = request.order,
            "starting analysis run"
        );

        let series = match &self.cache {
            Some(cache) => {
                cache
                    .get_or_fetch(
                        &request.symbol,
                        request.period,
                        request.interval,
                        self.provider.as_ref(),
                    )
                    .await?
            }
            None => {
                self.provider
                    .fetch_series(&request.symbol, request.period, request.interval)
                    .await?
            }
        };

        if series.is_empty() {
            info!(symbol = %request.symbol, "no data returned for symbol");
            return Ok(AnalysisOutcome::NoData);
        }

        let closes = series.closes();
        let extrema = detect_extrema(&closes, request.order);

        let (Some(high_idx), Some(low_idx)) = (extrema.last_high(), extrema.last_low()) else {
            info!(
                symbol = %request.symbol,
                highs = extrema.highs.len(),
                lows = extrema.lows.len(),
                order = request.order,
                "insufficient turning points at this sensitivity"
            );
            return Ok(AnalysisOutcome::InsufficientExtrema {
                highs: extrema.highs.len(),
                lows: extrema.lows.len(),
            });
        };

        // Most recent by detection index, not by price. The selected high may
        // sit chronologically before or after the selected low; the level
        // arithmetic does not care.
        let last_high = closes[high_idx];
        let last_low = closes[low_idx];
        let levels = fibonacci_levels(last_high, last_low);

        info!(
            symbol = %request.symbol,
            bars = series.len(),
            highs = extrema.highs.len(),
            lows = extrema.lows.len(),
            last_high,
            last_low,
            "analysis complete"
        );

        Ok(AnalysisOutcome::LevelsReady(AnalysisReport {
            series,
            extrema,
            last_high,
            last_low,
            levels,
        }))
    }
}
