//! Unit tests for the analysis coordinator

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wavetrix::analysis::{AnalysisOutcome, AnalysisRequest, Analyzer};
use wavetrix::models::{Candle, Interval, Period, PriceSeries};
use wavetrix::services::market_data::MarketDataProvider;
use wavetrix::services::SeriesCache;

fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                start + Duration::days(i as i64),
                close,
                close + 0.5,
                close - 0.5,
                close,
                1000.0,
            )
        })
        .collect();
    PriceSeries::from_candles(candles)
}

struct StubProvider {
    series: PriceSeries,
    fetches: AtomicUsize,
}

impl StubProvider {
    fn new(series: PriceSeries) -> Self {
        Self {
            series,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_series(
        &self,
        _symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.series.clone())
    }
}

struct FailingProvider;

#[async_trait]
impl MarketDataProvider for FailingProvider {
    async fn fetch_series(
        &self,
        _symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>> {
        Err("connection refused".into())
    }
}

fn request_with_order(order: usize) -> AnalysisRequest {
    let mut request = AnalysisRequest::new("TEST");
    request.order = order;
    request
}

#[tokio::test]
async fn empty_series_reports_no_data() {
    let analyzer = Analyzer::new(Arc::new(StubProvider::new(PriceSeries::empty())));
    let outcome = analyzer.run(&request_with_order(3)).await.unwrap();
    assert!(matches!(outcome, AnalysisOutcome::NoData));
}

#[tokio::test]
async fn flat_series_reports_insufficient_extrema() {
    let analyzer = Analyzer::new(Arc::new(StubProvider::new(series_from_closes(&[7.0; 40]))));
    let outcome = analyzer.run(&request_with_order(3)).await.unwrap();
    match outcome {
        AnalysisOutcome::InsufficientExtrema { highs, lows } => {
            assert_eq!(highs, 0);
            assert_eq!(lows, 0);
        }
        other => panic!("expected InsufficientExtrema, got {:?}", other),
    }
}

#[tokio::test]
async fn peak_and_trough_produce_levels() {
    // One clear swing high (close 20) and one clear swing low (close 4).
    let closes = [
        10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 18.0, 16.0, 12.0, 8.0, 6.0, 4.0, 6.0, 8.0, 10.0,
        12.0, 13.0, 14.0, 15.0, 16.0,
    ];
    let analyzer = Analyzer::new(Arc::new(StubProvider::new(series_from_closes(&closes))));

    let outcome = analyzer.run(&request_with_order(3)).await.unwrap();
    let report = match outcome {
        AnalysisOutcome::LevelsReady(report) => report,
        other => panic!("expected LevelsReady, got {:?}", other),
    };

    assert_eq!(report.extrema.highs, vec![5]);
    assert_eq!(report.extrema.lows, vec![11]);
    assert_eq!(report.last_high, 20.0);
    assert_eq!(report.last_low, 4.0);
    assert_eq!(report.levels.get("0%").unwrap(), 20.0);
    assert_eq!(report.levels.get("100%").unwrap(), 4.0);
    assert_eq!(report.series.len(), closes.len());
}

#[tokio::test]
async fn most_recent_extremum_wins_even_at_a_worse_price() {
    // Two swing highs: the later one (index 17, close 15) is lower-priced
    // than the earlier (index 5, close 20). The later one must be used.
    let closes = [
        10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 18.0, 16.0, 12.0, 8.0, 6.0, 4.0, 6.0, 8.0, 11.0,
        13.0, 14.0, 15.0, 14.0, 13.0, 11.0, 9.0, 8.0,
    ];
    let analyzer = Analyzer::new(Arc::new(StubProvider::new(series_from_closes(&closes))));

    let outcome = analyzer.run(&request_with_order(3)).await.unwrap();
    let report = match outcome {
        AnalysisOutcome::LevelsReady(report) => report,
        other => panic!("expected LevelsReady, got {:?}", other),
    };

    assert_eq!(report.extrema.highs, vec![5, 17]);
    assert_eq!(report.last_high, 15.0);
    assert_eq!(report.last_low, 4.0);
}

#[tokio::test]
async fn provider_errors_propagate() {
    let analyzer = Analyzer::new(Arc::new(FailingProvider));
    let result = analyzer.run(&request_with_order(3)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn cached_analyzer_fetches_identical_requests_once() {
    let provider = Arc::new(StubProvider::new(series_from_closes(&[7.0; 40])));
    let cache = Arc::new(SeriesCache::new(std::time::Duration::from_secs(60), 16));
    let analyzer = Analyzer::new(provider.clone()).with_cache(cache);

    let request = request_with_order(3);
    analyzer.run(&request).await.unwrap();
    analyzer.run(&request).await.unwrap();

    assert_eq!(provider.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cached_analyzer_distinguishes_request_triples() {
    let provider = Arc::new(StubProvider::new(series_from_closes(&[7.0; 40])));
    let cache = Arc::new(SeriesCache::new(std::time::Duration::from_secs(60), 16));
    let analyzer = Analyzer::new(provider.clone()).with_cache(cache);

    let mut first = request_with_order(3);
    first.period = Period::OneYear;
    let mut second = first.clone();
    second.period = Period::SixMonths;

    analyzer.run(&first).await.unwrap();
    analyzer.run(&second).await.unwrap();

    assert_eq!(provider.fetches.load(Ordering::SeqCst), 2);
}
