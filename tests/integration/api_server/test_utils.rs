//! Test utilities for API server integration tests

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use wavetrix::analysis::Analyzer;
use wavetrix::auth::{Credentials, SessionStore};
use wavetrix::core::http::{create_router, AppState, HealthStatus};
use wavetrix::models::{Candle, Interval, Period, PriceSeries};
use wavetrix::services::market_data::MarketDataProvider;

/// Provider that replays a fixed series for every request.
struct FixedSeriesProvider {
    series: PriceSeries,
}

#[async_trait]
impl MarketDataProvider for FixedSeriesProvider {
    async fn fetch_series(
        &self,
        _symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.series.clone())
    }
}

/// Helper bundling the HTTP server with its canned market data.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub sessions: Arc<SessionStore>,
}

impl TestApiServer {
    /// Server whose provider always returns `series`. Login is
    /// master / 123.
    pub async fn with_series(series: PriceSeries) -> Self {
        let provider = Arc::new(FixedSeriesProvider { series });
        let sessions = Arc::new(SessionStore::new());
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            start_time: Arc::new(Instant::now()),
            credentials: Arc::new(Credentials::plaintext("master", "123")),
            sessions: sessions.clone(),
            analyzer: Arc::new(Analyzer::new(provider)),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, sessions }
    }

    pub async fn new() -> Self {
        Self::with_series(peak_and_trough_series()).await
    }

    /// Log in with the stock test credentials and return the bearer token.
    pub async fn login(&self) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&serde_json::json!({ "user": "master", "password": "123" }))
            .await;
        assert_eq!(response.status_code(), 200);
        response.json::<serde_json::Value>()["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }
}

/// 20 daily bars with a swing high (close 20) and a swing low (close 4).
pub fn peak_and_trough_series() -> PriceSeries {
    let closes = [
        10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 18.0, 16.0, 12.0, 8.0, 6.0, 4.0, 6.0, 8.0, 10.0,
        12.0, 13.0, 14.0, 15.0, 16.0,
    ];
    series_from_closes(&closes)
}

pub fn flat_series() -> PriceSeries {
    series_from_closes(&[7.0; 40])
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
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
