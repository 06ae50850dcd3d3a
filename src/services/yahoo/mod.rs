//! Yahoo Finance chart API provider.
//!
//! Thin wrapper over the public v8 chart endpoint. Rows with missing OHLCV
//! fields are dropped, and an upstream "no data" reply maps to an empty
//! series per the provider contract.

use crate::models::{Candle, Interval, Period, PriceSeries};
use crate::services::market_data::MarketDataProvider;
use backon::{ExponentialBuilder, Retryable};
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

/// Per-field arrays aligned with `timestamp`; entries are null for gaps.
#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooChartProvider {
    /// Build a provider against the given API base URL with a bounded
    /// per-request timeout.
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    fn chart_url(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Url, Box<dyn std::error::Error + Send + Sync>> {
        let mut url = self
            .base_url
            .join(&format!("/v8/finance/chart/{}", symbol))?;
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", interval.as_str());
        Ok(url)
    }

    fn series_from_result(result: ChartResult) -> PriceSeries {
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return PriceSeries::empty();
        };

        let mut candles = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            // dropna: every field must be present for the row to survive
            let row = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
                continue;
            };
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                continue;
            };
            candles.push(Candle::new(timestamp, open, high, low, close, volume));
        }

        PriceSeries::from_candles(candles)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>> {
        let url = self.chart_url(symbol, period, interval)?;
        debug!(%url, "fetching chart data");

        let send = || async {
            self.client
                .get(url.clone())
                .header("User-Agent", "wavetrix/0.1")
                .send()
                .await
        };
        let response = send
            .retry(ExponentialBuilder::default().with_max_times(2))
            .when(|e: &reqwest::Error| e.is_connect() || e.is_timeout())
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The chart endpoint reports unknown/delisted symbols as 404 with a
        // structured error body. That is "no data", not a failure.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(format!("chart API returned {}: {}", status, body).into());
        }

        let envelope: ChartEnvelope = serde_json::from_str(&body)?;
        if let Some(err) = envelope.chart.error {
            warn!(symbol, code = %err.code, description = %err.description, "chart API error, treating as no data");
            return Ok(PriceSeries::empty());
        }

        let series = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(Self::series_from_result)
            .unwrap_or_else(PriceSeries::empty);

        debug!(symbol, bars = series.len(), "chart data fetched");
        Ok(series)
    }
}
