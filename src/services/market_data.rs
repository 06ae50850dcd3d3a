//! Market data provider interface consumed by the analysis coordinator.

use crate::models::{Interval, Period, PriceSeries};

/// Source of historical candles for a symbol.
///
/// Contract: "no data" for a valid request is an empty series, not an error.
/// `Err` is reserved for transport and decoding failures. Implementations
/// should bound the call (timeout) so a hung upstream cannot stall a run.
#[async_trait::async_trait]
pub trait MarketDataProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>>;
}
