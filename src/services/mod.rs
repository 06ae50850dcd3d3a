//! External-facing services: quote provider and the fetch cache.

pub mod cache;
pub mod market_data;
pub mod yahoo;

pub use cache::SeriesCache;
pub use market_data::MarketDataProvider;
pub use yahoo::YahooChartProvider;
