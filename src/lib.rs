//! Wavetrix — swing-point and Fibonacci level analysis service.
//!
//! Fetches historical candles for a ticker, detects local swing highs/lows in
//! the closing prices, and derives Fibonacci retracement/extension levels
//! between the most recent detected high and low.

pub mod analysis;
pub mod auth;
pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod render;
pub mod services;
