//! One-shot CLI run: fetch, analyze, print the level table.
//!
//! Usage: `wavetrix [SYMBOL] [PERIOD] [INTERVAL] [ORDER]`
//! Defaults: `BTC-USD 1y 1d 5`.

use std::sync::Arc;
use std::time::Duration;

use wavetrix::analysis::{AnalysisOutcome, AnalysisRequest, Analyzer};
use wavetrix::config::Config;
use wavetrix::services::YahooChartProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    wavetrix::logging::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut request = AnalysisRequest::new(args.get(1).map(String::as_str).unwrap_or("BTC-USD"));
    if let Some(period) = args.get(2) {
        request.period = period.parse()?;
    }
    if let Some(interval) = args.get(3) {
        request.interval = interval.parse()?;
    }
    if let Some(order) = args.get(4) {
        request.order = order.parse().map_err(|_| "order must be an integer")?;
    }

    let config = Config::from_env();
    let provider = YahooChartProvider::new(
        &config.quote_base_url,
        Duration::from_secs(config.fetch_timeout_secs),
    )?;
    let analyzer = Analyzer::new(Arc::new(provider));

    match analyzer.run(&request).await? {
        AnalysisOutcome::NoData => {
            println!("No data returned for {}.", request.symbol);
        }
        AnalysisOutcome::InsufficientExtrema { highs, lows } => {
            println!(
                "Too few turning points for {} (highs: {}, lows: {}). Adjust order.",
                request.symbol, highs, lows
            );
        }
        AnalysisOutcome::LevelsReady(report) => {
            println!(
                "{}: {} bars, {} swing highs, {} swing lows",
                request.symbol,
                report.series.len(),
                report.extrema.highs.len(),
                report.extrema.lows.len()
            );
            println!(
                "Last swing high: {:.4}  Last swing low: {:.4}",
                report.last_high, report.last_low
            );
            println!("Fibonacci levels:");
            for level in report.levels.iter() {
                println!("  {:>10}  {:.4}", level.label, level.price);
            }
        }
    }

    Ok(())
}
