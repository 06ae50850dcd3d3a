//! Unit tests for the chart data contract

use chrono::{Duration, TimeZone, Utc};
use wavetrix::analysis::{fibonacci_levels, AnalysisReport};
use wavetrix::models::{Candle, ExtremaSet, PriceSeries};
use wavetrix::render::ChartModel;

fn sample_report() -> AnalysisReport {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let closes = [10.0, 20.0, 10.0, 5.0, 10.0];
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                start + Duration::days(i as i64),
                close,
                close,
                close,
                close,
                1.0,
            )
        })
        .collect();

    AnalysisReport {
        series: PriceSeries::from_candles(candles),
        extrema: ExtremaSet {
            highs: vec![1],
            lows: vec![3],
        },
        last_high: 20.0,
        last_low: 5.0,
        levels: fibonacci_levels(20.0, 5.0),
    }
}

#[test]
fn polyline_covers_every_bar() {
    let report = sample_report();
    let chart = ChartModel::build(&report);

    assert_eq!(chart.points.len(), 5);
    assert_eq!(chart.points[1].close, 20.0);
}

#[test]
fn markers_point_at_detected_swings() {
    let chart = ChartModel::build(&sample_report());

    assert_eq!(chart.highs.len(), 1);
    assert_eq!(chart.highs[0].index, 1);
    assert_eq!(chart.highs[0].price, 20.0);

    assert_eq!(chart.lows.len(), 1);
    assert_eq!(chart.lows[0].index, 3);
    assert_eq!(chart.lows[0].price, 5.0);
}

#[test]
fn level_lines_carry_formatted_legends() {
    let chart = ChartModel::build(&sample_report());

    assert_eq!(chart.levels.len(), 8);
    assert_eq!(chart.levels[0].label, "0%");
    assert_eq!(chart.levels[0].legend, "0% 20.00");

    let ext = chart.levels.last().unwrap();
    assert_eq!(ext.label, "161.8% Ext");
    // 20 + 0.618 * 15 = 29.27
    assert_eq!(ext.legend, "161.8% Ext 29.27");
}

#[test]
fn chart_model_serializes_for_the_frontend() {
    let chart = ChartModel::build(&sample_report());
    let json = serde_json::to_value(&chart).unwrap();

    assert!(json["points"].is_array());
    assert_eq!(json["levels"][0]["label"], "0%");
    assert_eq!(json["highs"][0]["index"], 1);
}
