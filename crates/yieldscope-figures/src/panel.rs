//! Analysis panel payload: correlation heatmap, aggregate bars, the
//! yearly trend, and the regression note.
//!
//! The panel always renders on the light template regardless of the
//! dashboard theme, so these builders take no theme parameter.

use serde_json::{Value, json};
use yieldscope_stats::{Analysis, CorrelationMatrix, GroupMean, RegressionSummary, YearlyYield};
use yieldscope_types::{Metric, Theme};

use crate::charts::{axis, base_layout};

/// Rows shown by the yearly table, counted from the newest year.
pub const YEARLY_TABLE_ROWS: usize = 10;

/// Correlation heatmap over the numeric columns, Viridis scale pinned to
/// `[-1, 1]`. Undefined cells serialize as null and render as gaps.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Value {
    let data = vec![json!({
        "type": "heatmap",
        "z": matrix.values,
        "x": matrix.columns,
        "y": matrix.columns,
        "colorscale": "Viridis",
        "zmin": -1,
        "zmax": 1,
    })];
    let layout = base_layout("Correlation Matrix", Theme::Light);
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Bar figure of mean yield per crop, highest first.
pub fn crop_means_bar(means: &[GroupMean]) -> Value {
    means_bar(means, "Average Yield by Crop", "Crop")
}

/// Bar figure of mean yield per region, highest first.
pub fn region_means_bar(means: &[GroupMean]) -> Value {
    means_bar(means, "Average Yield by Region", "Region")
}

/// Line figure of mean yield per year across the whole filter result.
pub fn yearly_trend(yearly: &[YearlyYield]) -> Value {
    let years: Vec<i32> = yearly.iter().map(|row| row.year).collect();
    let means: Vec<f64> = yearly.iter().map(|row| row.mean_yield).collect();
    let data = vec![json!({
        "type": "scatter",
        "mode": "lines",
        "x": years,
        "y": means,
    })];
    let mut layout = base_layout("Average Yield by Year", Theme::Light);
    layout.insert("xaxis".to_owned(), axis("Year"));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    json!({"data": data, "layout": Value::Object(layout)})
}

/// The last [`YEARLY_TABLE_ROWS`] yearly rows, oldest first.
pub fn yearly_table(yearly: &[YearlyYield]) -> Vec<Value> {
    let start = yearly.len().saturating_sub(YEARLY_TABLE_ROWS);
    yearly
        .iter()
        .skip(start)
        .map(|row| {
            json!({
                "year": row.year,
                "mean_yield": row.mean_yield,
                "pct_change": row.pct_change,
            })
        })
        .collect()
}

/// One-line fit summary shown under the panel figures.
pub fn regression_note(summary: &RegressionSummary) -> String {
    format!(
        "R2: {:.3}, Coefs: [{:.4}, {:.4}, {:.4}]",
        summary.r_squared,
        summary.rainfall_coef,
        summary.temperature_coef,
        summary.pesticide_coef
    )
}

/// The full analysis panel payload.
///
/// Bundles the four panel figures with the yearly table and the
/// regression note; the note is null when the fit was skipped.
pub fn analysis_panel(analysis: &Analysis) -> Value {
    json!({
        "outlier_count": analysis.outlier_count,
        "figures": {
            "correlation": correlation_heatmap(&analysis.correlation),
            "yield_by_crop": crop_means_bar(&analysis.mean_yield_by_crop),
            "yield_by_region": region_means_bar(&analysis.mean_yield_by_region),
            "yearly_trend": yearly_trend(&analysis.yearly),
        },
        "yearly_table": yearly_table(&analysis.yearly),
        "regression_note": analysis.regression.as_ref().map(regression_note),
    })
}

fn means_bar(means: &[GroupMean], title: &str, x_title: &str) -> Value {
    let keys: Vec<&str> = means.iter().map(|group| group.key.as_str()).collect();
    let values: Vec<f64> = means.iter().map(|group| group.mean_yield).collect();
    let data = vec![json!({
        "type": "bar",
        "x": keys,
        "y": values,
    })];
    let mut layout = base_layout(title, Theme::Light);
    layout.insert("xaxis".to_owned(), axis(x_title));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    json!({"data": data, "layout": Value::Object(layout)})
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn matrix() -> CorrelationMatrix {
        CorrelationMatrix {
            columns: vec!["year".to_owned(), "yield_t_ha".to_owned()],
            values: vec![vec![Some(1.0), Some(0.5)], vec![Some(0.5), None]],
        }
    }

    fn yearly_rows(count: i32) -> Vec<YearlyYield> {
        (0..count)
            .map(|offset| YearlyYield {
                year: 2000_i32.saturating_add(offset),
                mean_yield: 3.0,
                pct_change: if offset == 0 { None } else { Some(0.0) },
            })
            .collect()
    }

    #[test]
    fn heatmap_pins_scale_to_unit_interval() {
        let figure = correlation_heatmap(&matrix());
        let trace = figure.get("data").and_then(|d| d.get(0)).unwrap();
        assert_eq!(trace.get("colorscale").and_then(Value::as_str), Some("Viridis"));
        assert_eq!(trace.get("zmin").and_then(Value::as_i64), Some(-1));
        assert_eq!(trace.get("zmax").and_then(Value::as_i64), Some(1));
        let z = trace.get("z").and_then(Value::as_array).unwrap();
        let last_row = z.last().unwrap().as_array().unwrap();
        assert!(last_row.last().unwrap().is_null());
        assert_eq!(
            figure
                .get("layout")
                .and_then(|l| l.get("title"))
                .and_then(|t| t.get("text"))
                .and_then(Value::as_str),
            Some("Correlation Matrix")
        );
    }

    #[test]
    fn means_bar_preserves_input_order() {
        let means = vec![
            GroupMean { key: "Maize".to_owned(), mean_yield: 9.0 },
            GroupMean { key: "Wheat".to_owned(), mean_yield: 5.0 },
        ];
        let figure = crop_means_bar(&means);
        let trace = figure.get("data").and_then(|d| d.get(0)).unwrap();
        let keys = trace.get("x").and_then(Value::as_array).unwrap();
        assert_eq!(keys.first().and_then(Value::as_str), Some("Maize"));
        assert_eq!(keys.get(1).and_then(Value::as_str), Some("Wheat"));
    }

    #[test]
    fn yearly_table_keeps_the_newest_ten_rows() {
        let rows = yearly_table(&yearly_rows(12));
        assert_eq!(rows.len(), 10);
        assert_eq!(rows.first().and_then(|r| r.get("year")).and_then(Value::as_i64), Some(2002));
        assert_eq!(rows.last().and_then(|r| r.get("year")).and_then(Value::as_i64), Some(2011));
    }

    #[test]
    fn yearly_table_shorter_than_ten_is_unchanged() {
        let rows = yearly_table(&yearly_rows(3));
        assert_eq!(rows.len(), 3);
        assert!(rows.first().and_then(|r| r.get("pct_change")).unwrap().is_null());
    }

    #[test]
    fn regression_note_format() {
        let summary = RegressionSummary {
            r_squared: 0.875,
            intercept: 1.0,
            rainfall_coef: 2.0,
            temperature_coef: 3.0,
            pesticide_coef: 4.0,
            observations: 40,
        };
        assert_eq!(
            regression_note(&summary),
            "R2: 0.875, Coefs: [2.0000, 3.0000, 4.0000]"
        );
    }

    #[test]
    fn panel_bundles_figures_and_note() {
        let analysis = Analysis {
            outlier_count: 2,
            correlation: matrix(),
            mean_yield_by_crop: vec![GroupMean { key: "Wheat".to_owned(), mean_yield: 5.0 }],
            mean_yield_by_region: vec![GroupMean { key: "France".to_owned(), mean_yield: 6.0 }],
            yearly: yearly_rows(2),
            regression: None,
        };
        let panel = analysis_panel(&analysis);
        assert_eq!(panel.get("outlier_count").and_then(Value::as_u64), Some(2));
        assert!(panel.get("regression_note").unwrap().is_null());
        let figures = panel.get("figures").unwrap();
        assert!(figures.get("correlation").is_some());
        assert!(figures.get("yearly_trend").is_some());
        assert_eq!(panel.get("yearly_table").and_then(Value::as_array).map(Vec::len), Some(2));
    }
}
