//! Plotly figure payloads for the dashboard charts.
//!
//! Every builder returns a complete `{"data": [...], "layout": {...}}`
//! document in plotly's JSON schema, ready to hand to `Plotly.newPlot`
//! on the client. Traces are grouped per crop in sorted crop order so
//! payloads are deterministic for a given filter result.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use yieldscope_types::{ChartKind, Metric, Observation, Theme};

use crate::colors::{PLASMA_RAMP, crop_color, plotly_colorscale};

/// Yield over time, one trace per crop, as lines or grouped bars.
pub fn yield_over_time(rows: &[&Observation], kind: ChartKind, theme: Theme) -> Value {
    let mut by_crop: BTreeMap<&str, (Vec<i32>, Vec<f64>)> = BTreeMap::new();
    for obs in rows {
        let series = by_crop.entry(obs.crop.as_str()).or_default();
        series.0.push(obs.year);
        series.1.push(obs.yield_t_ha);
    }
    let data: Vec<Value> = by_crop
        .iter()
        .map(|(crop, (years, yields))| match kind {
            ChartKind::Line => json!({
                "type": "scatter",
                "mode": "lines",
                "name": crop,
                "x": years,
                "y": yields,
                "line": {"color": crop_color(crop)},
            }),
            ChartKind::Bar => json!({
                "type": "bar",
                "name": crop,
                "x": years,
                "y": yields,
                "marker": {"color": crop_color(crop)},
            }),
        })
        .collect();

    let mut layout = base_layout("Crop Yield Over Time", theme);
    layout.insert("xaxis".to_owned(), axis("Year"));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    if kind == ChartKind::Bar {
        layout.insert("barmode".to_owned(), json!("group"));
    }
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Rainfall against yield, one point per observation, colored by average
/// temperature on the plasma scale. Rows without a rainfall value are
/// dropped; rows without a temperature keep a null color slot.
pub fn rainfall_yield_scatter(rows: &[&Observation], theme: Theme) -> Value {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    let mut temps: Vec<Option<f64>> = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    for obs in rows {
        let Some(rainfall) = obs.rainfall_mm else {
            continue;
        };
        xs.push(rainfall);
        ys.push(obs.yield_t_ha);
        temps.push(obs.avg_temp_c);
        texts.push(format!(
            "crop: {}<br>year: {}<br>region: {}",
            obs.crop, obs.year, obs.region
        ));
    }
    let data = vec![json!({
        "type": "scatter",
        "mode": "markers",
        "x": xs,
        "y": ys,
        "text": texts,
        "marker": {
            "color": temps,
            "colorscale": plotly_colorscale(&PLASMA_RAMP),
            "showscale": true,
            "colorbar": {"title": {"text": Metric::AvgTempC.label()}},
        },
    })];

    let mut layout = base_layout("Rainfall vs Yield", theme);
    layout.insert("xaxis".to_owned(), axis(Metric::RainfallMm.label()));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Pesticide use against yield, one trace per crop in the crop's fixed
/// color. Rows without a pesticide value are dropped.
pub fn pesticide_yield_scatter(rows: &[&Observation], theme: Theme) -> Value {
    let mut by_crop: BTreeMap<&str, (Vec<f64>, Vec<f64>, Vec<String>)> = BTreeMap::new();
    for obs in rows {
        let Some(pesticide) = obs.pesticide_t else {
            continue;
        };
        let series = by_crop.entry(obs.crop.as_str()).or_default();
        series.0.push(pesticide);
        series.1.push(obs.yield_t_ha);
        series.2.push(format!("region: {}<br>year: {}", obs.region, obs.year));
    }
    let data: Vec<Value> = by_crop
        .iter()
        .map(|(crop, (xs, ys, texts))| {
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": crop,
                "x": xs,
                "y": ys,
                "text": texts,
                "marker": {"color": crop_color(crop)},
            })
        })
        .collect();

    let mut layout = base_layout("Pesticide Use vs Yield", theme);
    layout.insert("xaxis".to_owned(), axis(Metric::PesticideT.label()));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Grouped bars of yield per region for a single year, one trace per crop.
pub fn regional_bar(rows: &[&Observation], year: i32, theme: Theme) -> Value {
    let mut by_crop: BTreeMap<&str, (Vec<&str>, Vec<f64>)> = BTreeMap::new();
    for obs in rows {
        if obs.year != year {
            continue;
        }
        let series = by_crop.entry(obs.crop.as_str()).or_default();
        series.0.push(obs.region.as_str());
        series.1.push(obs.yield_t_ha);
    }
    let data: Vec<Value> = by_crop
        .iter()
        .map(|(crop, (regions, yields))| {
            json!({
                "type": "bar",
                "name": crop,
                "x": regions,
                "y": yields,
                "marker": {"color": crop_color(crop)},
            })
        })
        .collect();

    let mut layout = base_layout(&format!("Regional Yield in {year}"), theme);
    layout.insert("xaxis".to_owned(), axis("Region"));
    layout.insert("yaxis".to_owned(), axis(Metric::YieldTHa.label()));
    layout.insert("barmode".to_owned(), json!("group"));
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Country-shaded yield choropleth for one crop and one year.
///
/// Region names resolve through plotly's `country names` location mode,
/// and regions with several observations are averaged.
pub fn choropleth(rows: &[&Observation], crop: &str, year: i32, theme: Theme) -> Value {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for obs in rows {
        if obs.crop != crop || obs.year != year {
            continue;
        }
        let slot = sums.entry(obs.region.as_str()).or_insert((0.0, 0));
        slot.0 += obs.yield_t_ha;
        slot.1 = slot.1.saturating_add(1);
    }
    let locations: Vec<&str> = sums.keys().copied().collect();
    let z: Vec<f64> = sums.values().map(|(sum, n)| sum / count_f64(*n)).collect();

    let data = vec![json!({
        "type": "choropleth",
        "locations": locations,
        "locationmode": "country names",
        "z": z,
        "colorscale": "YlGnBu",
        "colorbar": {"title": {"text": Metric::YieldTHa.label()}},
    })];

    let mut layout = base_layout(&format!("{crop} Yield in {year}"), theme);
    layout.insert("geo".to_owned(), json!({"showframe": false, "showcoastlines": false}));
    json!({"data": data, "layout": Value::Object(layout)})
}

/// Shared layout scaffold: title plus theme background and font colors.
pub(crate) fn base_layout(title: &str, theme: Theme) -> Map<String, Value> {
    let (paper, plot, font) = theme_colors(theme);
    let mut layout = Map::new();
    layout.insert("title".to_owned(), json!({"text": title}));
    layout.insert("paper_bgcolor".to_owned(), json!(paper));
    layout.insert("plot_bgcolor".to_owned(), json!(plot));
    layout.insert("font".to_owned(), json!({"color": font}));
    layout
}

/// Axis object with a title.
pub(crate) fn axis(title: &str) -> Value {
    json!({"title": {"text": title}})
}

const fn theme_colors(theme: Theme) -> (&'static str, &'static str, &'static str) {
    match theme {
        Theme::Light => ("#ffffff", "#ffffff", "#2a3f5f"),
        Theme::Dark => ("#111111", "#111111", "#f2f5fa"),
    }
}

fn count_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}
