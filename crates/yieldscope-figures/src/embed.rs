//! Self-contained embedded map document.
//!
//! Renders a complete Leaflet HTML page, meant to be served into an
//! iframe: shaded country polygons on a continuous ramp over per-region
//! mean values, a floating legend, and a clustered marker layer pinning
//! each crop's record yield at the region centroid.
//!
//! Rendering never fails outward: a missing world or a template error
//! degrades to a minimal inline error page so the surrounding dashboard
//! stays up.

use std::collections::{BTreeMap, BTreeSet};

use minijinja::Environment;
use serde_json::{Value, json};
use tracing::warn;
use yieldscope_types::{Metric, Observation};

use crate::colors::{GREEN_RAMP, NO_DATA_FILL, PLASMA_MISSING_COLOR, PLASMA_RAMP, ramp_color};
use crate::error::FigureError;
use crate::world::WorldGeometry;

/// Heading shown on the embedded document.
pub const MAP_TITLE: &str = "Global Crop Yield Visualizer";

/// Subheading for the yield map.
pub const MAP_SUBTITLE: &str = "Red regions indicate missing data";

/// Name of the toggleable marker overlay.
pub const MARKER_LAYER_NAME: &str = "Top Yields by Crop";

/// Initial view center `(latitude, longitude)` and zoom.
pub const MAP_CENTER: (f64, f64) = (20.0, 0.0);

/// Initial zoom level.
pub const MAP_ZOOM: u8 = 2;

const MAP_TEMPLATE: &str = include_str!("../templates/map.html.j2");

/// Renders the embedded map document from preloaded world geometry.
pub struct MapRenderer {
    env: Environment<'static>,
}

impl MapRenderer {
    /// Create a renderer with the map template loaded.
    pub fn new() -> Result<Self, FigureError> {
        let mut env = Environment::new();
        env.add_template("map", MAP_TEMPLATE)
            .map_err(|e| FigureError::Template(format!("failed to add map template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the document for one metric and year.
    ///
    /// Failures degrade to an inline error page rather than propagating,
    /// so the iframe always has something to show.
    pub fn render(
        &self,
        world: &WorldGeometry,
        rows: &[&Observation],
        metric: Metric,
        year: i32,
    ) -> String {
        self.try_render(world, rows, metric, year).unwrap_or_else(|e| {
            warn!(error = %e, "embedded map rendering failed");
            format!("<!DOCTYPE html><html><body><p>Error generating map: {e}</p></body></html>")
        })
    }

    fn try_render(
        &self,
        world: &WorldGeometry,
        rows: &[&Observation],
        metric: Metric,
        year: i32,
    ) -> Result<String, FigureError> {
        if world.is_empty() {
            return Err(FigureError::NoWorldFeatures);
        }
        let context = build_context(world, rows, metric, year);
        self.env
            .get_template("map")
            .map_err(|e| FigureError::Template(format!("missing map template: {e}")))?
            .render(&context)
            .map_err(|e| FigureError::Template(format!("map render failed: {e}")))
    }
}

#[derive(Default)]
struct RegionAccum {
    value_sum: f64,
    value_count: u32,
    yield_sum: f64,
    yield_count: u32,
    crops: BTreeSet<String>,
}

impl RegionAccum {
    fn mean_value(&self) -> Option<f64> {
        (self.value_count > 0).then(|| self.value_sum / f64::from(self.value_count))
    }

    fn mean_yield(&self) -> Option<f64> {
        (self.yield_count > 0).then(|| self.yield_sum / f64::from(self.yield_count))
    }
}

fn build_context(
    world: &WorldGeometry,
    rows: &[&Observation],
    metric: Metric,
    year: i32,
) -> Value {
    let (ramp, missing_fill, subtitle): (&[&str], &str, &str) = if metric == Metric::YieldTHa {
        (&GREEN_RAMP, NO_DATA_FILL, MAP_SUBTITLE)
    } else {
        (&PLASMA_RAMP, PLASMA_MISSING_COLOR, "Grey regions indicate missing data")
    };

    let mut regions: BTreeMap<&str, RegionAccum> = BTreeMap::new();
    for obs in rows {
        if obs.year != year {
            continue;
        }
        let acc = regions.entry(obs.region.as_str()).or_default();
        if let Some(value) = metric.value_of(obs) {
            acc.value_sum += value;
            acc.value_count = acc.value_count.saturating_add(1);
        }
        acc.yield_sum += obs.yield_t_ha;
        acc.yield_count = acc.yield_count.saturating_add(1);
        acc.crops.insert(obs.crop.clone());
    }

    let (vmin, vmax) = mean_range(&regions);
    let span = vmax - vmin;

    let region_entries: Vec<Value> = world
        .features()
        .iter()
        .map(|feature| {
            let mean = regions.get(feature.name()).and_then(RegionAccum::mean_value);
            let style = mean.map_or_else(
                || {
                    json!({
                        "fillColor": missing_fill,
                        "color": "#555555",
                        "weight": 1,
                        "fillOpacity": 0.7,
                        "dashArray": "5, 5",
                    })
                },
                |value| {
                    let fraction = if span > 0.0 { (value - vmin) / span } else { 0.0 };
                    json!({
                        "fillColor": ramp_color(ramp, fraction),
                        "color": "#555555",
                        "weight": 1,
                        "fillOpacity": 0.7,
                    })
                },
            );
            json!({
                "name": feature.name(),
                "geometry": feature.geometry_json(),
                "style": style,
                "tooltip": format!("Region: {}", feature.name()),
            })
        })
        .collect();

    let markers = top_yield_markers(world, rows, &regions, year);

    let legend_title = format!("Average {}", metric.label());
    let legend_rows = legend(ramp, missing_fill, vmin, vmax);

    json!({
        "title": MAP_TITLE,
        "subtitle": subtitle,
        "center_lat": MAP_CENTER.0,
        "center_lon": MAP_CENTER.1,
        "zoom": MAP_ZOOM,
        "regions_json": serde_json::to_string(&region_entries).unwrap_or_else(|_| "[]".to_owned()),
        "markers_json": serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_owned()),
        "legend_title": legend_title,
        "legend_rows": legend_rows,
        "marker_layer_name": MARKER_LAYER_NAME,
    })
}

/// One marker per crop at the record-yield region's centroid.
fn top_yield_markers(
    world: &WorldGeometry,
    rows: &[&Observation],
    regions: &BTreeMap<&str, RegionAccum>,
    year: i32,
) -> Vec<Value> {
    let mut best: BTreeMap<&str, &Observation> = BTreeMap::new();
    for obs in rows {
        if obs.year != year {
            continue;
        }
        match best.get(obs.crop.as_str()) {
            // Ties keep the earlier observation.
            Some(current) if obs.yield_t_ha <= current.yield_t_ha => {}
            _ => {
                best.insert(obs.crop.as_str(), obs);
            }
        }
    }

    best.values()
        .filter_map(|obs| {
            let feature = world.get(&obs.region)?;
            let (lon, lat) = feature.centroid()?;
            let acc = regions.get(obs.region.as_str())?;
            let avg = acc.mean_yield().unwrap_or(obs.yield_t_ha);
            let popup = format!(
                concat!(
                    "<div style=\"width: 200px\">",
                    "<h4 style=\"color: #2b8cbe; margin: 0 0 4px 0\">{region}</h4>",
                    "<b>Top Crop:</b> {crop}<br>",
                    "<b>Record Yield:</b> {record:.1} t/ha ({year})<br>",
                    "<b>Avg Yield:</b> {avg:.1} t/ha<br>",
                    "<b>Crops Grown:</b> {count}",
                    "</div>"
                ),
                region = obs.region,
                crop = obs.crop,
                record = obs.yield_t_ha,
                year = obs.year,
                avg = avg,
                count = acc.crops.len(),
            );
            Some(json!({
                "lat": lat,
                "lon": lon,
                "tooltip": format!("{}: {:.1} t/ha", obs.crop, obs.yield_t_ha),
                "popup": popup,
            }))
        })
        .collect()
}

/// Legend rows: five value bands sampled off the ramp plus a missing row.
fn legend(ramp: &[&str], missing_fill: &str, vmin: f64, vmax: f64) -> Vec<Value> {
    let row = |fraction: f64, label: String| {
        json!({"color": ramp_color(ramp, fraction), "label": label})
    };
    vec![
        row(1.0, format!("High (> {:.1})", 0.75 * vmax)),
        row(0.75, format!("Medium-High ({:.1} - {:.1})", 0.5 * vmax, 0.75 * vmax)),
        row(0.5, format!("Medium ({:.1} - {:.1})", 0.25 * vmax, 0.5 * vmax)),
        row(0.25, format!("Low-Medium ({:.1} - {:.1})", vmin, 0.25 * vmax)),
        row(0.0, format!("Very Low (< {vmin:.1})")),
        json!({"color": missing_fill, "label": "No Data"}),
    ]
}

fn mean_range(regions: &BTreeMap<&str, RegionAccum>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for acc in regions.values() {
        if let Some(mean) = acc.mean_value() {
            if mean < min {
                min = mean;
            }
            if mean > max {
                max = mean;
            }
        }
    }
    if min > max { (0.0, 1.0) } else { (min, max) }
}
