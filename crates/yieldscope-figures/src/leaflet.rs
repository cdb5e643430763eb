//! Styled `GeoJSON` payload for the interactive regional map.
//!
//! Every world feature comes back with a `style` object in Leaflet's
//! path-option names plus a prebuilt `popup` string, so the client can
//! feed the collection straight into `L.geoJSON` with a style callback
//! that reads `feature.properties.style`.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use yieldscope_types::{Metric, Observation};

use crate::colors::class_color;
use crate::world::WorldGeometry;

/// Region outline color.
pub const BORDER_COLOR: &str = "black";

/// Region outline weight in pixels.
pub const BORDER_WEIGHT: u32 = 1;

/// Region fill opacity.
pub const FILL_OPACITY: f64 = 0.8;

/// Build the styled region collection for one metric and year.
///
/// Regions are shaded on the five-class ramp over the range of per-region
/// mean values; regions with no matching observations keep the missing
/// fill and a `No data` popup.
pub fn region_layer(
    world: &WorldGeometry,
    rows: &[&Observation],
    metric: Metric,
    year: i32,
) -> Value {
    let means = region_means(rows, metric, year);
    let (min, max) = value_range(&means);
    let features: Vec<Value> = world
        .features()
        .iter()
        .map(|feature| {
            let value = means.get(feature.name()).copied();
            let popup = value.map_or_else(
                || format!("{}: No data", feature.name()),
                |v| format!("{}<br>{}: {v:.2}", feature.name(), metric.as_str()),
            );
            json!({
                "type": "Feature",
                "properties": {
                    "name": feature.name(),
                    "value": value,
                    "style": {
                        "fillColor": class_color(value, min, max),
                        "color": BORDER_COLOR,
                        "weight": BORDER_WEIGHT,
                        "fillOpacity": FILL_OPACITY,
                    },
                    "popup": popup,
                },
                "geometry": feature.geometry_json(),
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

/// Mean metric value per region for the given year.
fn region_means(rows: &[&Observation], metric: Metric, year: i32) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for obs in rows {
        if obs.year != year {
            continue;
        }
        let Some(value) = metric.value_of(obs) else {
            continue;
        };
        let slot = sums.entry(obs.region.as_str()).or_insert((0.0, 0));
        slot.0 += value;
        slot.1 = slot.1.saturating_add(1);
    }
    sums.into_iter()
        .map(|(region, (sum, n))| (region.to_owned(), sum / f64::from(n.max(1))))
        .collect()
}

fn value_range(means: &BTreeMap<String, f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in means.values() {
        if *value < min {
            min = *value;
        }
        if *value > max {
            max = *value;
        }
    }
    if min > max { (0.0, 0.0) } else { (min, max) }
}
