//! Color tables and ramps shared by charts, the regional map layer, and
//! the embedded map document.
//!
//! Crop colors are fixed per crop name so a crop keeps its color across
//! every figure and filter combination. Map ramps come in three flavors:
//! a five-class stepped ramp for the regional layer, a continuous green
//! ramp for the embedded yield map, and a continuous plasma ramp for the
//! embedded map's non-yield metrics.

/// Fixed per-crop trace colors, keyed by crop name as it appears in the
/// observation file.
pub const CROP_COLORS: [(&str, &str); 9] = [
    ("Maize", "#FDB183"),
    ("Potatoes", "#C44E52"),
    ("Rice, paddy", "#55A868"),
    ("Sorghum", "#8172B2"),
    ("Soybeans", "#CCB974"),
    ("Sweet potatoes", "#64B5CD"),
    ("Wheat", "#8C564B"),
    ("Cassava", "#FF9896"),
    ("Yams", "#9467BD"),
];

/// Trace color for crops outside [`CROP_COLORS`].
pub const FALLBACK_CROP_COLOR: &str = "#7F7F7F";

/// Fill for regions with no observations on the regional map layer.
pub const MISSING_REGION_COLOR: &str = "#ccc";

/// Five-class stepped ramp for the regional map layer, light to dark.
pub const FIVE_CLASS_RAMP: [&str; 5] = ["#ffffcc", "#a1dab4", "#41b6c4", "#2c7fb8", "#253494"];

/// Class boundaries for [`FIVE_CLASS_RAMP`], as fractions of the value range.
pub const CLASS_BOUNDS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Continuous green ramp for the embedded yield map.
pub const GREEN_RAMP: [&str; 5] = ["#ffffcc", "#c2e699", "#78c679", "#31a354", "#006837"];

/// Continuous plasma ramp for the embedded map's non-yield metrics.
pub const PLASMA_RAMP: [&str; 6] =
    ["#0d0887", "#6a00a8", "#b12a90", "#e16462", "#fca636", "#f0f921"];

/// Fill for regions with no observations when the plasma ramp is active.
pub const PLASMA_MISSING_COLOR: &str = "#d3d3d3";

/// Fill for regions with no observations on the embedded yield map.
pub const NO_DATA_FILL: &str = "#ff0000";

/// Look up the fixed trace color for a crop.
pub fn crop_color(crop: &str) -> &'static str {
    CROP_COLORS
        .iter()
        .find(|(name, _)| *name == crop)
        .map_or(FALLBACK_CROP_COLOR, |(_, color)| color)
}

/// Classify a value into the five-class ramp.
///
/// The value's position in `[min, max]` picks the class; a degenerate
/// range (`max <= min`) maps everything to the first class, and a missing
/// value gets [`MISSING_REGION_COLOR`].
pub fn class_color(value: Option<f64>, min: f64, max: f64) -> &'static str {
    let Some(value) = value else {
        return MISSING_REGION_COLOR;
    };
    let fraction = if max > min { (value - min) / (max - min) } else { 0.0 };
    let class = CLASS_BOUNDS.iter().take_while(|bound| fraction >= **bound).count();
    FIVE_CLASS_RAMP.get(class).copied().unwrap_or(MISSING_REGION_COLOR)
}

/// Interpolate a continuous ramp at `fraction` in `[0, 1]`.
///
/// Fractions outside the range are clamped. Blending is linear per RGB
/// channel between the two ramp stops surrounding the fraction.
pub fn ramp_color(ramp: &[&str], fraction: f64) -> String {
    let Some(first) = ramp.first() else {
        return String::from(MISSING_REGION_COLOR);
    };
    let segments = ramp.len().saturating_sub(1);
    if segments == 0 {
        return (*first).to_owned();
    }
    let scaled = fraction.clamp(0.0, 1.0) * index_f64(segments);
    for (index, pair) in ramp.windows(2).enumerate() {
        let start = index_f64(index);
        if scaled <= start + 1.0 {
            if let (Some(from), Some(to)) = (pair.first(), pair.get(1)) {
                return blend_hex(from, to, scaled - start);
            }
        }
    }
    ramp.last().map_or_else(|| String::from(MISSING_REGION_COLOR), |last| (*last).to_owned())
}

/// Build a plotly continuous colorscale from a ramp: evenly spaced
/// `[fraction, color]` pairs.
pub fn plotly_colorscale(ramp: &[&str]) -> serde_json::Value {
    let segments = ramp.len().saturating_sub(1);
    if segments == 0 {
        let color = ramp.first().copied().unwrap_or(MISSING_REGION_COLOR);
        return serde_json::json!([[0.0, color], [1.0, color]]);
    }
    let pairs: Vec<serde_json::Value> = ramp
        .iter()
        .enumerate()
        .map(|(index, color)| serde_json::json!([index_f64(index) / index_f64(segments), color]))
        .collect();
    serde_json::Value::Array(pairs)
}

/// Blend two `#rrggbb` colors at `t` in `[0, 1]`.
fn blend_hex(from: &str, to: &str, t: f64) -> String {
    if let (Some(a), Some(b)) = (parse_hex(from), parse_hex(to)) {
        let r = blend_channel(a.0, b.0, t);
        let g = blend_channel(a.1, b.1, t);
        let b = blend_channel(a.2, b.2, t);
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        from.to_owned()
    }
}

fn blend_channel(from: u8, to: u8, t: f64) -> u8 {
    let mixed = f64::from(to).mul_add(t, f64::from(from) * (1.0 - t));
    let rounded = mixed.round().clamp(0.0, 255.0);
    // Safe: clamped to [0.0, 255.0] which fits in u8.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let channel = rounded as u8;
    channel
}

/// Parse a `#rrggbb` string into channels. Short forms are not accepted.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(digits.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(digits.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(digits.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

fn index_f64(index: usize) -> f64 {
    f64::from(u32::try_from(index).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crop_colors_are_stable() {
        assert_eq!(crop_color("Wheat"), "#8C564B");
        assert_eq!(crop_color("Rice, paddy"), "#55A868");
        assert_eq!(crop_color("Plantains and others"), FALLBACK_CROP_COLOR);
    }

    #[test]
    fn class_color_buckets_on_fraction() {
        // Range [0, 10]: boundaries land at 2, 4, 6, 8.
        assert_eq!(class_color(Some(0.0), 0.0, 10.0), "#ffffcc");
        assert_eq!(class_color(Some(1.9), 0.0, 10.0), "#ffffcc");
        assert_eq!(class_color(Some(2.0), 0.0, 10.0), "#a1dab4");
        assert_eq!(class_color(Some(5.0), 0.0, 10.0), "#41b6c4");
        assert_eq!(class_color(Some(7.0), 0.0, 10.0), "#2c7fb8");
        assert_eq!(class_color(Some(8.0), 0.0, 10.0), "#253494");
        assert_eq!(class_color(Some(10.0), 0.0, 10.0), "#253494");
    }

    #[test]
    fn class_color_handles_missing_and_degenerate_range() {
        assert_eq!(class_color(None, 0.0, 10.0), MISSING_REGION_COLOR);
        // Equal min and max collapse every value into the first class.
        assert_eq!(class_color(Some(5.0), 5.0, 5.0), "#ffffcc");
    }

    #[test]
    fn ramp_color_hits_stops_exactly() {
        assert_eq!(ramp_color(&GREEN_RAMP, 0.0), "#ffffcc");
        assert_eq!(ramp_color(&GREEN_RAMP, 1.0), "#006837");
        // 0.25 lands exactly on the second of five stops.
        assert_eq!(ramp_color(&GREEN_RAMP, 0.25), "#c2e699");
        assert_eq!(ramp_color(&PLASMA_RAMP, 1.0), "#f0f921");
    }

    #[test]
    fn ramp_color_blends_between_stops() {
        // Halfway between black and white.
        assert_eq!(ramp_color(&["#000000", "#ffffff"], 0.5), "#808080");
        // Out-of-range fractions clamp to the ends.
        assert_eq!(ramp_color(&["#000000", "#ffffff"], -3.0), "#000000");
        assert_eq!(ramp_color(&["#000000", "#ffffff"], 7.0), "#ffffff");
    }

    #[test]
    fn plotly_colorscale_spaces_fractions_evenly() {
        let scale = plotly_colorscale(&PLASMA_RAMP);
        let pairs = scale.as_array().unwrap();
        assert_eq!(pairs.len(), 6);
        let first = pairs.first().unwrap().as_array().unwrap();
        let last = pairs.last().unwrap().as_array().unwrap();
        assert!(first.first().unwrap().as_f64().unwrap().abs() <= f64::EPSILON);
        assert_eq!(first.get(1).unwrap().as_str(), Some("#0d0887"));
        assert!((last.first().unwrap().as_f64().unwrap() - 1.0).abs() <= f64::EPSILON);
        assert_eq!(last.get(1).unwrap().as_str(), Some("#f0f921"));
    }
}
