//! Query string parsing for the figure and map endpoints.
//!
//! Filter controls on the dashboard submit repeated keys (`?crop=Wheat&
//! crop=Maize&region=India`), which `serde_urlencoded` cannot decode into
//! a struct with `Vec` fields. The handlers therefore extract the raw
//! pairs with `Query<Vec<(String, String)>>` and feed them through
//! [`parse_query`].

use yieldscope_data::FilterSpec;
use yieldscope_types::{ChartKind, Metric, Theme};

use crate::error::ApiError;

/// Decoded query parameters for the figure and map endpoints.
///
/// Every field has a default, so an empty query string is valid and
/// selects the whole dataset with the standard presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureQuery {
    /// Row filter assembled from `crop`, `region`, `year_start`, `year_end`.
    pub filter: FilterSpec,
    /// Trace style for the yield-over-time figure.
    pub chart: ChartKind,
    /// Figure color theme.
    pub theme: Theme,
    /// Metric for the map endpoints.
    pub metric: Metric,
    /// Single-year selector for the regional and map figures.
    pub year: Option<i32>,
}

/// Parse raw query pairs into a [`FigureQuery`].
///
/// Repeated `crop` and `region` keys accumulate into the filter's
/// allow-lists. Unknown keys are ignored so the page's presentation-only
/// parameters pass through harmlessly.
///
/// # Errors
///
/// Returns [`ApiError::InvalidQuery`] when a recognized key carries a
/// value that does not parse.
pub fn parse_query(params: &[(String, String)]) -> Result<FigureQuery, ApiError> {
    let mut query = FigureQuery::default();
    for (key, value) in params {
        match key.as_str() {
            "crop" => query.filter.crops.push(value.clone()),
            "region" => query.filter.regions.push(value.clone()),
            "year_start" => query.filter.year_start = Some(parse_year(key, value)?),
            "year_end" => query.filter.year_end = Some(parse_year(key, value)?),
            "year" => query.year = Some(parse_year(key, value)?),
            "chart" => query.chart = parse_keyword(key, value)?,
            "theme" => query.theme = parse_keyword(key, value)?,
            "metric" => query.metric = parse_keyword(key, value)?,
            _ => {}
        }
    }
    Ok(query)
}

/// Parse a year value, mapping failures to [`ApiError::InvalidQuery`].
fn parse_year(key: &str, value: &str) -> Result<i32, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidQuery(format!("{key} must be an integer, got '{value}'")))
}

/// Parse an enum keyword through its serde representation.
fn parse_keyword<T>(key: &str, value: &str) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::String(value.to_owned()))
        .map_err(|_| ApiError::InvalidQuery(format!("unknown {key} '{value}'")))
}

// ===========================================================================
// Tests
// ===========================================================================
