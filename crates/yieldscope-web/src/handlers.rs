//! HTTP request handlers for the dashboard API.
//!
//! Page handlers render the two dashboards; the `/api` handlers serve the
//! metadata, summary cards, plotly figure payloads, map documents, and the
//! CSV export. Figure and map handlers all accept the same query grammar
//! (see [`crate::filters`]) so the page can reuse one parameter builder.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use serde_json::json;
use yieldscope_figures::{charts, leaflet, panel};
use yieldscope_stats::{Analysis, summary_cards};
use yieldscope_types::{DashMeta, Metric};

use crate::error::ApiError;
use crate::filters::parse_query;
use crate::state::AppState;

/// Raw query pairs, extracted without a struct so repeated keys survive.
type RawQuery = Query<Vec<(String, String)>>;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// `GET /` - the explorer dashboard page.
pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let meta = build_meta(&state);
    state.pages.render_dashboard(&meta).map(Html)
}

/// `GET /timeline` - the animated timeline page.
pub async fn timeline_page(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let meta = build_meta(&state);
    state.pages.render_timeline(&meta).map(Html)
}

// ---------------------------------------------------------------------------
// GET /api/meta
// ---------------------------------------------------------------------------

/// Static dashboard metadata: option lists, year range, tick period.
pub async fn get_meta(State(state): State<Arc<AppState>>) -> Json<DashMeta> {
    Json(build_meta(&state))
}

// ---------------------------------------------------------------------------
// GET /api/summary
// ---------------------------------------------------------------------------

/// Summary cards plus the matched row count for the active filters.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let cards = summary_cards(&rows);
    Ok(Json(json!({
        "count": rows.len(),
        "cards": cards,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/figures/yield-over-time
// ---------------------------------------------------------------------------

/// Yield-over-time figure, one trace per crop, as line or grouped bar.
pub async fn figure_yield_over_time(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    Ok(Json(charts::yield_over_time(&rows, query.chart, query.theme)))
}

// ---------------------------------------------------------------------------
// GET /api/figures/correlation
// ---------------------------------------------------------------------------

/// The rainfall and pesticide scatter pair for the correlation panel.
pub async fn figure_correlation(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    Ok(Json(json!({
        "rainfall": charts::rainfall_yield_scatter(&rows, query.theme),
        "pesticide": charts::pesticide_yield_scatter(&rows, query.theme),
    })))
}

// ---------------------------------------------------------------------------
// GET /api/figures/regional
// ---------------------------------------------------------------------------

/// Per-region yield bars for a single year.
///
/// The year defaults to the filter's upper bound, then to the dataset
/// maximum, so an unqualified request shows the latest harvest.
pub async fn figure_regional(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let year = display_year(&state, query.year, query.filter.year_end);
    Ok(Json(charts::regional_bar(&rows, year, query.theme)))
}

// ---------------------------------------------------------------------------
// GET /api/figures/analysis
// ---------------------------------------------------------------------------

/// The full analysis panel for the active filters.
pub async fn figure_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let analysis = Analysis::from_rows(&rows);
    Ok(Json(panel::analysis_panel(&analysis)))
}

// ---------------------------------------------------------------------------
// GET /api/figures/choropleth
// ---------------------------------------------------------------------------

/// Country-shaded yield choropleth for one crop and year.
///
/// The crop defaults to the first selected crop, then to the first crop in
/// the dataset; the year defaults like the regional figure.
pub async fn figure_choropleth(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let crop = query
        .filter
        .crops
        .first()
        .or_else(|| state.dataset.crops().first())
        .cloned()
        .unwrap_or_default();
    let year = display_year(&state, query.year, query.filter.year_end);
    Ok(Json(charts::choropleth(&rows, &crop, year, query.theme)))
}

// ---------------------------------------------------------------------------
// GET /api/map/regions
// ---------------------------------------------------------------------------

/// Styled region `GeoJSON` for the client-side Leaflet layer.
pub async fn map_regions(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let year = display_year(&state, query.year, query.filter.year_end);
    Ok(Json(leaflet::region_layer(
        &state.world,
        &rows,
        query.metric,
        year,
    )))
}

// ---------------------------------------------------------------------------
// GET /api/map/embed
// ---------------------------------------------------------------------------

/// Self-contained Leaflet document for the dashboard's map iframe.
pub async fn map_embed(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let rows = state.dataset.filtered(&query.filter);
    let year = display_year(&state, query.year, query.filter.year_end);
    Ok(Html(state.map_renderer.render(
        &state.world,
        &rows,
        query.metric,
        year,
    )))
}

// ---------------------------------------------------------------------------
// GET /api/export
// ---------------------------------------------------------------------------

/// The filtered observations as a CSV attachment.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(params): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&params)?;
    let csv = state.dataset.to_csv(&query.filter)?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"filtered_crop_data.csv\"",
        ),
    ];
    Ok((headers, csv))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assemble the static dashboard metadata from the loaded dataset.
pub(crate) fn build_meta(state: &AppState) -> DashMeta {
    DashMeta {
        crops: state.dataset.crops().to_vec(),
        regions: state.dataset.regions().to_vec(),
        metrics: Metric::ALL.to_vec(),
        year_min: state.dataset.year_min(),
        year_max: state.dataset.year_max(),
        tick_period_ms: state.tick_period_ms,
    }
}

/// Resolve the single display year for year-scoped figures.
fn display_year(state: &AppState, year: Option<i32>, year_end: Option<i32>) -> i32 {
    year.or(year_end).unwrap_or_else(|| state.dataset.year_max())
}
