//! Server-rendered dashboard pages.
//!
//! Two pages share one template engine: the explorer dashboard at `/`
//! (filters, figures, analysis panel, map) and the timeline dashboard at
//! `/timeline` (animated choropleth driven by a session). Both pages are
//! rendered once per load with the dataset metadata baked in; everything
//! dynamic afterwards goes through the JSON API.

use minijinja::Environment;
use serde_json::json;
use yieldscope_types::DashMeta;

use crate::error::ApiError;

const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html.j2");
const TIMELINE_TEMPLATE: &str = include_str!("../templates/timeline.html.j2");

/// Renders the two dashboard pages.
pub struct PageEngine {
    env: Environment<'static>,
}

impl PageEngine {
    /// Create an engine with both page templates loaded.
    pub fn new() -> Result<Self, ApiError> {
        let mut env = Environment::new();
        env.add_template("dashboard.html", DASHBOARD_TEMPLATE)
            .map_err(|e| ApiError::Internal(format!("failed to add dashboard template: {e}")))?;
        env.add_template("timeline.html", TIMELINE_TEMPLATE)
            .map_err(|e| ApiError::Internal(format!("failed to add timeline template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the explorer dashboard page.
    pub fn render_dashboard(&self, meta: &DashMeta) -> Result<String, ApiError> {
        let metrics: Vec<serde_json::Value> = meta
            .metrics
            .iter()
            .map(|metric| json!({"value": metric, "label": metric.label()}))
            .collect();
        let context = json!({
            "crops": meta.crops,
            "regions": meta.regions,
            "metrics": metrics,
            "year_min": meta.year_min,
            "year_max": meta.year_max,
        });
        self.render("dashboard.html", &context)
    }

    /// Render the timeline dashboard page.
    pub fn render_timeline(&self, meta: &DashMeta) -> Result<String, ApiError> {
        let context = json!({
            "crops": meta.crops,
            "year_min": meta.year_min,
            "year_max": meta.year_max,
            "tick_period_ms": meta.tick_period_ms,
        });
        self.render("timeline.html", &context)
    }

    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, ApiError> {
        self.env
            .get_template(name)
            .map_err(|e| ApiError::Internal(format!("missing template {name}: {e}")))?
            .render(context)
            .map_err(|e| ApiError::Internal(format!("failed to render {name}: {e}")))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use yieldscope_types::Metric;

    fn sample_meta() -> DashMeta {
        DashMeta {
            crops: vec!["Maize".to_owned(), "Rice, paddy".to_owned()],
            regions: vec!["Brazil".to_owned(), "India".to_owned()],
            metrics: Metric::ALL.to_vec(),
            year_min: 1990,
            year_max: 2013,
            tick_period_ms: 1000,
        }
    }

    #[test]
    fn dashboard_page_carries_the_filter_options() {
        let engine = PageEngine::new().unwrap();
        let html = engine.render_dashboard(&sample_meta()).unwrap();
        assert!(html.contains("Rice, paddy"));
        assert!(html.contains("Brazil"));
        assert!(html.contains("Yield (t/ha)"));
        assert!(html.contains("/api/figures/yield-over-time"));
        assert!(html.contains("/api/export"));
    }

    #[test]
    fn timeline_page_bakes_in_the_tick_period() {
        let engine = PageEngine::new().unwrap();
        let html = engine.render_timeline(&sample_meta()).unwrap();
        assert!(html.contains("const PERIOD_MS = 1000"));
        assert!(html.contains("/api/sessions"));
        assert!(html.contains("/ws/sessions/"));
        assert!(html.contains("min=\"1990\""));
        assert!(html.contains("max=\"2013\""));
    }

    #[test]
    fn crop_names_with_commas_survive_both_pages() {
        let engine = PageEngine::new().unwrap();
        let timeline = engine.render_timeline(&sample_meta()).unwrap();
        assert!(timeline.contains("Rice, paddy"));
    }
}
