//! Integration tests for the dashboard API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use yieldscope_data::{Dataset, read_csv};
use yieldscope_figures::WorldGeometry;
use yieldscope_types::YearUpdate;
use yieldscope_web::router::build_router;
use yieldscope_web::state::AppState;

const SAMPLE_CSV: &str = "\
crop,region,year,yield_t_ha,yield_hg_ha,rainfall_mm,avg_temp_c,pesticide_t
Wheat,France,2010,6.0,60000,820.0,10.9,90.0
Wheat,France,2011,6.4,64000,845.0,11.1,92.5
Wheat,France,2012,6.6,66000,867.0,11.2,95.5
Wheat,India,2010,2.4,24000,1083.0,24.2,60.0
Wheat,India,2012,2.6,26000,1104.0,24.4,62.0
Maize,Brazil,2010,1.9,19000,1761.0,24.9,120.1
Maize,Brazil,2011,2.1,21000,1710.0,25.0,118.0
Maize,Brazil,2012,2.3,23000,1698.0,25.1,121.4
";

const SAMPLE_WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "France"},
     "geometry": {"type": "Polygon", "coordinates": [[[0.0, 44.0], [4.0, 44.0], [4.0, 48.0], [0.0, 48.0], [0.0, 44.0]]]}},
    {"type": "Feature", "properties": {"name": "India"},
     "geometry": {"type": "Polygon", "coordinates": [[[72.0, 10.0], [80.0, 10.0], [80.0, 22.0], [72.0, 22.0], [72.0, 10.0]]]}},
    {"type": "Feature", "properties": {"name": "Brazil"},
     "geometry": {"type": "Polygon", "coordinates": [[[-60.0, -20.0], [-45.0, -20.0], [-45.0, -5.0], [-60.0, -5.0], [-60.0, -20.0]]]}}
  ]
}"#;

fn make_test_state() -> Arc<AppState> {
    let report = read_csv(SAMPLE_CSV.as_bytes(), &[]).unwrap();
    let dataset = Dataset::new(report).unwrap();
    let world = WorldGeometry::parse(SAMPLE_WORLD).unwrap();
    Arc::new(AppState::new(dataset, world, 250).unwrap())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_dashboard_page_returns_html() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Yieldscope"));
    assert!(html.contains("Maize"));
}

#[tokio::test]
async fn test_timeline_page_returns_html() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/timeline").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("const PERIOD_MS = 250"));
    assert!(html.contains("Pause Timeline"));
}

#[tokio::test]
async fn test_get_meta() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/meta").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["crops"], serde_json::json!(["Maize", "Wheat"]));
    assert_eq!(
        json["regions"],
        serde_json::json!(["Brazil", "France", "India"])
    );
    assert_eq!(json["year_min"], 2010);
    assert_eq!(json["year_max"], 2012);
    assert_eq!(json["tick_period_ms"], 250);
    assert_eq!(json["metrics"][0], "yield_t_ha");
}

#[tokio::test]
async fn test_get_summary_unfiltered() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/summary").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 8);
    assert_eq!(json["cards"]["average_yield"], 3.79);
    assert_eq!(json["cards"]["top_crop"], "Wheat");
    assert_eq!(json["cards"]["wettest_year"], 2010);
}

#[tokio::test]
async fn test_get_summary_with_no_matches() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/summary?crop=Cassava")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
    assert!(json["cards"]["average_yield"].is_null());
    assert!(json["cards"]["top_crop"].is_null());
}

#[tokio::test]
async fn test_figure_yield_over_time_filters_by_crop() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/yield-over-time?crop=Wheat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let traces = json["data"].as_array().unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["name"], "Wheat");
    assert_eq!(traces[0]["x"].as_array().unwrap().len(), 5);
    assert_eq!(json["layout"]["title"]["text"], "Crop Yield Over Time");
}

#[tokio::test]
async fn test_figure_yield_over_time_bar_kind() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/yield-over-time?chart=bar&theme=dark")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"][0]["type"], "bar");
    assert_eq!(json["layout"]["barmode"], "group");
    assert_eq!(json["layout"]["paper_bgcolor"], "#111111");
}

#[tokio::test]
async fn test_figure_correlation_pair() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/correlation")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["rainfall"]["data"].is_array());
    assert!(json["pesticide"]["data"].is_array());
    assert_eq!(json["rainfall"]["layout"]["title"]["text"], "Rainfall vs Yield");
}

#[tokio::test]
async fn test_figure_regional_defaults_to_latest_year() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/regional")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["layout"]["title"]["text"], "Regional Yield in 2012");
}

#[tokio::test]
async fn test_figure_analysis_bundle() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/analysis")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["outlier_count"], 0);
    assert!(json["figures"]["correlation"]["data"].is_array());
    assert!(json["figures"]["yield_by_crop"]["data"].is_array());
    assert!(json["figures"]["yield_by_region"]["data"].is_array());
    assert!(json["figures"]["yearly_trend"]["data"].is_array());
    assert_eq!(json["yearly_table"].as_array().unwrap().len(), 3);
    assert_eq!(json["yearly_table"][0]["year"], 2010);
    assert!(json["regression_note"].is_string());
}

#[tokio::test]
async fn test_figure_choropleth_for_crop_and_year() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/choropleth?crop=Maize&year=2011")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["layout"]["title"]["text"], "Maize Yield in 2011");
    assert_eq!(json["data"][0]["locations"], serde_json::json!(["Brazil"]));
    assert_eq!(json["data"][0]["z"], serde_json::json!([2.1]));
}

#[tokio::test]
async fn test_map_regions_shades_known_countries() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/map/regions?metric=yield_t_ha&year=2012")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["properties"]["name"], "France");
    assert_eq!(features[0]["properties"]["value"], 6.6);
}

#[tokio::test]
async fn test_map_embed_returns_document() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/map/embed?metric=yield_t_ha&year=2012")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Global Crop Yield Visualizer"));
    assert!(html.contains("const REGIONS"));
}

#[tokio::test]
async fn test_export_csv_attachment() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/export?crop=Maize")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/csv"));
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("filtered_crop_data.csv"));

    let csv = body_to_string(response.into_body()).await;
    // Header plus three Maize rows.
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.lines().skip(1).all(|line| line.starts_with("Maize")));
}

#[tokio::test]
async fn test_bad_query_parameter_is_rejected() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/figures/yield-over-time?year_start=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_create_session_defaults() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router.oneshot(post_json("/api/sessions", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"]["selected_crop"], "Maize");
    assert_eq!(json["state"]["current_year"], 2010);
    assert_eq!(json["paused"], false);
    assert_eq!(json["button_label"], "Pause Timeline");
    assert_eq!(json["ticker_period_ms"], 250);
    assert!(json["id"].is_string());
}

#[tokio::test]
async fn test_create_session_with_crop() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(post_json("/api/sessions", r#"{"selected_crop": "Wheat"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"]["selected_crop"], "Wheat");
}

#[tokio::test]
async fn test_get_session_roundtrip() {
    let state = make_test_state();
    let router = build_router(state);

    let created = router
        .clone()
        .oneshot(post_json("/api/sessions", "{}"))
        .await
        .unwrap();
    let created = body_to_json(created.into_body()).await;
    let id = created["id"].as_str().unwrap();

    let path = format!("/api/sessions/{id}");
    let response = router
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], created["id"]);
    assert_eq!(json["state"], created["state"]);
}

#[tokio::test]
async fn test_get_session_not_found() {
    let state = make_test_state();
    let router = build_router(state);

    let fake_id = uuid::Uuid::now_v7();
    let path = format!("/api/sessions/{fake_id}");
    let response = router
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_session_invalid_id() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/sessions/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tick_commands_advance_and_wrap() {
    let state = make_test_state();
    let router = build_router(state);

    let created = router
        .clone()
        .oneshot(post_json("/api/sessions", r#"{"selected_crop": "Wheat"}"#))
        .await
        .unwrap();
    let created = body_to_json(created.into_body()).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/sessions/{id}/commands");

    // Wheat years are [2010, 2011, 2012]; the session starts at 2010.
    let mut years = Vec::new();
    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(post_json(&path, "\"tick\""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        years.push(json["outcome"]["advanced"]["year"].clone());
    }

    assert_eq!(years, vec![2011, 2012, 2010]);
}

#[tokio::test]
async fn test_set_year_and_toggle_playback() {
    let state = make_test_state();
    let router = build_router(state);

    let created = router
        .clone()
        .oneshot(post_json("/api/sessions", "{}"))
        .await
        .unwrap();
    let created = body_to_json(created.into_body()).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/sessions/{id}/commands");

    let response = router
        .clone()
        .oneshot(post_json(&path, r#"{"set_year": {"year": 2011}}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["outcome"]["year_set"]["year"], 2011);
    assert_eq!(json["state"]["current_year"], 2011);

    let response = router
        .clone()
        .oneshot(post_json(&path, "\"toggle_playback\""))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["outcome"]["playback"]["ticker_disabled"], true);
    assert_eq!(json["paused"], true);
    assert_eq!(json["button_label"], "Play Timeline");

    let response = router
        .oneshot(post_json(&path, "\"toggle_playback\""))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["paused"], false);
    assert_eq!(json["button_label"], "Pause Timeline");
}

#[tokio::test]
async fn test_select_crop_command_switches_sequence() {
    let state = make_test_state();
    let router = build_router(state);

    let created = router
        .clone()
        .oneshot(post_json("/api/sessions", r#"{"selected_crop": "Wheat"}"#))
        .await
        .unwrap();
    let created = body_to_json(created.into_body()).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/sessions/{id}/commands");

    let response = router
        .oneshot(post_json(&path, r#"{"select_crop": {"crop": "Maize"}}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"]["selected_crop"], "Maize");
    // 2010 is in Maize's sequence too, so the cycle advances to 2011.
    assert_eq!(json["outcome"]["advanced"]["year"], 2011);
}

#[tokio::test]
async fn test_command_on_unknown_session() {
    let state = make_test_state();
    let router = build_router(state);

    let fake_id = uuid::Uuid::now_v7();
    let path = format!("/api/sessions/{fake_id}/commands");
    let response = router.oneshot(post_json(&path, "\"tick\"")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_broadcast_channel() {
    let state = make_test_state();
    let mut rx = state.subscribe();

    let update = YearUpdate {
        session_id: yieldscope_types::SessionId::new(),
        crop: String::from("Wheat"),
        year: 2011,
    };

    let receivers = state.broadcast(&update);
    assert_eq!(receivers, 1);

    let received = rx.recv().await.unwrap();
    assert_eq!(received, update);
}

#[tokio::test]
async fn test_tick_command_broadcasts_year_update() {
    let state = make_test_state();
    let mut rx = state.subscribe();
    let router = build_router(Arc::clone(&state));

    let created = router
        .clone()
        .oneshot(post_json("/api/sessions", r#"{"selected_crop": "Wheat"}"#))
        .await
        .unwrap();
    let created = body_to_json(created.into_body()).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let path = format!("/api/sessions/{id}/commands");
    let response = router.oneshot(post_json(&path, "\"tick\"")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let update = rx.recv().await.unwrap();
    assert_eq!(update.session_id.to_string(), id);
    assert_eq!(update.crop, "Wheat");
    assert_eq!(update.year, 2011);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
