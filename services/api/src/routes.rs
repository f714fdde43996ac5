use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Extension, Json};
use chrono::Utc;
use jobs_intel::dashboard::render::{render_ticker, skeletons, DEFAULT_SKELETON_CLASS};
use jobs_intel::dashboard::sanitize::escape_html;
use jobs_intel::dashboard::JobsQuery;
use jobs_intel::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::controller::{job_cards, load_view, news_cards, ViewChange};
use crate::infra::{is_truthy, AppState, DashboardState, ForceParams, JobsParams};

const MAX_SKELETONS: usize = 50;

#[derive(Debug, Serialize)]
pub(crate) struct ViewResponse {
    #[serde(flatten)]
    pub(crate) change: ViewChange,
    pub(crate) html: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SkeletonParams {
    #[serde(default)]
    pub(crate) count: Option<usize>,
    #[serde(default)]
    pub(crate) class: Option<String>,
}

pub(crate) fn with_dashboard_routes(state: DashboardState) -> axum::Router {
    axum::Router::new()
        .route("/views/:route", get(view_endpoint))
        .route("/fragments/jobs", get(jobs_fragment_endpoint))
        .route("/fragments/news", get(news_fragment_endpoint))
        .route("/fragments/ticker", get(ticker_fragment_endpoint))
        .route("/fragments/skeletons", get(skeletons_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "ts": Utc::now().to_rfc3339() }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Navigates the shared router and returns the activation plus the view's
/// markup. Feed failures are rendered inline rather than surfaced.
pub(crate) async fn view_endpoint(
    State(state): State<DashboardState>,
    Path(route): Path<String>,
    Query(params): Query<JobsParams>,
) -> Json<ViewResponse> {
    let change = state.shell().show(&route);
    let query = JobsQuery::from(params);
    let html = load_view(&state.client, change.route, &query).await;
    Json(ViewResponse { change, html })
}

pub(crate) async fn jobs_fragment_endpoint(
    State(state): State<DashboardState>,
    Query(params): Query<JobsParams>,
) -> Result<Html<String>, AppError> {
    let query = JobsQuery::from(params);
    let payload = state.client.fetch_jobs(&query).await?;
    Ok(Html(job_cards(&payload.jobs, Utc::now())))
}

pub(crate) async fn news_fragment_endpoint(
    State(state): State<DashboardState>,
    Query(params): Query<ForceParams>,
) -> Result<Html<String>, AppError> {
    let payload = state
        .client
        .fetch_news(is_truthy(params.force.as_deref()))
        .await?;
    Ok(Html(news_cards(&payload.news, Utc::now())))
}

pub(crate) async fn ticker_fragment_endpoint(
    State(state): State<DashboardState>,
) -> Result<Html<String>, AppError> {
    let payload = state.client.fetch_news(false).await?;
    Ok(Html(render_ticker(&payload.news)))
}

pub(crate) async fn skeletons_endpoint(Query(params): Query<SkeletonParams>) -> Html<String> {
    let count = params.count.unwrap_or(1).min(MAX_SKELETONS);
    let class = params
        .class
        .filter(|class| !class.trim().is_empty())
        .map(|class| escape_html(&class))
        .unwrap_or_else(|| DEFAULT_SKELETON_CLASS.to_string());
    Html(skeletons(count, &class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DashboardShell;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use jobs_intel::dashboard::DataClient;
    use tower::ServiceExt;

    // Nothing listens on the discard port, so every backend call fails fast.
    fn offline_app(initial: Option<&str>) -> axum::Router {
        let client = DataClient::new("http://127.0.0.1:9").expect("client builds");
        let (shell, _) = DashboardShell::start(initial);
        with_dashboard_routes(DashboardState::new(client, shell))
    }

    async fn get_body(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_body(offline_app(None), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""status":"ok""#));
    }

    #[tokio::test]
    async fn chart_views_render_without_backend() {
        let (status, body) = get_body(offline_app(None), "/views/trends").await;
        assert_eq!(status, StatusCode::OK);

        let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(payload["route"], "trends");
        assert_eq!(payload["activations"][0]["entered"], true);
        assert!(payload["html"]
            .as_str()
            .is_some_and(|html| html.contains("chart-salary")));
    }

    #[tokio::test]
    async fn unknown_view_falls_back_to_dashboard() {
        let (status, body) = get_body(offline_app(Some("jobs")), "/views/careers").await;
        assert_eq!(status, StatusCode::OK);

        let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(payload["route"], "dashboard");
        assert!(payload["html"]
            .as_str()
            .is_some_and(|html| html.contains("Unable to load jobs right now.")));
    }

    #[tokio::test]
    async fn fragment_endpoints_surface_backend_failures() {
        let (status, body) = get_body(offline_app(None), "/fragments/jobs?source=remotive").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Jobs API"));
    }

    #[tokio::test]
    async fn skeletons_are_capped_and_escaped() {
        let (_, body) = get_body(
            offline_app(None),
            "/fragments/skeletons?count=500&class=%22row%22",
        )
        .await;
        assert_eq!(body.matches("<div").count(), MAX_SKELETONS);
        assert!(body.contains("skeleton &quot;row&quot;"));
    }
}
