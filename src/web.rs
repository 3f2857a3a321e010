//! Browser Dashboard
//!
//! Single-page axum front end over the same pipeline: an embedded
//! form page, a JSON analyze endpoint, and a health probe. The guard
//! is constructed once at startup and shared read-only across
//! requests, so no locking is needed.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::{Guard, RunOptions};
use crate::types::{Analysis, Severity};

/// Application state shared across handlers.
pub struct AppState {
    pub guard: Guard,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub message: String,
}

/// Analysis annotated with the score and severity band, so the page
/// renders bands straight from the server and never recomputes
/// thresholds.
#[derive(Debug, Serialize)]
pub struct AnalysisView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

impl AnalysisView {
    pub fn new(analysis: Analysis) -> Self {
        Self {
            risk_score: analysis.risk_score(),
            severity: analysis.risk_severity(),
            analysis,
        }
    }
}

/// Run the dashboard server. Binds to localhost only.
pub async fn run(state: AppState, port: u16) -> Result<()> {
    let state = Arc::new(state);

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/api/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../assets/dashboard.html"))
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisView>, (StatusCode, String)> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "message must not be empty".to_string(),
        ));
    }

    info!("  Analyzing message ({} chars)", message.chars().count());

    // A completion fault must not take the server down; it maps to a
    // gateway error for this request only.
    let analysis = state
        .guard
        .run(message, &RunOptions::default())
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("{e:#}")))?;

    Ok(Json(AnalysisView::new(analysis)))
}
