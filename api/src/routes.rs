/// API route handlers for the VidGrab site.
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use vidgrab_shared::countdown::{countdown_until, Countdown};
use vidgrab_shared::errors::AggregateError;
use vidgrab_shared::notes::{format_stars, summarize_releases, ReleaseSummary};

use crate::AppState;

// ====== RESPONSE TYPES ======

#[derive(Serialize)]
pub struct StarsResponse {
    pub stars: u64,
    pub formatted: String,
}

#[derive(Serialize)]
pub struct ReleasesResponse {
    pub releases: Vec<ReleaseSummary>,
}

#[derive(Serialize)]
pub struct SiteStatusResponse {
    pub coming_soon: bool,
    pub launch_at: String,
    pub countdown: Countdown,
    pub repo_url: String,
}

/// Build the full router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/download-counts", get(download_counts))
        .route("/api/stars", get(stars))
        .route("/api/releases", get(releases))
        .route("/api/site", get(site_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cache_control(state: &AppState) -> String {
    format!("public, max-age={}", state.config.cache_max_age_secs)
}

// ====== HANDLERS ======

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/download-counts - Totals across all releases plus latest links
pub async fn download_counts(State(state): State<Arc<AppState>>) -> Response {
    match state.aggregator.download_counts().await {
        Ok(counts) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, cache_control(&state))],
            Json(counts),
        )
            .into_response(),
        Err(AggregateError::LatestUnavailable { status, detail }) => {
            warn!("Download counts unavailable: latest release returned {}", status);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to fetch latest release",
                    "status": status,
                    "detail": detail,
                })),
            )
                .into_response()
        }
        Err(AggregateError::Failed(reason)) => {
            error!("Download counts failed: {}", reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch download counts" })),
            )
                .into_response()
        }
    }
}

/// GET /api/stars - Repository star count for the GitHub button
pub async fn stars(State(state): State<Arc<AppState>>) -> Response {
    match state.source.repository().await {
        Ok(repo) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, cache_control(&state))],
            Json(StarsResponse {
                stars: repo.stargazers_count,
                formatted: format_stars(repo.stargazers_count),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to fetch GitHub stars: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "Failed to fetch GitHub stars" })),
            )
                .into_response()
        }
    }
}

/// GET /api/releases - Published releases with parsed notes for the changelog
pub async fn releases(State(state): State<Arc<AppState>>) -> Response {
    match state.source.list_releases(state.config.aggregator.page_size, 1).await {
        Ok(list) => {
            let releases = summarize_releases(&list);
            info!("Serving {} releases", releases.len());
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, cache_control(&state))],
                Json(ReleasesResponse { releases }),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Failed to fetch releases: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "Unable to load releases. Please check GitHub directly.",
                    "fallback_url": state.config.github.releases_url(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/site - Coming-soon flag and launch countdown
pub async fn site_status(State(state): State<Arc<AppState>>) -> Json<SiteStatusResponse> {
    let config = &state.config;
    Json(SiteStatusResponse {
        coming_soon: config.coming_soon,
        launch_at: config.launch_at.to_rfc3339(),
        countdown: countdown_until(config.launch_at, Utc::now()),
        repo_url: config.github.repo_url(),
    })
}
