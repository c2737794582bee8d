//! HTTP handlers for the mock server.
//!
//! - `GET /v6/details/:aggregate/:zone_id` - Enrich (CA zones) then serve or fall back
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Path, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info};

use enrichment::DETAILS_DIR;
use grid_common::{is_valid_segment, GridError, ZoneIdentifier};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v6/details/:aggregate/:zone_id
///
/// Qualifying zones are enriched before the existence check, so a freshly
/// enriched zone is always served from its own file. Any other zone without
/// a file is redirected to the default zone for the same aggregate.
pub async fn details_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((aggregate, zone_id)): Path<(String, String)>,
    request: Request,
) -> Result<Response, ApiError> {
    counter!("mockserver_requests_total").increment(1);

    if !is_valid_segment(&aggregate) {
        return Err(GridError::InvalidSegment {
            segment: aggregate,
            message: "aggregate must match [A-Za-z0-9_-]+".to_string(),
        }
        .into());
    }
    let zone_id = zone_id
        .strip_suffix(".json")
        .map(str::to_string)
        .unwrap_or(zone_id);
    let zone = ZoneIdentifier::new(zone_id)?;

    if state.pipeline.qualifies(&zone) {
        // Runs on its own task so a dropped connection cannot cancel a write
        // halfway through the cycle.
        let pipeline = state.pipeline.clone();
        let task_zone = zone.clone();
        let outcome = tokio::spawn(async move { pipeline.enrich(&task_zone).await })
            .await
            .map_err(|e| GridError::InternalError(format!("Enrichment task failed: {}", e)))??;
        if let Some(outcome) = outcome {
            debug!(zone = %zone, path = %outcome.path.display(), "Enrichment finished");
        }
    }

    let path = state.config.snapshot_path(&aggregate, &zone);
    if is_file(&path).await {
        return Ok(serve_file(&path, request).await);
    }

    let default_zone = &state.config.default_zone;
    if &zone == default_zone {
        debug!(path = %path.display(), "Default zone snapshot missing");
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    counter!("mockserver_fallback_redirects_total").increment(1);
    let location = format!("/{}/{}/{}", DETAILS_DIR, aggregate, default_zone);
    info!(zone = %zone, location = %location, "No snapshot for zone, redirecting to default");
    Ok(found(&location))
}

/// 302 redirect, the status static file servers use for moved documents.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub(crate) async fn is_file(path: &FsPath) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn serve_file(path: &FsPath, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// GET /health - Health check
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "mockserver",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics recorder not installed").into_response(),
    }
}
