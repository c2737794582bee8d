//! Router assembly.

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::handlers::{details_handler, health_handler, metrics_handler};
use crate::state::AppState;
use crate::static_files::static_handler;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v6/details/:aggregate/:zone_id", get(details_handler))
        .fallback(static_handler)
        .layer(middleware::from_fn(strip_query))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Redirect any request carrying a query string to its bare path.
async fn strip_query(request: Request, next: Next) -> Response {
    match request.uri().query() {
        Some(query) if !query.is_empty() => {
            let path = request.uri().path();
            debug!(path = %path, query = %query, "Stripping query string");
            Redirect::temporary(path).into_response()
        }
        _ => next.run(request).await,
    }
}
