//! Static serving of the public directory.
//!
//! Snapshot files are requested without their `.json` extension, so a miss
//! on the exact path is retried once with the extension appended.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Request},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::state::AppState;

const FALLBACK_EXTENSION: &str = ".json";

/// Fallback handler for every path without a dedicated route.
pub async fn static_handler(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
) -> Response {
    let (parts, _body) = request.into_parts();
    let serve_dir = ServeDir::new(&state.config.public_dir);

    let exact = rebuild(&parts.method, parts.uri.clone(), &parts.headers);
    let response = serve(serve_dir.clone(), exact).await;
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    let Some(with_extension) = with_extension(&parts.uri) else {
        return response;
    };
    debug!(uri = %with_extension, "Retrying static lookup with extension");
    let retry = rebuild(&parts.method, with_extension, &parts.headers);
    let response = serve(serve_dir, retry).await;
    if response.status() == StatusCode::NOT_FOUND {
        return StatusCode::NOT_FOUND.into_response();
    }
    response
}

/// `uri` with `.json` appended to its path, unless the last segment already
/// has an extension or the path names a directory.
fn with_extension(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || last.contains('.') {
        return None;
    }
    format!("{}{}", path, FALLBACK_EXTENSION).parse().ok()
}

fn rebuild(method: &Method, uri: Uri, headers: &HeaderMap) -> Request {
    let mut request = Request::new(Body::empty());
    *request.method_mut() = method.clone();
    *request.uri_mut() = uri;
    *request.headers_mut() = headers.clone();
    request
}

async fn serve(serve_dir: ServeDir, request: Request) -> Response {
    match serve_dir.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_appended_to_bare_segment() {
        let uri: Uri = "/v6/details/daily/DE".parse().unwrap();
        assert_eq!(
            with_extension(&uri).unwrap().path(),
            "/v6/details/daily/DE.json"
        );
    }

    #[test]
    fn test_no_extension_for_dotted_or_directory_paths() {
        let dotted: Uri = "/v6/details/daily/DE.json".parse().unwrap();
        assert!(with_extension(&dotted).is_none());

        let dir: Uri = "/v6/details/".parse().unwrap();
        assert!(with_extension(&dir).is_none());
    }
}
