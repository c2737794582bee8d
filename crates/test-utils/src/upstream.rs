//! A fake upstream metrics service.
//!
//! Serves `GET /province/:region/:kind` from an in-memory table and records
//! every request path, so tests can assert on both what was returned and
//! what was asked for.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

/// What the fake returns for one (region, kind) pair.
#[derive(Debug, Clone)]
pub enum UpstreamReply {
    Json(Value),
    /// A body that is not JSON, served with status 200
    Garbage(String),
    /// An empty body with the given status
    Status(u16),
}

#[derive(Default)]
struct FakeState {
    replies: Mutex<HashMap<(String, String), UpstreamReply>>,
    requests: Mutex<Vec<String>>,
}

/// Handle to a running fake upstream.
#[derive(Clone)]
pub struct FakeUpstream {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeUpstream {
    /// Base URL to configure the fetcher with.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Set the reply for `GET /province/<region>/<kind>`.
    pub fn set_reply(&self, region: &str, kind: &str, reply: UpstreamReply) {
        self.state
            .replies
            .lock()
            .expect("fake upstream lock poisoned")
            .insert((region.to_string(), kind.to_string()), reply);
    }

    /// Shorthand for a JSON reply.
    pub fn set_json(&self, region: &str, kind: &str, body: Value) {
        self.set_reply(region, kind, UpstreamReply::Json(body));
    }

    /// Request paths received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .expect("fake upstream lock poisoned")
            .clone()
    }
}

async fn province_handler(
    State(state): State<Arc<FakeState>>,
    Path((region, kind)): Path<(String, String)>,
) -> Response {
    state
        .requests
        .lock()
        .expect("fake upstream lock poisoned")
        .push(format!("/province/{}/{}", region, kind));

    let reply = state
        .replies
        .lock()
        .expect("fake upstream lock poisoned")
        .get(&(region, kind))
        .cloned();

    match reply {
        Some(UpstreamReply::Json(body)) => Json(body).into_response(),
        Some(UpstreamReply::Garbage(body)) => (StatusCode::OK, body).into_response(),
        Some(UpstreamReply::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Bind a fake upstream to an ephemeral localhost port and serve it in the
/// background for the rest of the test.
pub async fn spawn_fake_upstream() -> FakeUpstream {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/province/:region/:kind", get(province_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Fake upstream has no local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake upstream crashed");
    });

    FakeUpstream { addr, state }
}
