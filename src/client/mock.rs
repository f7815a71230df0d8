//! In-process HTTP server that records requests and replays canned responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<(String, String), (u16, String)>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Default)]
pub struct MockServerBuilder {
    routes: HashMap<(String, String), (u16, String)>,
}

impl MockServerBuilder {
    /// Respond to `method path` with `status` and a JSON body.
    pub fn route(mut self, method: &str, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Respond with a raw, possibly non-JSON, body.
    pub fn route_raw(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub async fn start(self) -> MockServer {
        let state = MockState {
            routes: Arc::new(self.routes),
            requests: Arc::default(),
        };
        let app = Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        MockServer {
            base_url: format!("http://{}", addr),
            requests: state.requests,
        }
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            api_key: headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });

    let (status, body) = state
        .routes
        .get(&(method.to_string(), path))
        .cloned()
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
