#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use mercadolivre_connect::{ClientConfig, Credentials, MarketplaceClient};

pub const ACCESS_TOKEN: &str = "APP_USR-1234-mock";
pub const REFRESH_TOKEN: &str = "TG-valid";
pub const USER_AGENT: &str = "mercadolivre-connect-tests";

/// One GET seen by the mock marketplace.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<String, (StatusCode, Value)>,
    paged: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    token_forms: Vec<HashMap<String, String>>,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<Inner>>);

/// In-process stand-in for the marketplace API, bound to an ephemeral port.
pub struct MockMarketplace {
    pub base_url: String,
    state: MockState,
}

impl MockMarketplace {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/oauth/token", post(token))
            .fallback(resource)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("failed to get addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            base_url: format!("http://{}/", addr),
            state,
        }
    }

    /// Answers GETs on `path` with a fixed status and body.
    pub fn respond(&self, path: &str, status: StatusCode, body: Value) {
        let mut inner = self.state.0.lock().unwrap();
        inner.responses.insert(path.to_string(), (status, body));
    }

    /// Serves `items` on `path` honouring `limit` and `offset`.
    pub fn paged(&self, path: &str, items: Vec<Value>) {
        let mut inner = self.state.0.lock().unwrap();
        inner.paged.insert(path.to_string(), items);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.0.lock().unwrap().requests.clone()
    }

    pub fn token_forms(&self) -> Vec<HashMap<String, String>> {
        self.state.0.lock().unwrap().token_forms.clone()
    }

    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default().with_base_url(&self.base_url);
        config.user_agent = USER_AGENT.to_string();
        config
    }

    pub async fn client(&self) -> MarketplaceClient {
        MarketplaceClient::connect_with(self.config(), &credentials())
            .await
            .expect("mock token exchange should succeed")
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("4242", "app-secret", REFRESH_TOKEN)
}

async fn token(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let valid = form.get("grant_type").map(String::as_str) == Some("refresh_token")
        && form.get("refresh_token").map(String::as_str) == Some(REFRESH_TOKEN);
    state.0.lock().unwrap().token_forms.push(form);

    if valid {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 21600,
                "scope": "offline_access read write",
                "user_id": 4242,
                "refresh_token": "TG-rotated"
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "invalid_grant",
                "error": "invalid_grant",
                "status": 400,
                "cause": []
            })),
        )
    }
}

async fn resource(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let path = uri.path().to_string();

    let mut inner = state.0.lock().unwrap();
    inner.requests.push(RecordedRequest {
        path: path.clone(),
        query: query.clone(),
        authorization: header("authorization"),
        user_agent: header("user-agent"),
    });

    if let Some(items) = inner.paged.get(&path) {
        let number = |key: &str, default: usize| {
            query
                .get(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        let limit = number("limit", 50);
        let offset = number("offset", 0);
        let results: Vec<Value> = items.iter().skip(offset).take(limit).cloned().collect();
        return (
            StatusCode::OK,
            Json(json!({
                "site_id": "MLB",
                "paging": { "total": items.len(), "offset": offset, "limit": limit },
                "results": results
            })),
        );
    }

    match inner.responses.get(&path) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "resource not found", "error": "not_found", "status": 404 })),
        ),
    }
}
