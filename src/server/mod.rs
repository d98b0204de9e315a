//! HTTP endpoint serving the merged price/indicator dataset.
//!
//! The merged CSV is read once at start-up and rendered to JSON a single time;
//! every request gets the same immutable body.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::context::RunContext;
use crate::error::AppError;
use crate::io::{Record, load_records};

pub const MERGED_HISTORY_ROUTE: &str = "/api/data/merged_oil_price_history";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    body: Bytes,
}

impl AppState {
    pub fn new(records: &[Record]) -> Result<Self, AppError> {
        let body = serde_json::to_vec(records)
            .map_err(|e| AppError::Server(format!("Failed to encode dataset as JSON: {e}")))?;
        Ok(Self { body: Bytes::from(body) })
    }
}

/// Router with the dataset route and CORS open to every origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(MERGED_HISTORY_ROUTE, get(merged_history_handler))
        .layer(cors)
        .with_state(state)
}

async fn merged_history_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], state.body.clone())
}

/// Load `dataset` and serve it on `addr` until the process exits.
pub async fn serve(dataset: &Path, addr: SocketAddr, ctx: &RunContext) -> Result<(), AppError> {
    let records = {
        let _stage = ctx.stage("serve");
        let records = load_records(dataset)?;
        info!(rows = records.len(), path = %dataset.display(), "Merged dataset loaded");
        records
    };
    let state = Arc::new(AppState::new(&records)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, route = MERGED_HISTORY_ROUTE, "Server listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const FIXTURE: &str = "\
Date,Price,GDP Growth (%),Country
2020-01-01,66.0,2.5,WLD
2020-01-02,67.25,,WLD
2020-01-03,68,2.5,WLD
";

    async fn spawn(records: Vec<Record>) -> SocketAddr {
        let state = Arc::new(AppState::new(&records).unwrap());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn serves_every_row_with_header_keys() {
        let records = crate::io::read_records_from(FIXTURE.as_bytes()).unwrap();
        let addr = spawn(records).await;

        let url = format!("http://{addr}{MERGED_HISTORY_ROUTE}");
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        for row in rows {
            let keys: Vec<&str> = row.as_object().unwrap().keys().map(|k| k.as_str()).collect();
            for key in ["Date", "Price", "GDP Growth (%)", "Country"] {
                assert!(keys.contains(&key), "missing {key}");
            }
        }
        assert_eq!(rows[0]["Date"], "2020-01-01");
        assert_eq!(rows[1]["GDP Growth (%)"], Value::Null);
        assert_eq!(rows[2]["Price"], 68);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let addr = spawn(Vec::new()).await;

        let resp = reqwest::Client::new()
            .get(format!("http://{addr}{MERGED_HISTORY_ROUTE}"))
            .header("Origin", "http://dashboard.example")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.text().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn missing_dataset_fails_start_up() {
        let dir = tempfile::tempdir().unwrap();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let err = serve(&dir.path().join("missing.csv"), addr, &RunContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
