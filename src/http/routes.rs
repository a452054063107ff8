use crate::application::history::DEFAULT_HISTORY_LIMIT;
use crate::domain::error::DomainError;
use crate::MandiPrice;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SERVICE_NAME: &str = "mandiprice";

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

pub fn router(app: Arc<MandiPrice>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(health))
        .route("/api/market-prices", get(market_prices))
        .route("/api/market-prices/history", get(market_price_history))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn serve(app: Arc<MandiPrice>, addr: SocketAddr) -> Result<(), DomainError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DomainError::Network(format!("bind {addr}: {e}")))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(app))
        .await
        .map_err(|e| DomainError::Network(e.to_string()))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": SERVICE_NAME,
    }))
}

async fn market_prices(State(app): State<Arc<MandiPrice>>) -> Response {
    let today = Utc::now().date_naive();
    match tokio::task::spawn_blocking(move || app.latest_prices(today)).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "market prices handler failed");
            internal_error("Failed to fetch market prices")
        }
    }
}

async fn market_price_history(
    State(app): State<Arc<MandiPrice>>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match tokio::task::spawn_blocking(move || app.price_history(limit)).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "market price history handler failed");
            internal_error("Failed to fetch market price history")
        }
    }
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": "Internal server error",
            "message": message,
        })),
    )
        .into_response()
}
