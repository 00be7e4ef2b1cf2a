use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::processor::TickProcessor;
use crate::resample::Timeframe;

/// Build the query API router. CORS is permissive: the charting frontend is
/// served from a different origin during development.
pub fn router(processor: Arc<TickProcessor>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/stock/summary", get(summary))
        .route("/api/stock/timeseries/{timeframe}", get(timeseries))
        .route("/api/stock/orderbook", get(orderbook))
        .route("/api/stock/indicators", get(indicators))
        .layer(cors)
        .with_state(processor)
}

async fn summary(State(processor): State<Arc<TickProcessor>>) -> impl IntoResponse {
    Json(processor.get_summary().clone())
}

async fn timeseries(
    Path(timeframe): Path<String>,
    State(processor): State<Arc<TickProcessor>>,
) -> Response {
    match timeframe.parse::<Timeframe>() {
        Ok(tf) => Json(processor.get_timeseries_data(tf)).into_response(),
        Err(err) => {
            warn!(timeframe = %timeframe, "rejected timeseries request");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn orderbook(State(processor): State<Arc<TickProcessor>>) -> impl IntoResponse {
    Json(processor.get_orderbook_analysis())
}

async fn indicators(State(processor): State<Arc<TickProcessor>>) -> impl IntoResponse {
    Json(processor.get_technical_indicators())
}
