//! Handlers for the transfer and health endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::transfer::TransferRequest;

/// Body of every `/send_eth` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEthResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
}

/// `POST /send_eth`
pub async fn send_eth(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> (StatusCode, Json<SendEthResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            // Rejection text can quote body fragments; log the status only.
            tracing::warn!(status = %rejection.status(), "Rejected malformed transfer request");
            return (StatusCode::BAD_REQUEST, Json(SendEthResponse { success: false }));
        }
    };

    let success = state.handler.handle(request).await;
    (StatusCode::OK, Json(SendEthResponse { success }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        network: state.network.label().to_string(),
    })
}
