use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use matchvision_models::GatewayError;
use serde_json::json;

// Every gateway failure leaves the server as {"error": "..."}
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
