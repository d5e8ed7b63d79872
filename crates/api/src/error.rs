use axum::Json;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing parameters")]
    MissingParameters,
    #[error("Invalid RGB format. Use hex format.")]
    InvalidColor,
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("Pixel does not exist")]
    PixelNotFound { x: i64, y: i64 },
    #[error("Method {0} Not Allowed")]
    MethodNotAllowed(Method),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameters
            | ApiError::InvalidColor
            | ApiError::MalformedBody(_)
            | ApiError::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            ApiError::PixelNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::MethodNotAllowed(_) => (
                status,
                [(header::ALLOW, ALLOWED_METHODS)],
                self.to_string(),
            )
                .into_response(),
            ApiError::PixelNotFound { x, y } => (
                status,
                Json(json!({ "error": self.to_string(), "pixel": format!("{x} {y}") })),
            )
                .into_response(),
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}
