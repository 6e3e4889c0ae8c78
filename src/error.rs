use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

impl AppError {
    /// Errors a create/update/delete turns into a failure notification
    /// instead of an error page.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::InvalidField { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, template, error_message) = match self {
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "errors/500", "Database error occurred")
            }
            Self::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "errors/500", "Data processing error")
            }
            Self::NotFound(ref msg) => (StatusCode::NOT_FOUND, "errors/404", msg.as_str()),
            Self::BadRequest(ref msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "errors/400", "Malformed request")
            }
            Self::InvalidField { field, .. } => {
                tracing::warn!("Rejected value for {}", field);
                (StatusCode::BAD_REQUEST, "errors/400", "Invalid form value")
            }
        };

        let body = Json(json!({
            "template": template,
            "flashes": [],
            "data": {
                "error": error_message,
                "details": self.to_string(),
            },
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
