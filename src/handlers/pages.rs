use axum::{extract::State, http::Uri, Json};
use serde_json::{json, Value};

use super::outcome::Outcome;
use crate::{
    error::{AppError, Result},
    state::AppState,
};

pub async fn index() -> Outcome {
    Outcome::home()
}

/// Liveness plus a round trip to the database
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    state.db.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No page at {}", uri.path()))
}
