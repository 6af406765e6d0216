//! Handlers for the form catalog.

use atelier_core::error::CoreError;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/forms
///
/// List a summary of every loaded schema.
pub async fn list_forms(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.catalog.summaries(),
    }))
}

/// GET /api/v1/forms/{id}
///
/// Full schema definition; 404 for an unknown id.
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let schema = state
        .catalog
        .get(&id)
        .ok_or_else(|| CoreError::not_found("form schema", id.clone()))?;

    Ok(Json(DataResponse {
        data: schema.clone(),
    }))
}
