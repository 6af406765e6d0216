//! Route definitions for the form catalog and submission intake.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{forms, submissions};
use crate::state::AppState;

/// Catalog and intake routes mounted at `/forms`.
///
/// ```text
/// GET  /forms                   -> list_forms
/// GET  /forms/{id}              -> get_form
/// POST /forms/{id}/submissions  -> create_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forms", get(forms::list_forms))
        .route("/forms/{id}", get(forms::get_form))
        .route("/forms/{id}/submissions", post(submissions::create_submission))
}
