pub mod forms;
pub mod health;
pub mod rates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /forms                        list schema summaries
/// /forms/{id}                   full schema definition
/// /forms/{id}/submissions       accept a submission (POST)
///
/// /rates/usd                    cached BCV exchange rate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(forms::router())
        .merge(rates::router())
}
