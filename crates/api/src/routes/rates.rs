//! Route definitions for exchange rates.

use axum::routing::get;
use axum::Router;

use crate::handlers::rates;
use crate::state::AppState;

/// Rate routes mounted at `/rates`.
///
/// ```text
/// GET /rates/usd -> get_usd_rate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/rates/usd", get(rates::get_usd_rate))
}
