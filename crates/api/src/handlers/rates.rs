//! Handler for the USD exchange-rate endpoint.

use std::sync::{MutexGuard, PoisonError};

use atelier_rates::RateCache;
use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Cache key for the single upstream rate this service serves.
const USD_CACHE_KEY: &str = "usd";

/// Wire shape of the rate endpoint.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    /// Bolívares per USD; `null` when no rate could be fetched.
    pub rate: Option<Decimal>,
    pub available: bool,
}

/// GET /api/v1/rates/usd
///
/// Serve the cached BCV rate, fetching upstream on a miss. Upstream failure
/// degrades to `rate: null` with HTTP 200 so clients keep pricing in USD;
/// failures are never cached, the next request retries.
pub async fn get_usd_rate(State(state): State<AppState>) -> Json<DataResponse<RateResponse>> {
    if let Some(rate) = lock_cache(&state).get(USD_CACHE_KEY) {
        return respond(Some(rate));
    }

    match state.rates.fetch_usd().await {
        Ok(rate) => {
            lock_cache(&state).insert(USD_CACHE_KEY, rate);
            respond(Some(rate))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Exchange rate fetch failed, serving unavailable");
            respond(None)
        }
    }
}

fn respond(rate: Option<Decimal>) -> Json<DataResponse<RateResponse>> {
    Json(DataResponse {
        data: RateResponse {
            available: rate.is_some(),
            rate,
        },
    })
}

fn lock_cache(state: &AppState) -> MutexGuard<'_, RateCache> {
    state
        .rate_cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
