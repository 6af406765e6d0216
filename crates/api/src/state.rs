use std::sync::{Arc, Mutex};

use atelier_core::catalog::SchemaCatalog;
use atelier_delivery::IntakeNotifier;
use atelier_rates::{RateCache, RateClient};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Loaded form schemas (built-ins plus any `SCHEMAS_DIR` overlays).
    pub catalog: Arc<SchemaCatalog>,
    /// Upstream exchange-rate client.
    pub rates: Arc<RateClient>,
    /// Bounded TTL cache in front of the rate client. Locked only for
    /// lookups and inserts, never across an await.
    pub rate_cache: Arc<Mutex<RateCache>>,
    /// Email delivery, absent when SMTP is not configured.
    pub notifier: Option<Arc<dyn IntakeNotifier>>,
}
