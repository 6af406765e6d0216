#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::{DateTime, FixedOffset};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use atelier_api::catalog_loader;
use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_core::schema::FormSchema;
use atelier_core::submission::SubmissionPayload;
use atelier_delivery::{EmailError, IntakeNotifier};
use atelier_rates::{RateCache, RateClient};

/// Build a test `ServerConfig` with safe defaults.
///
/// The rate URL points at the discard port so any accidental fetch fails
/// fast instead of touching the real endpoint.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4321".to_string()],
        request_timeout_secs: 30,
        rate_api_url: "http://127.0.0.1:9/api/v1/dollar?page=bcv".to_string(),
        schemas_dir: None,
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(notifier: Option<Arc<dyn IntakeNotifier>>) -> Router {
    build_app_with(test_config(), notifier)
}

pub fn build_app_with(config: ServerConfig, notifier: Option<Arc<dyn IntakeNotifier>>) -> Router {
    let catalog = catalog_loader::load_catalog(config.schemas_dir.as_deref())
        .expect("Failed to load test catalog");

    let state = AppState {
        rates: Arc::new(RateClient::new(config.rate_api_url.clone())),
        rate_cache: Arc::new(Mutex::new(RateCache::default())),
        catalog: Arc::new(catalog),
        config: Arc::new(config.clone()),
        notifier,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert an error response: status, `code`, and exact `error` message.
pub async fn assert_error(
    response: Response<Body>,
    status: StatusCode,
    code: &str,
    message: &str,
) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert_eq!(json["error"], message);
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

/// One notifier invocation captured for assertions.
#[derive(Debug, Clone)]
pub struct RecordedNotification {
    pub schema_id: String,
    pub payload: SubmissionPayload,
    pub received_at: DateTime<FixedOffset>,
}

/// Test double that records every notification instead of sending email.
#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    notifications: Mutex<Vec<RecordedNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A notifier whose sends always fail.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn recorded(&self) -> Vec<RecordedNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntakeNotifier for RecordingNotifier {
    async fn notify(
        &self,
        schema: &FormSchema,
        payload: &SubmissionPayload,
        received_at: DateTime<FixedOffset>,
    ) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Build("SMTP unavailable".to_string()));
        }
        self.notifications.lock().unwrap().push(RecordedNotification {
            schema_id: schema.id.clone(),
            payload: payload.clone(),
            received_at,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload fixtures
// ---------------------------------------------------------------------------

/// A payload for the built-in `heladeria` schema that passes every
/// server-side check (zelle, full deposit, no rate).
pub fn heladeria_payload() -> serde_json::Value {
    json!({
        "nombre": "Ana Pérez",
        "email": "ana@correo.com",
        "empresa": "Helados Luna",
        "telefono": "04121234567",
        "respuestas": {
            "dominioExistente": "No, necesito uno nuevo",
            "saboresVariedades": "Mantecado, chocolate y fresa"
        },
        "extras": { "convertirApp": true, "verificacionPagos": false },
        "pago": {
            "porcentaje": 100,
            "metodoPago": "zelle",
            "respuestas": { "correoZelle": "ana@correo.com" }
        },
        "schemaId": "heladeria",
        "totalUSD": "500",
        "montoAPagar": "500.00",
        "montoBolivares": "0",
        "dolarRate": null
    })
}
