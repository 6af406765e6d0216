use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::{catalog_loader, state};
use atelier_delivery::{EmailConfig, Mailer};
use atelier_rates::{RateCache, RateClient};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Schema catalog ---
    let catalog = catalog_loader::load_catalog(config.schemas_dir.as_deref())
        .expect("Failed to load built-in form schemas");
    tracing::info!(schemas = catalog.len(), "Form catalog loaded");

    // --- Email delivery ---
    let notifier = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(
                host = %email_config.smtp_host,
                admin = %email_config.admin_email,
                "Email delivery configured"
            );
            Some(Arc::new(Mailer::new(email_config)) as Arc<dyn atelier_delivery::IntakeNotifier>)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, submissions will be rejected until configured");
            None
        }
    };

    // --- Exchange rates ---
    let rates = Arc::new(RateClient::new(config.rate_api_url.clone()));
    let rate_cache = Arc::new(Mutex::new(RateCache::default()));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Arc::new(catalog),
        rates,
        rate_cache,
        notifier,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
