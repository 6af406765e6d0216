//! Intake email delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport and sends two
//! messages per submission: the admin notification and the client
//! confirmation. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and the
//! intake service runs with delivery unconfigured.

use async_trait::async_trait;
use atelier_core::schema::FormSchema;
use atelier_core::submission::SubmissionPayload;
use chrono::{DateTime, FixedOffset, Utc};

use crate::template;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender and admin address when not overridden.
const DEFAULT_FROM_ADDRESS: &str = "hola@alfredomendoza.dev";

/// Configuration for the SMTP intake notifier.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address for both messages.
    pub from_address: String,
    /// Where the admin notification goes.
    pub admin_email: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured; submissions are then rejected with a
    /// service-not-configured error.
    ///
    /// | Variable             | Required | Default                   |
    /// |----------------------|----------|---------------------------|
    /// | `SMTP_HOST`          | yes      | —                         |
    /// | `SMTP_PORT`          | no       | `587`                     |
    /// | `SMTP_FROM`          | no       | `hola@alfredomendoza.dev` |
    /// | `INTAKE_ADMIN_EMAIL` | no       | value of `SMTP_FROM`      |
    /// | `SMTP_USER`          | no       | —                         |
    /// | `SMTP_PASSWORD`      | no       | —                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let from_address = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string());
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            admin_email: std::env::var("INTAKE_ADMIN_EMAIL")
                .unwrap_or_else(|_| from_address.clone()),
            from_address,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// IntakeNotifier
// ---------------------------------------------------------------------------

/// Delivery seam for a received submission. The production implementation
/// sends SMTP email; tests substitute a recorder.
#[async_trait]
pub trait IntakeNotifier: Send + Sync {
    /// Deliver both notification messages for one submission. Succeeds
    /// only when the admin notification and the client confirmation both
    /// went out.
    async fn notify(
        &self,
        schema: &FormSchema,
        payload: &SubmissionPayload,
        received_at: DateTime<FixedOffset>,
    ) -> Result<(), EmailError>;
}

/// America/Caracas wall-clock time (UTC-4, no DST).
pub fn caracas_now() -> DateTime<FixedOffset> {
    let caracas = FixedOffset::west_opt(4 * 3600).expect("UTC-4 is a valid fixed offset");
    Utc::now().with_timezone(&caracas)
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends the intake notification emails via SMTP.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    async fn send_html(
        &self,
        from_name: &str,
        to: &str,
        reply_to: &str,
        subject: String,
        html: String,
    ) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(format!("{} <{}>", from_name, self.config.from_address).parse()?)
            .to(to.parse()?)
            .reply_to(reply_to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl IntakeNotifier for Mailer {
    async fn notify(
        &self,
        schema: &FormSchema,
        payload: &SubmissionPayload,
        received_at: DateTime<FixedOffset>,
    ) -> Result<(), EmailError> {
        self.send_html(
            "Formulario Web",
            &self.config.admin_email,
            &payload.email,
            template::admin_subject(payload),
            template::render_admin_html(schema, payload, received_at),
        )
        .await?;
        tracing::info!(
            schema = %payload.schema_id,
            to = %self.config.admin_email,
            "Admin notification email sent"
        );

        self.send_html(
            "Alfredo Mendoza",
            &payload.email,
            &self.config.admin_email,
            template::confirmation_subject(schema),
            template::render_confirmation_html(schema, payload),
        )
        .await?;
        tracing::info!(
            schema = %payload.schema_id,
            to = %payload.email,
            "Confirmation email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
