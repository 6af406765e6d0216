//! Handler for form submissions.

use atelier_core::error::CoreError;
use atelier_core::payment;
use atelier_core::submission::SubmissionPayload;
use atelier_delivery::caracas_now;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Receipt returned for an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub received_at: DateTime<FixedOffset>,
}

/// POST /api/v1/forms/{id}/submissions
///
/// Re-check an assembled payload against the schema, then send the admin
/// notification and the client confirmation. Both emails must go out for
/// the submission to be accepted.
pub async fn create_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubmissionPayload>,
) -> AppResult<impl IntoResponse> {
    let schema = state
        .catalog
        .get(&id)
        .ok_or_else(|| CoreError::not_found("form schema", id.clone()))?;

    if payload.schema_id != id {
        return Err(AppError::BadRequest(format!(
            "Body schemaId '{}' does not match path '{id}'",
            payload.schema_id
        )));
    }
    if payload.nombre.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(CoreError::validation("Nombre y email son requeridos").into());
    }
    if !payload.email.validate_email() {
        return Err(CoreError::validation("Email inválido").into());
    }
    payment::validate_method_fields(schema, &payload.pago.metodo_pago, &payload.pago.respuestas)?;

    let notifier = state
        .notifier
        .as_ref()
        .ok_or(AppError::MailerNotConfigured)?;

    let received_at = caracas_now();
    notifier.notify(schema, &payload, received_at).await?;

    let receipt = SubmissionReceipt {
        reference: Uuid::now_v7(),
        received_at,
    };
    tracing::info!(
        schema = %id,
        reference = %receipt.reference,
        "Submission delivered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}
