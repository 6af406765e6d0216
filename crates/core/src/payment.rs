//! Submission gating for the payment step.
//!
//! A session may only submit once a payment method is selected and every
//! field that method declares is filled in. Confirmation-code fields
//! (those with `maxLength`) must contain exactly that many digits.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::schema::FormSchema;
use crate::state::FormState;

/// Check the payment block of a session, field by field.
pub fn validate_submission(schema: &FormSchema, state: &FormState) -> Result<(), CoreError> {
    let method_id = state
        .payment_method
        .as_deref()
        .ok_or_else(|| CoreError::validation("No payment method selected"))?;
    validate_method_fields(schema, method_id, &state.payment_fields)
}

/// Check entered values against one method's declared fields. Shared by the
/// session-side gate and the server-side re-check of an incoming payload.
pub fn validate_method_fields(
    schema: &FormSchema,
    method_id: &str,
    entered: &BTreeMap<String, String>,
) -> Result<(), CoreError> {
    let method = schema
        .payment_method(method_id)
        .ok_or_else(|| CoreError::validation(format!("Unknown payment method '{method_id}'")))?;

    for field in &method.fields {
        let value = entered.get(&field.id).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            return Err(CoreError::validation(format!(
                "Payment field '{}' is required",
                field.id
            )));
        }
        if let Some(max) = field.max_length {
            if value.len() != max || !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(CoreError::validation(format!(
                    "Payment field '{}' must be exactly {max} digits",
                    field.id
                )));
            }
        }
    }
    Ok(())
}

/// Whether the submit action is currently enabled.
pub fn can_submit(schema: &FormSchema, state: &FormState) -> bool {
    validate_submission(schema, state).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
