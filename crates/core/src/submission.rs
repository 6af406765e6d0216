//! Wire payload assembled from a finished session.
//!
//! Key names are the intake wire contract shared with the delivery
//! endpoint: Spanish field names, `totalUSD` spelled with uppercase USD,
//! and `montoBolivares` falling back to zero when no exchange rate ever
//! resolved while `dolarRate` stays null.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pricing::Quote;
use crate::state::{DepositPercent, FormState};

/// Payment block of the payload: deposit choice, chosen method and the
/// method-specific answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBlock {
    pub porcentaje: DepositPercent,
    pub metodo_pago: String,
    pub respuestas: BTreeMap<String, String>,
}

/// Everything the delivery endpoint receives for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub nombre: String,
    pub email: String,
    pub empresa: String,
    pub telefono: String,
    /// Answer per question id, empty string where the client skipped.
    pub respuestas: BTreeMap<String, String>,
    /// Selection flag per extra id.
    pub extras: BTreeMap<String, bool>,
    pub pago: PaymentBlock,
    pub schema_id: String,
    #[serde(rename = "totalUSD")]
    pub total_usd: Decimal,
    pub monto_a_pagar: Decimal,
    pub monto_bolivares: Decimal,
    pub dolar_rate: Option<Decimal>,
}

impl SubmissionPayload {
    /// Package state plus a priced quote into the wire payload. Requires a
    /// selected payment method; field-level validity is checked separately
    /// before dispatch.
    pub fn assemble(state: &FormState, quote: &Quote) -> Result<Self, CoreError> {
        let metodo_pago = state
            .payment_method
            .clone()
            .ok_or_else(|| CoreError::validation("No payment method selected"))?;

        Ok(Self {
            nombre: state.identity.name.clone(),
            email: state.identity.email.clone(),
            empresa: state.identity.company.clone(),
            telefono: state.identity.phone.clone(),
            respuestas: state.answers.clone(),
            extras: state.extras_selected.clone(),
            pago: PaymentBlock {
                porcentaje: state.deposit_percent,
                metodo_pago,
                respuestas: state.payment_fields.clone(),
            },
            schema_id: state.schema_id.clone(),
            total_usd: quote.total_usd,
            monto_a_pagar: quote.deposit_usd,
            monto_bolivares: quote.deposit_local.unwrap_or(Decimal::ZERO),
            dolar_rate: quote.rate,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::quote;
    use crate::schema::FormSchema;
    use crate::state::IdentityField;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "id": "heladeria",
            "title": "Cotización",
            "basePrice": 350,
            "sections": [
                {
                    "id": "negocio", "title": "Tu negocio",
                    "questions": [
                        { "id": "nombreNegocio", "label": "Nombre", "type": "text" },
                        { "id": "historia", "label": "Historia", "type": "textarea" }
                    ]
                }
            ],
            "extras": [
                { "id": "app", "title": "App", "description": "x", "price": 150 }
            ],
            "paymentMethods": [
                {
                    "id": "pagoMovil", "label": "Pago Móvil (Bs)", "details": [],
                    "fields": [
                        { "id": "ultimos6", "label": "Últimos 6",
                          "type": "text", "placeholder": "", "maxLength": 6 },
                        { "id": "telefonoDesde", "label": "Teléfono",
                          "type": "tel", "placeholder": "" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn filled_state(schema: &FormSchema) -> FormState {
        let mut state = FormState::seed(schema);
        state.set_identity_field(IdentityField::Name, "Ana Pérez");
        state.set_identity_field(IdentityField::Email, "ana@correo.com");
        state.set_identity_field(IdentityField::Phone, "04121234567");
        state.set_answer("nombreNegocio", "Helados Luna").unwrap();
        state.toggle_extra("app", true).unwrap();
        state.set_payment_method(schema, "pagoMovil").unwrap();
        state.set_payment_field(schema, "ultimos6", "123456").unwrap();
        state
            .set_payment_field(schema, "telefonoDesde", "04141112233")
            .unwrap();
        state
    }

    #[test]
    fn assembles_the_full_wire_shape() {
        let schema = schema();
        let state = filled_state(&schema);
        let q = quote(&schema, &state, Some(dec!(40)));
        let payload = SubmissionPayload::assemble(&state, &q).unwrap();

        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            wire,
            json!({
                "nombre": "Ana Pérez",
                "email": "ana@correo.com",
                "empresa": "",
                "telefono": "04121234567",
                "respuestas": { "nombreNegocio": "Helados Luna", "historia": "" },
                "extras": { "app": true },
                "pago": {
                    "porcentaje": 100,
                    "metodoPago": "pagoMovil",
                    "respuestas": {
                        "ultimos6": "123456",
                        "telefonoDesde": "04141112233"
                    }
                },
                "schemaId": "heladeria",
                "totalUSD": "500",
                "montoAPagar": "500.00",
                "montoBolivares": "20000.00",
                "dolarRate": "40"
            })
        );
    }

    #[test]
    fn missing_rate_yields_zero_bolivares_and_null_rate() {
        let schema = schema();
        let state = filled_state(&schema);
        let q = quote(&schema, &state, None);
        let payload = SubmissionPayload::assemble(&state, &q).unwrap();

        assert_eq!(payload.monto_bolivares, Decimal::ZERO);
        assert_eq!(payload.dolar_rate, None);
        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["dolarRate"], serde_json::Value::Null);
        assert_eq!(wire["montoBolivares"], "0");
    }

    #[test]
    fn requires_a_selected_method() {
        let schema = schema();
        let state = FormState::seed(&schema);
        let q = quote(&schema, &state, None);
        assert_matches!(
            SubmissionPayload::assemble(&state, &q),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn round_trips_through_json() {
        let schema = schema();
        let state = filled_state(&schema);
        let q = quote(&schema, &state, Some(dec!(36.58)));
        let payload = SubmissionPayload::assemble(&state, &q).unwrap();

        let text = serde_json::to_string(&payload).unwrap();
        let back: SubmissionPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }
}
