//! Mutable per-session form state and its update operations.
//!
//! [`FormState`] is seeded from a validated [`FormSchema`] with one answer
//! slot per question and one selection flag per extra, then mutated only
//! through the operations below. Operations that reference schema ids are
//! strict: an id the schema never declared is rejected instead of silently
//! growing the maps.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::FormSchema;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Which identity field an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityField {
    Name,
    Email,
    Phone,
    Company,
}

/// Contact details captured on the first step. `company` is optional and
/// stays empty when the client skips it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

impl Identity {
    /// True once name, email and phone all have non-blank content. Gates
    /// advancing past the identity step.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Deposit percent
// ---------------------------------------------------------------------------

/// Allowed deposit choices: pay everything up front or an initial 60%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum DepositPercent {
    #[default]
    Full,
    Sixty,
}

impl DepositPercent {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Full => 100,
            Self::Sixty => 60,
        }
    }

    /// Percent as a decimal fraction (1.00 or 0.60).
    pub fn as_fraction(self) -> Decimal {
        Decimal::new(self.as_u32() as i64, 2)
    }
}

impl From<DepositPercent> for u32 {
    fn from(pct: DepositPercent) -> Self {
        pct.as_u32()
    }
}

impl TryFrom<u32> for DepositPercent {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(Self::Full),
            60 => Ok(Self::Sixty),
            other => Err(CoreError::validation(format!(
                "Deposit percent must be 100 or 60, got {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Everything a client has entered into one intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub schema_id: String,
    pub identity: Identity,
    /// Keyed by question id. Key set is fixed at seed time.
    pub answers: BTreeMap<String, String>,
    /// Keyed by extra id. Key set is fixed at seed time.
    pub extras_selected: BTreeMap<String, bool>,
    pub deposit_percent: DepositPercent,
    pub payment_method: Option<String>,
    /// Keyed by the selected method's field ids. Cleared whenever the
    /// method changes.
    pub payment_fields: BTreeMap<String, String>,
}

impl FormState {
    /// Seed fresh state from a schema: one empty answer per question, one
    /// unselected flag per extra, everything else at its default.
    pub fn seed(schema: &FormSchema) -> Self {
        let answers = schema
            .questions()
            .map(|q| (q.id.clone(), String::new()))
            .collect();
        let extras_selected = schema
            .extras
            .iter()
            .map(|e| (e.id.clone(), false))
            .collect();
        Self {
            schema_id: schema.id.clone(),
            identity: Identity::default(),
            answers,
            extras_selected,
            deposit_percent: DepositPercent::default(),
            payment_method: None,
            payment_fields: BTreeMap::new(),
        }
    }

    pub fn set_identity_field(&mut self, field: IdentityField, value: impl Into<String>) {
        let value = value.into();
        match field {
            IdentityField::Name => self.identity.name = value,
            IdentityField::Email => self.identity.email = value,
            IdentityField::Phone => self.identity.phone = value,
            IdentityField::Company => self.identity.company = value,
        }
    }

    /// Replace the answer to a seeded question.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        match self.answers.get_mut(question_id) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(CoreError::validation(format!(
                "Unknown question id '{question_id}'"
            ))),
        }
    }

    /// Select or deselect a seeded extra.
    pub fn toggle_extra(&mut self, extra_id: &str, selected: bool) -> Result<(), CoreError> {
        match self.extras_selected.get_mut(extra_id) {
            Some(slot) => {
                *slot = selected;
                Ok(())
            }
            None => Err(CoreError::validation(format!(
                "Unknown extra id '{extra_id}'"
            ))),
        }
    }

    pub fn set_deposit_percent(&mut self, pct: DepositPercent) {
        self.deposit_percent = pct;
    }

    /// Select a payment method, discarding any previously entered method
    /// fields. The clear happens on every call, re-selecting the current
    /// method included.
    pub fn set_payment_method(
        &mut self,
        schema: &FormSchema,
        method_id: &str,
    ) -> Result<(), CoreError> {
        if schema.payment_method(method_id).is_none() {
            return Err(CoreError::validation(format!(
                "Unknown payment method '{method_id}'"
            )));
        }
        self.payment_method = Some(method_id.to_string());
        self.payment_fields.clear();
        Ok(())
    }

    /// Store one field of the selected payment method. Fields that declare
    /// `maxLength` are confirmation-code style: input is reduced to its
    /// digits and truncated to that length before storing.
    pub fn set_payment_field(
        &mut self,
        schema: &FormSchema,
        field_id: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let method_id = self
            .payment_method
            .as_deref()
            .ok_or_else(|| CoreError::validation("No payment method selected"))?;
        let method = schema
            .payment_method(method_id)
            .ok_or_else(|| CoreError::not_found("payment method", method_id))?;
        let field = method
            .fields
            .iter()
            .find(|f| f.id == field_id)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "Payment method '{method_id}' has no field '{field_id}'"
                ))
            })?;

        let stored = match field.max_length {
            Some(max) => value
                .chars()
                .filter(char::is_ascii_digit)
                .take(max)
                .collect(),
            None => value.to_string(),
        };
        self.payment_fields.insert(field.id.clone(), stored);
        Ok(())
    }

    /// Ids of the currently selected extras, in schema map order.
    pub fn selected_extra_ids(&self) -> impl Iterator<Item = &str> {
        self.extras_selected
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
    }

    pub fn identity_complete(&self) -> bool {
        self.identity.is_complete()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
