//! Intake form schema types and structural validation.
//!
//! A [`FormSchema`] declares everything the form engine needs to drive one
//! intake flow: sections of questions, optional priced extras, and the
//! payment methods offered at checkout. Schemas arrive as camelCase JSON,
//! either from the built-in catalog or from an external generator, and are
//! validated once with [`FormSchema::validate`] before a session is seeded
//! from them.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::icon::SectionIcon;

// ---------------------------------------------------------------------------
// Closed enums
// ---------------------------------------------------------------------------

/// Currency of a schema's pricing. Only USD exists today; the enum keeps the
/// wire field closed instead of free-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    #[default]
    Usd,
}

/// Input control for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Radio,
    Email,
    Tel,
}

impl QuestionKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Radio => "radio",
            Self::Email => "email",
            Self::Tel => "tel",
        }
    }
}

/// Input control for a payment-method field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
}

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// One question inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the whole schema; key of the seeded answer map.
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Choice labels; present iff `kind` is radio.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A titled group of questions rendered as one wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: SectionIcon,
    pub questions: Vec<Question>,
}

/// An optional add-on the client can select on the extras step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    pub id: String,
    pub title: String,
    pub description: String,
    /// USD surcharge. Advisory only when `negotiable` (displayed as
    /// "A negociar" and excluded from the computed total).
    pub price: Decimal,
    #[serde(default)]
    pub negotiable: bool,
}

/// One input the client fills in after choosing a payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentField {
    pub id: String,
    pub label: String,
    pub placeholder: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// When set, input is filtered to digits and truncated to this length
    /// (confirmation-code style fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// A payment option: display-only instruction lines plus the fields the
/// client must fill to confirm the transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub label: String,
    pub details: Vec<String>,
    pub fields: Vec<PaymentField>,
}

/// Declarative definition of one intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub base_price: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub extras: Vec<Extra>,
    pub payment_methods: Vec<PaymentMethod>,
}

impl FormSchema {
    /// Iterate all questions across sections in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Total question count across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Look up a payment method by id.
    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.id == id)
    }

    /// Look up an extra by id.
    pub fn extra(&self, id: &str) -> Option<&Extra> {
        self.extras.iter().find(|e| e.id == id)
    }

    /// Check the structural invariants a seedable schema must hold.
    ///
    /// - at least one section, each with at least one question
    /// - question ids unique across the whole schema
    /// - `options` non-empty iff the question is a radio
    /// - extra ids unique; non-negotiable extras priced >= 0
    /// - payment method ids unique; field ids unique within a method
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sections.is_empty() {
            return Err(CoreError::validation(format!(
                "Schema '{}': sections must not be empty",
                self.id
            )));
        }

        let mut question_ids = BTreeSet::new();
        for section in &self.sections {
            if section.questions.is_empty() {
                return Err(CoreError::validation(format!(
                    "Section '{}': questions must not be empty",
                    section.id
                )));
            }
            for question in &section.questions {
                if !question_ids.insert(question.id.as_str()) {
                    return Err(CoreError::validation(format!(
                        "Duplicate question id '{}'",
                        question.id
                    )));
                }
                match question.kind {
                    QuestionKind::Radio => {
                        if question.options.is_empty() {
                            return Err(CoreError::validation(format!(
                                "Radio question '{}' must declare options",
                                question.id
                            )));
                        }
                    }
                    _ => {
                        if !question.options.is_empty() {
                            return Err(CoreError::validation(format!(
                                "Question '{}' is not a radio but declares options",
                                question.id
                            )));
                        }
                    }
                }
            }
        }

        let mut extra_ids = BTreeSet::new();
        for extra in &self.extras {
            if !extra_ids.insert(extra.id.as_str()) {
                return Err(CoreError::validation(format!(
                    "Duplicate extra id '{}'",
                    extra.id
                )));
            }
            if !extra.negotiable && extra.price < Decimal::ZERO {
                return Err(CoreError::validation(format!(
                    "Extra '{}': price must not be negative",
                    extra.id
                )));
            }
        }

        let mut method_ids = BTreeSet::new();
        for method in &self.payment_methods {
            if !method_ids.insert(method.id.as_str()) {
                return Err(CoreError::validation(format!(
                    "Duplicate payment method id '{}'",
                    method.id
                )));
            }
            let mut field_ids = BTreeSet::new();
            for field in &method.fields {
                if !field_ids.insert(field.id.as_str()) {
                    return Err(CoreError::validation(format!(
                        "Payment method '{}': duplicate field id '{}'",
                        method.id, field.id
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
