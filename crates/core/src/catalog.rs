//! Built-in schema catalog.
//!
//! Two schemas ship embedded in the binary: the ice-cream shop intake form
//! and the dental-supplies project questionnaire. Deployments can overlay
//! further schemas (externally generated ones included) on top of the
//! built-ins; an insert with an existing id replaces it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::FormSchema;

const HELADERIA_JSON: &str = include_str!("catalog/heladeria.json");
const INSUMOS_DENTAL_JSON: &str = include_str!("catalog/insumos_dental.json");

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Validated schemas keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: BTreeMap<String, FormSchema>,
}

impl SchemaCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog containing only the embedded schemas.
    pub fn builtin() -> Result<Self, CoreError> {
        let mut catalog = Self::empty();
        for source in [HELADERIA_JSON, INSUMOS_DENTAL_JSON] {
            let schema: FormSchema = serde_json::from_str(source).map_err(|e| {
                CoreError::validation(format!("Embedded schema failed to parse: {e}"))
            })?;
            catalog.insert(schema)?;
        }
        Ok(catalog)
    }

    /// Validate and add a schema, replacing any existing one with the
    /// same id.
    pub fn insert(&mut self, schema: FormSchema) -> Result<(), CoreError> {
        schema.validate()?;
        self.schemas.insert(schema.id.clone(), schema);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FormSchema> {
        self.schemas.get(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormSchema> {
        self.schemas.values()
    }

    /// Listing of the catalog, ordered by schema id.
    pub fn summaries(&self) -> Vec<SchemaSummary> {
        self.schemas.values().map(SchemaSummary::from).collect()
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Slim catalog entry for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub base_price: Decimal,
    pub section_count: usize,
    pub question_count: usize,
    pub extra_count: usize,
}

impl From<&FormSchema> for SchemaSummary {
    fn from(schema: &FormSchema) -> Self {
        Self {
            id: schema.id.clone(),
            title: schema.title.clone(),
            subtitle: schema.subtitle.clone(),
            base_price: schema.base_price,
            section_count: schema.sections.len(),
            question_count: schema.question_count(),
            extra_count: schema.extras.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
