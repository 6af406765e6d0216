//! Domain logic for schema-driven intake forms.
//!
//! Everything in this crate is pure and synchronous; I/O (rate fetching,
//! email, HTTP) lives in the sibling crates. The building blocks:
//!
//! - [`FormSchema`] — declarative form definition (sections, questions,
//!   extras, payment methods) with structural validation.
//! - [`FormState`] — per-session answers and selections, seeded from a
//!   schema and mutated only through explicit operations.
//! - [`pricing::quote`] — total / deposit / local-currency arithmetic.
//! - [`StepFlow`] — the identity → sections → extras → payment → success
//!   step machine.
//! - [`payment`] — submission gating over the selected payment method.
//! - [`SubmissionPayload`] — the wire payload handed to delivery.
//! - [`SchemaCatalog`] — embedded built-in schemas plus overlays.

pub mod catalog;
pub mod error;
pub mod icon;
pub mod money;
pub mod navigator;
pub mod payment;
pub mod pricing;
pub mod schema;
pub mod state;
pub mod submission;

pub use catalog::{SchemaCatalog, SchemaSummary};
pub use error::CoreError;
pub use icon::SectionIcon;
pub use navigator::{Step, StepFlow};
pub use pricing::Quote;
pub use schema::FormSchema;
pub use state::{DepositPercent, FormState, IdentityField};
pub use submission::SubmissionPayload;
