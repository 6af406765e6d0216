//! One client's walk through a form, from mount to submission.
//!
//! [`FormSession`] glues the pieces together: the validated schema, the
//! seeded [`FormState`], the [`StepFlow`], the exchange rate fetched once at
//! mount, and the submit path with its duplicate-submit guard. All reducer
//! operations are synchronous `&mut self` calls; only [`FormSession::mount`]
//! and [`FormSession::submit`] are async.

use atelier_core::error::CoreError;
use atelier_core::navigator::{Step, StepFlow};
use atelier_core::payment;
use atelier_core::pricing::{self, Quote};
use atelier_core::schema::FormSchema;
use atelier_core::state::{DepositPercent, FormState, IdentityField};
use atelier_core::submission::SubmissionPayload;
use atelier_rates::RateClient;
use rust_decimal::Decimal;

use crate::dispatcher::{DispatchError, SubmitTransport};

// ---------------------------------------------------------------------------
// FormSession
// ---------------------------------------------------------------------------

/// Live state of one form being filled in.
#[derive(Debug)]
pub struct FormSession {
    schema: FormSchema,
    state: FormState,
    flow: StepFlow,
    rate: Option<Decimal>,
    submitting: bool,
    last_error: Option<String>,
}

impl FormSession {
    /// Start a session with the exchange rate fetched from the given
    /// client. A failed fetch is logged and the session continues with no
    /// rate; totals then show in USD only.
    pub async fn mount(schema: FormSchema, rates: &RateClient) -> Result<Self, CoreError> {
        let rate = match rates.fetch_usd().await {
            Ok(rate) => Some(rate),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Exchange rate unavailable, continuing without Bs conversion"
                );
                None
            }
        };
        Self::with_rate(schema, rate)
    }

    /// Start a session with a known (or absent) exchange rate.
    pub fn with_rate(schema: FormSchema, rate: Option<Decimal>) -> Result<Self, CoreError> {
        schema.validate()?;
        let state = FormState::seed(&schema);
        let flow = StepFlow::new(&schema);
        Ok(Self {
            schema,
            state,
            flow,
            rate,
            submitting: false,
            last_error: None,
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.flow.current()
    }

    pub fn step_index(&self) -> usize {
        self.flow.current_index()
    }

    pub fn rate(&self) -> Option<Decimal> {
        self.rate
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Message from the most recent failed submission, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // -- reducer operations --

    pub fn set_identity_field(&mut self, field: IdentityField, value: impl Into<String>) {
        self.state.set_identity_field(field, value);
    }

    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.state.set_answer(question_id, value)
    }

    pub fn toggle_extra(&mut self, extra_id: &str, selected: bool) -> Result<(), CoreError> {
        self.state.toggle_extra(extra_id, selected)
    }

    pub fn set_deposit_percent(&mut self, pct: DepositPercent) {
        self.state.set_deposit_percent(pct);
    }

    pub fn set_payment_method(&mut self, method_id: &str) -> Result<(), CoreError> {
        self.state.set_payment_method(&self.schema, method_id)
    }

    pub fn set_payment_field(&mut self, field_id: &str, value: &str) -> Result<(), CoreError> {
        self.state.set_payment_field(&self.schema, field_id, value)
    }

    // -- navigation --

    pub fn next(&mut self) -> bool {
        self.flow.next(&self.state)
    }

    pub fn back(&mut self) -> bool {
        self.flow.back()
    }

    // -- pricing --

    /// Price the session as it stands.
    pub fn quote(&self) -> Quote {
        pricing::quote(&self.schema, &self.state, self.rate)
    }

    /// Whether the payment step is complete enough to submit.
    pub fn can_submit(&self) -> bool {
        payment::can_submit(&self.schema, &self.state)
    }

    // -- submission --

    /// Validate, assemble, and deliver the submission. On success the flow
    /// enters its terminal step. On failure the step and all entered data
    /// stay as they were, and the error message is kept for inline display.
    pub async fn submit(
        &mut self,
        transport: &dyn SubmitTransport,
    ) -> Result<(), DispatchError> {
        if self.submitting {
            return Err(DispatchError::InFlight);
        }
        if self.flow.current() != Step::Payment {
            return self.fail(DispatchError::WrongStep);
        }
        if let Err(e) = payment::validate_submission(&self.schema, &self.state) {
            return self.fail(DispatchError::Invalid(e));
        }
        let quote = self.quote();
        let payload = match SubmissionPayload::assemble(&self.state, &quote) {
            Ok(payload) => payload,
            Err(e) => return self.fail(DispatchError::Invalid(e)),
        };

        self.submitting = true;
        let result = transport.deliver(&payload).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.flow.complete();
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    schema = %self.schema.id,
                    error = %e,
                    "Submission dispatch failed"
                );
                self.fail(e)
            }
        }
    }

    fn fail(&mut self, err: DispatchError) -> Result<(), DispatchError> {
        self.last_error = Some(err.display_message());
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
