//! Linear step machine for the intake wizard.
//!
//! Steps run identity → one per section → extras → payment → success. The
//! extras step exists only for schemas that declare extras; the payment and
//! success steps keep their fixed positions (section count + 2 and + 3)
//! either way. Success is terminal and is entered through
//! [`StepFlow::complete`] after a dispatched submission, never via
//! [`StepFlow::next`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::FormSchema;
use crate::state::FormState;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One position in the wizard. `Section` carries the zero-based index into
/// `schema.sections`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "section")]
pub enum Step {
    Identity,
    Section(usize),
    Extras,
    Payment,
    Success,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// Tracks the current step and enforces the transition rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFlow {
    section_count: usize,
    has_extras: bool,
    current: Step,
}

impl StepFlow {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            section_count: schema.sections.len(),
            has_extras: !schema.extras.is_empty(),
            current: Step::Identity,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Numeric position of a step: identity is 0, sections are 1..=N,
    /// extras N+1, payment N+2, success N+3.
    pub fn index_of(&self, step: Step) -> usize {
        match step {
            Step::Identity => 0,
            Step::Section(i) => i + 1,
            Step::Extras => self.section_count + 1,
            Step::Payment => self.section_count + 2,
            Step::Success => self.section_count + 3,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index_of(self.current)
    }

    /// Inverse of [`index_of`](Self::index_of). Rejects positions outside
    /// the flow, including the extras position for schemas without extras.
    pub fn from_index(&self, index: usize) -> Result<Step, CoreError> {
        if index == 0 {
            return Ok(Step::Identity);
        }
        if index == self.section_count + 1 && self.has_extras {
            return Ok(Step::Extras);
        }
        if index == self.section_count + 2 {
            return Ok(Step::Payment);
        }
        if index == self.section_count + 3 {
            return Ok(Step::Success);
        }
        if (1..=self.section_count).contains(&index) {
            return Ok(Step::Section(index - 1));
        }
        Err(CoreError::validation(format!(
            "Step index {index} is out of range"
        )))
    }

    pub fn is_terminal(&self) -> bool {
        self.current == Step::Success
    }

    /// Advance one step. Gated at identity by name/email/phone being
    /// filled in; a no-op at payment (submission is the only way forward)
    /// and at success. Returns whether the step changed.
    pub fn next(&mut self, state: &FormState) -> bool {
        let next = match self.current {
            Step::Identity if !state.identity_complete() => return false,
            Step::Identity => self.first_section_or_after(),
            Step::Section(i) if i + 1 < self.section_count => Step::Section(i + 1),
            Step::Section(_) => self.after_sections(),
            Step::Extras => Step::Payment,
            Step::Payment | Step::Success => return false,
        };
        self.current = next;
        true
    }

    /// Go back one step. A no-op at identity and at the terminal success
    /// step. Returns whether the step changed.
    pub fn back(&mut self) -> bool {
        let prev = match self.current {
            Step::Identity | Step::Success => return false,
            Step::Section(0) => Step::Identity,
            Step::Section(i) => Step::Section(i - 1),
            Step::Extras => self.last_section_or_identity(),
            Step::Payment if self.has_extras => Step::Extras,
            Step::Payment => self.last_section_or_identity(),
        };
        self.current = prev;
        true
    }

    /// Enter the terminal success step after a dispatched submission.
    pub fn complete(&mut self) {
        self.current = Step::Success;
    }

    fn first_section_or_after(&self) -> Step {
        if self.section_count > 0 {
            Step::Section(0)
        } else {
            self.after_sections()
        }
    }

    fn after_sections(&self) -> Step {
        if self.has_extras {
            Step::Extras
        } else {
            Step::Payment
        }
    }

    fn last_section_or_identity(&self) -> Step {
        if self.section_count > 0 {
            Step::Section(self.section_count - 1)
        } else {
            Step::Identity
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
