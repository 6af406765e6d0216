//! Email delivery for form intake.
//!
//! This crate turns a [`SubmissionPayload`](atelier_core::submission::SubmissionPayload)
//! into the two outbound messages the intake flow produces:
//!
//! - An admin notification with the full questionnaire, selected extras,
//!   and payment details.
//! - A confirmation to the client with a short summary of what was received.
//!
//! [`template`] renders the HTML bodies and subjects; [`email`] holds the
//! SMTP configuration, the [`IntakeNotifier`] delivery seam, and the
//! production [`Mailer`].

pub mod email;
pub mod template;

pub use email::{caracas_now, EmailConfig, EmailError, IntakeNotifier, Mailer};
pub use template::{admin_subject, confirmation_subject, render_admin_html, render_confirmation_html};
