//! Client-side orchestration of one form walk-through.
//!
//! - [`session`] owns the live [`FormSession`]: validated schema, seeded
//!   state, step flow, the mount-time exchange rate, and the submit path
//!   with its duplicate-submit guard.
//! - [`dispatcher`] is the delivery seam: [`SubmitTransport`] plus the
//!   reqwest-backed [`HttpTransport`] that posts the JSON payload to the
//!   intake endpoint.

pub mod dispatcher;
pub mod session;

pub use dispatcher::{DispatchError, HttpTransport, SubmitTransport, DEFAULT_REJECTION_MESSAGE};
pub use session::FormSession;
