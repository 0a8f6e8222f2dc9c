//! Typed HTTP client for the feedback API.
//!
//! [`FeedbackClient`] wraps every `/api` endpoint; [`submit_wizard`] drives a
//! completed [`FeedbackWizard`](asmakam_core::wizard::FeedbackWizard) through
//! its submit call.

pub mod client;
pub mod error;
pub mod submit;

pub use client::{FeedbackClient, FeedbackList, OrderContactInfo, SubmitResponse};
pub use error::ClientError;
pub use submit::submit_wizard;
