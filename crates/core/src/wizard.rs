//! Feedback wizard state machine.
//!
//! Collects one field (or a small group) per step and produces a
//! [`FeedbackSubmission`]. The sequence is linear with a single branch:
//! catering orders skip the speed-rating step.
//!
//! ```text
//! UserInfo -> ServiceSelect -> Expectation -> QualityRating
//!          -> SpeedRating (not for catering) -> OrderId -> Comment
//!          -> Submitting -> Success | Error
//! Error --retry--> Comment
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::feedback::{
    normalize_optional, validate_comment, validate_email, validate_rating, validate_user_name,
    Expectation, FeedbackSubmission, ServiceType,
};
use crate::types::FeedbackId;

/// Client-side timeout for the final submit call.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the success screen stays up before the wizard closes.
pub const SUCCESS_AUTO_CLOSE: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    UserInfo,
    ServiceSelect,
    Expectation,
    QualityRating,
    SpeedRating,
    OrderId,
    Comment,
    Submitting,
    Success,
    Error,
}

/// Input steps in display order, before the catering skip is applied.
const INPUT_STEPS: [WizardStep; 7] = [
    WizardStep::UserInfo,
    WizardStep::ServiceSelect,
    WizardStep::Expectation,
    WizardStep::QualityRating,
    WizardStep::SpeedRating,
    WizardStep::OrderId,
    WizardStep::Comment,
];

impl WizardStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::UserInfo => "Your Details",
            Self::ServiceSelect => "Service",
            Self::Expectation => "Expectation",
            Self::QualityRating => "Food Quality",
            Self::SpeedRating => "Speed",
            Self::OrderId => "Order ID",
            Self::Comment => "Comment",
            Self::Submitting => "Submitting",
            Self::Success => "Thank You",
            Self::Error => "Error",
        }
    }
}

/// The input steps actually shown for a given service type.
pub fn visible_steps(service: Option<ServiceType>) -> Vec<WizardStep> {
    let skip_speed = service.is_some_and(ServiceType::skips_speed_rating);
    INPUT_STEPS
        .into_iter()
        .filter(|s| !(skip_speed && *s == WizardStep::SpeedRating))
        .collect()
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// In-progress feedback collection.
#[derive(Debug, Clone)]
pub struct FeedbackWizard {
    step: WizardStep,
    submission: FeedbackSubmission,
    error: Option<String>,
    submitted_id: Option<FeedbackId>,
}

impl Default for FeedbackWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::UserInfo,
            submission: FeedbackSubmission::default(),
            error: None,
            submitted_id: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Fields collected so far.
    pub fn submission(&self) -> &FeedbackSubmission {
        &self.submission
    }

    /// Message of the last failed submit, while in [`WizardStep::Error`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id assigned by the server, once in [`WizardStep::Success`].
    pub fn submitted_id(&self) -> Option<&str> {
        self.submitted_id.as_deref()
    }

    /// Input steps shown for the service chosen so far.
    pub fn visible_steps(&self) -> Vec<WizardStep> {
        visible_steps(self.submission.service_type)
    }

    /// `(current, total)` input-step position, 1-based.
    ///
    /// Past the last input step the wizard reports itself as complete.
    pub fn progress(&self) -> (usize, usize) {
        let steps = self.visible_steps();
        let total = steps.len();
        let current = steps
            .iter()
            .position(|s| *s == self.step)
            .map_or(total, |i| i + 1);
        (current, total)
    }

    // -- transitions ------------------------------------------------------

    /// Record identity fields and move on to service selection.
    pub fn submit_user_info(
        &mut self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), CoreError> {
        self.expect_step(WizardStep::UserInfo, "enter your details")?;
        let name = validate_user_name(name)?;
        let email = validate_email(email)?;

        self.submission.user_name = Some(name);
        self.submission.user_email = email;
        self.submission.user_phone = normalize_optional(phone);
        self.step = WizardStep::ServiceSelect;
        Ok(())
    }

    pub fn select_service(&mut self, service: ServiceType) -> Result<(), CoreError> {
        self.expect_step(WizardStep::ServiceSelect, "select a service")?;
        self.submission.service_type = Some(service);
        if service.skips_speed_rating() {
            self.submission.speed_rating = None;
        }
        self.step = WizardStep::Expectation;
        Ok(())
    }

    pub fn select_expectation(&mut self, expectation: Expectation) -> Result<(), CoreError> {
        self.expect_step(WizardStep::Expectation, "answer the expectation question")?;
        self.submission.expectation = Some(expectation);
        self.step = WizardStep::QualityRating;
        Ok(())
    }

    /// Record the food quality stars. Catering goes straight to the order id.
    pub fn rate_quality(&mut self, rating: u8) -> Result<(), CoreError> {
        self.expect_step(WizardStep::QualityRating, "rate quality")?;
        let rating = validate_rating("quality", i64::from(rating))?;
        self.submission.quality_rating = Some(i64::from(rating));
        self.step = self.next_visible(WizardStep::QualityRating);
        Ok(())
    }

    pub fn rate_speed(&mut self, rating: u8) -> Result<(), CoreError> {
        self.expect_step(WizardStep::SpeedRating, "rate speed")?;
        let rating = validate_rating("speed", i64::from(rating))?;
        self.submission.speed_rating = Some(i64::from(rating));
        self.step = WizardStep::OrderId;
        Ok(())
    }

    /// Record the optional order id. Blank input skips it.
    pub fn submit_order_id(&mut self, order_id: Option<&str>) -> Result<(), CoreError> {
        self.expect_step(WizardStep::OrderId, "enter an order id")?;
        self.submission.order_id = normalize_optional(order_id);
        self.step = WizardStep::Comment;
        Ok(())
    }

    /// Record the optional comment. The wizard stays on the comment step.
    pub fn submit_comment(&mut self, comment: Option<&str>) -> Result<(), CoreError> {
        self.expect_step(WizardStep::Comment, "enter a comment")?;
        self.submission.comment = validate_comment(comment)?;
        Ok(())
    }

    /// Run the final validation and enter [`WizardStep::Submitting`].
    ///
    /// Returns the payload to send to `POST /api/feedback`.
    pub fn begin_submit(&mut self) -> Result<FeedbackSubmission, CoreError> {
        self.expect_step(WizardStep::Comment, "submit")?;
        self.submission.validate()?;
        self.error = None;
        self.step = WizardStep::Submitting;
        Ok(self.submission.clone())
    }

    /// Settle a submit started with [`begin_submit`](Self::begin_submit).
    pub fn complete(&mut self, outcome: Result<FeedbackId, String>) -> Result<(), CoreError> {
        self.expect_step(WizardStep::Submitting, "complete a submission")?;
        match outcome {
            Ok(id) => {
                self.submitted_id = Some(id);
                self.step = WizardStep::Success;
            }
            Err(message) => {
                self.error = Some(message);
                self.step = WizardStep::Error;
            }
        }
        Ok(())
    }

    /// "Try Again": return from the error screen to the comment step.
    pub fn retry(&mut self) -> Result<(), CoreError> {
        self.expect_step(WizardStep::Error, "retry")?;
        self.error = None;
        self.step = WizardStep::Comment;
        Ok(())
    }

    /// Go back one visible input step, keeping the collected fields.
    pub fn back(&mut self) -> Result<(), CoreError> {
        let steps = self.visible_steps();
        match steps.iter().position(|s| *s == self.step) {
            Some(i) if i > 0 => {
                self.step = steps[i - 1];
                Ok(())
            }
            _ => Err(self.wrong_step("go back")),
        }
    }

    /// Start over with an empty form (used after the success screen closes).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- helpers ----------------------------------------------------------

    fn next_visible(&self, from: WizardStep) -> WizardStep {
        let steps = self.visible_steps();
        steps
            .iter()
            .position(|s| *s == from)
            .and_then(|i| steps.get(i + 1).copied())
            .unwrap_or(WizardStep::Comment)
    }

    fn expect_step(&self, expected: WizardStep, action: &str) -> Result<(), CoreError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.wrong_step(action))
        }
    }

    fn wrong_step(&self, action: &str) -> CoreError {
        CoreError::Validation(format!(
            "Cannot {action} at the '{}' step",
            self.step.label()
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn wizard_at_quality(service: ServiceType) -> FeedbackWizard {
        let mut w = FeedbackWizard::new();
        w.submit_user_info("Asha", Some("asha@example.com"), None)
            .unwrap();
        w.select_service(service).unwrap();
        w.select_expectation(Expectation::Yes).unwrap();
        w
    }

    #[test]
    fn delivery_walks_every_step() {
        let mut w = wizard_at_quality(ServiceType::Delivery);
        assert_eq!(w.step(), WizardStep::QualityRating);
        w.rate_quality(5).unwrap();
        assert_eq!(w.step(), WizardStep::SpeedRating);
        w.rate_speed(4).unwrap();
        assert_eq!(w.step(), WizardStep::OrderId);
        w.submit_order_id(Some(" ORD-12 ")).unwrap();
        w.submit_comment(Some("Great biryani")).unwrap();

        let payload = w.begin_submit().unwrap();
        assert_eq!(w.step(), WizardStep::Submitting);
        assert_eq!(payload.user_name.as_deref(), Some("Asha"));
        assert_eq!(payload.speed_rating, Some(4));
        assert_eq!(payload.order_id.as_deref(), Some("ORD-12"));
        assert_eq!(payload.comment.as_deref(), Some("Great biryani"));
    }

    #[test]
    fn catering_skips_speed_rating() {
        let mut w = wizard_at_quality(ServiceType::Catering);
        w.rate_quality(3).unwrap();
        assert_eq!(w.step(), WizardStep::OrderId);
        assert_matches!(w.rate_speed(4), Err(CoreError::Validation(_)));
        assert_eq!(w.submission().speed_rating, None);
    }

    #[test]
    fn catering_back_from_order_id_returns_to_quality() {
        let mut w = wizard_at_quality(ServiceType::Catering);
        w.rate_quality(3).unwrap();
        w.back().unwrap();
        assert_eq!(w.step(), WizardStep::QualityRating);
    }

    #[test]
    fn progress_counts_visible_steps() {
        let mut w = wizard_at_quality(ServiceType::Catering);
        assert!(!w.visible_steps().contains(&WizardStep::SpeedRating));
        assert_eq!(w.progress(), (4, 6));
        w.rate_quality(2).unwrap();
        assert_eq!(w.progress(), (5, 6));

        let w = wizard_at_quality(ServiceType::Pickup);
        assert_eq!(w.progress(), (4, 7));
        assert_eq!(FeedbackWizard::new().progress(), (1, 7));
    }

    #[test]
    fn user_info_requires_a_name_and_valid_email() {
        let mut w = FeedbackWizard::new();
        assert!(w.submit_user_info("  ", None, None).is_err());
        assert!(w.submit_user_info("Asha", Some("nope"), None).is_err());
        assert_eq!(w.step(), WizardStep::UserInfo);
        w.submit_user_info("Asha", Some(""), Some(" 98450 ")).unwrap();
        assert_eq!(w.submission().user_email, None);
        assert_eq!(w.submission().user_phone.as_deref(), Some("98450"));
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut w = FeedbackWizard::new();
        assert!(w.select_service(ServiceType::Pickup).is_err());
        assert!(w.begin_submit().is_err());
        assert!(w.retry().is_err());
        assert!(w.back().is_err());
        assert_eq!(w.step(), WizardStep::UserInfo);
    }

    #[test]
    fn invalid_rating_keeps_the_step() {
        let mut w = wizard_at_quality(ServiceType::Pickup);
        assert!(w.rate_quality(0).is_err());
        assert!(w.rate_quality(6).is_err());
        assert_eq!(w.step(), WizardStep::QualityRating);
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let mut w = wizard_at_quality(ServiceType::Catering);
        w.rate_quality(5).unwrap();
        w.submit_order_id(None).unwrap();
        let long = "x".repeat(501);
        assert!(w.submit_comment(Some(&long)).is_err());
        assert_eq!(w.step(), WizardStep::Comment);
    }

    #[test]
    fn failed_submit_can_be_retried() {
        let mut w = wizard_at_quality(ServiceType::Pickup);
        w.rate_quality(4).unwrap();
        w.rate_speed(4).unwrap();
        w.submit_order_id(None).unwrap();
        w.begin_submit().unwrap();

        w.complete(Err("Request took too long".into())).unwrap();
        assert_eq!(w.step(), WizardStep::Error);
        assert_eq!(w.error(), Some("Request took too long"));

        w.retry().unwrap();
        assert_eq!(w.step(), WizardStep::Comment);
        assert_eq!(w.error(), None);

        w.begin_submit().unwrap();
        w.complete(Ok("FB-1-abc".into())).unwrap();
        assert_eq!(w.step(), WizardStep::Success);
        assert_eq!(w.submitted_id(), Some("FB-1-abc"));

        w.reset();
        assert_eq!(w.step(), WizardStep::UserInfo);
        assert_eq!(w.submission(), &FeedbackSubmission::default());
    }

    #[test]
    fn switching_to_catering_clears_speed_rating() {
        let mut w = wizard_at_quality(ServiceType::Delivery);
        w.rate_quality(5).unwrap();
        w.rate_speed(2).unwrap();
        // Walk back to the service step and change it.
        for _ in 0..4 {
            w.back().unwrap();
        }
        assert_eq!(w.step(), WizardStep::ServiceSelect);
        w.select_service(ServiceType::Catering).unwrap();
        assert_eq!(w.submission().speed_rating, None);
    }
}
