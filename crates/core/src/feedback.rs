//! Feedback record model and the shared validation ruleset.
//!
//! The same rules back both the server-side intake (`POST /api/feedback`)
//! and the client-side wizard, so a submission the wizard accepts is one
//! the server accepts.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{FeedbackId, Timestamp};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Lowest accepted star rating.
pub const MIN_RATING: i64 = 1;

/// Highest accepted star rating.
pub const MAX_RATING: i64 = 5;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Maximum customer name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Prefix of every generated feedback id.
pub const ID_PREFIX: &str = "FB";

/// Length of the random base36 suffix of a feedback id.
pub const ID_SUFFIX_LENGTH: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Service type
// ---------------------------------------------------------------------------

/// The fulfilment channel a piece of feedback is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Pickup,
    Delivery,
    Catering,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
            Self::Catering => "catering",
        }
    }

    /// Human-readable label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Pickup at Counter",
            Self::Delivery => "24/7 Delivery",
            Self::Catering => "Party Catering",
        }
    }

    /// Catering orders are not rated on speed.
    pub fn skips_speed_rating(self) -> bool {
        matches!(self, Self::Catering)
    }
}

// ---------------------------------------------------------------------------
// Expectation
// ---------------------------------------------------------------------------

/// Whether the order met the customer's expectations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expectation {
    Yes,
    Neutral,
    No,
    #[default]
    NotSpecified,
}

impl Expectation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Neutral => "neutral",
            Self::No => "no",
            Self::NotSpecified => "not-specified",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle tag of a stored feedback record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Active,
    Reviewed,
    Resolved,
    Archived,
}

impl FeedbackStatus {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "reviewed" => Ok(Self::Reviewed),
            "resolved" => Ok(Self::Resolved),
            "archived" => Ok(Self::Archived),
            _ => Err(CoreError::Validation(format!(
                "Invalid feedback status '{s}'. Must be one of: active, reviewed, resolved, archived"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Archived => "archived",
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One stored piece of customer feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    pub service_type: ServiceType,
    #[serde(default)]
    pub expectation: Expectation,
    pub quality_rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub timestamp: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub status: FeedbackStatus,
}

impl FeedbackRecord {
    /// Build a fresh `active` record from validated input.
    pub fn new(id: FeedbackId, input: NewFeedback, now: Timestamp) -> Self {
        Self {
            id,
            user_name: input.user_name,
            user_email: input.user_email,
            user_phone: input.user_phone,
            service_type: input.service_type,
            expectation: input.expectation,
            quality_rating: input.quality_rating,
            speed_rating: input.speed_rating,
            order_id: input.order_id,
            comment: input.comment,
            timestamp: now,
            created_at: now,
            updated_at: now,
            status: FeedbackStatus::Active,
        }
    }

    /// Speed rating if one was actually given (legacy files store `0`).
    pub fn given_speed_rating(&self) -> Option<u8> {
        self.speed_rating.filter(|r| *r > 0)
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Raw submission payload as sent by the wizard.
///
/// Everything is optional here so that missing fields surface as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expectation: Option<Expectation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A submission that passed validation, with all strings trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub service_type: ServiceType,
    pub expectation: Expectation,
    pub quality_rating: u8,
    pub speed_rating: Option<u8>,
    pub order_id: Option<String>,
    pub comment: Option<String>,
}

impl FeedbackSubmission {
    /// Apply the full validation ruleset and normalize the payload.
    pub fn validate(&self) -> Result<NewFeedback, CoreError> {
        let user_name = validate_user_name(self.user_name.as_deref().unwrap_or_default())?;

        let service_type = self
            .service_type
            .ok_or_else(|| CoreError::Validation("Service type is required".into()))?;

        let quality_rating = match self.quality_rating {
            Some(r) => validate_rating("quality", r)?,
            None => {
                return Err(CoreError::Validation("Quality rating is required".into()));
            }
        };

        // 0 means "not given"; catering never carries a speed rating.
        let speed_rating = match self.speed_rating {
            None | Some(0) => None,
            Some(_) if service_type.skips_speed_rating() => None,
            Some(r) => Some(validate_rating("speed", r)?),
        };

        let user_email = validate_email(self.user_email.as_deref())?;
        let comment = validate_comment(self.comment.as_deref())?;

        Ok(NewFeedback {
            user_name,
            user_email,
            user_phone: normalize_optional(self.user_phone.as_deref()),
            service_type,
            expectation: self.expectation.unwrap_or_default(),
            quality_rating,
            speed_rating,
            order_id: normalize_optional(self.order_id.as_deref()),
            comment,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim an optional string, mapping blank input to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate and trim a customer name.
pub fn validate_user_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Customer name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Customer name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Validate an optional email address. Blank input is accepted as "none".
pub fn validate_email(email: Option<&str>) -> Result<Option<String>, CoreError> {
    match normalize_optional(email) {
        Some(email) if !EMAIL_RE.is_match(&email) => Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        ))),
        other => Ok(other),
    }
}

/// Validate a 1-5 star rating. `field` names the rating in the error.
pub fn validate_rating(field: &str, rating: i64) -> Result<u8, CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Invalid {field} rating {rating}. Must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(rating as u8)
}

/// Validate an optional free-text comment against the length cap.
pub fn validate_comment(comment: Option<&str>) -> Result<Option<String>, CoreError> {
    let comment = normalize_optional(comment);
    if let Some(ref c) = comment {
        let len = c.chars().count();
        if len > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters (got {len})"
            )));
        }
    }
    Ok(comment)
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Generate a feedback id of the form `FB-<unix millis>-<9 base36 chars>`.
///
/// Uniqueness against existing records is the caller's job.
pub fn generate_feedback_id(now: Timestamp) -> FeedbackId {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{ID_PREFIX}-{}-{suffix}", now.timestamp_millis())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
