/// Feedback identifiers are opaque strings (`FB-<millis>-<suffix>`).
pub type FeedbackId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
