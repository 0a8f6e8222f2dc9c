//! Admin dashboard read-side: filter, search, sort, stats and CSV export.
//!
//! Transforms apply in a fixed order: service filter, then text search,
//! then sort. Export always works on the transformed (filtered) view.

use chrono::{Datelike, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::feedback::{Expectation, FeedbackRecord, ServiceType};
use crate::types::Timestamp;

/// Header row of the CSV export.
pub const CSV_HEADERS: [&str; 12] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Service",
    "Expectation",
    "Quality Rating",
    "Speed Rating",
    "Order ID",
    "Comment",
    "Status",
    "Date",
];

const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFilter {
    #[default]
    All,
    Pickup,
    Delivery,
    Catering,
}

impl ServiceFilter {
    pub fn matches(self, service: ServiceType) -> bool {
        match self {
            Self::All => true,
            Self::Pickup => service == ServiceType::Pickup,
            Self::Delivery => service == ServiceType::Delivery,
            Self::Catering => service == ServiceType::Catering,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Highest quality rating first.
    Rating,
}

/// Dashboard view settings. Also used as the export endpoint's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub service: ServiceFilter,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl DashboardQuery {
    /// Apply filter, search and sort to `records`.
    pub fn apply<'a>(&self, records: &'a [FeedbackRecord]) -> Vec<&'a FeedbackRecord> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut view: Vec<&FeedbackRecord> = records
            .iter()
            .filter(|r| self.service.matches(r.service_type))
            .filter(|r| needle.as_deref().is_none_or(|n| matches_search(r, n)))
            .collect();

        match self.sort {
            SortOrder::Newest => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::Rating => view.sort_by(|a, b| {
                b.quality_rating
                    .cmp(&a.quality_rating)
                    .then_with(|| b.timestamp.cmp(&a.timestamp))
            }),
        }
        view
    }
}

/// Case-insensitive substring match over name, email, order id and comment.
/// `needle` must already be lowercase.
fn matches_search(record: &FeedbackRecord, needle: &str) -> bool {
    [
        Some(record.user_name.as_str()),
        record.user_email.as_deref(),
        record.order_id.as_deref(),
        record.comment.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Aggregate figures shown above the feedback list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    /// Mean quality rating, one decimal; `0.0` for an empty store.
    pub avg_quality: f64,
    /// Mean over records that actually carry a speed rating.
    pub avg_speed: f64,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Records submitted in the current calendar month (UTC).
    pub this_month: usize,
}

impl FeedbackStats {
    pub fn compute(records: &[FeedbackRecord], now: Timestamp) -> Self {
        let quality: Vec<f64> = records
            .iter()
            .map(|r| f64::from(r.quality_rating))
            .collect();
        let speed: Vec<f64> = records
            .iter()
            .filter_map(FeedbackRecord::given_speed_rating)
            .map(f64::from)
            .collect();
        let count_expectation =
            |e: Expectation| records.iter().filter(|r| r.expectation == e).count();

        Self {
            total: records.len(),
            avg_quality: rounded_mean(&quality),
            avg_speed: rounded_mean(&speed),
            positive: count_expectation(Expectation::Yes),
            neutral: count_expectation(Expectation::Neutral),
            negative: count_expectation(Expectation::No),
            this_month: records
                .iter()
                .filter(|r| r.timestamp.year() == now.year() && r.timestamp.month() == now.month())
                .count(),
        }
    }
}

fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Download file name for an export produced at `now`.
pub fn export_filename(now: Timestamp) -> String {
    format!("feedback-{}.csv", now.format("%Y-%m-%d"))
}

/// Render records as CSV: the header row plus one row per record.
pub fn export_csv(records: &[&FeedbackRecord]) -> String {
    let mut out = CSV_HEADERS.join(",");
    out.push('\n');

    for r in records {
        let row = [
            csv_field(&r.id),
            csv_field(&r.user_name),
            csv_field(r.user_email.as_deref().unwrap_or_default()),
            csv_field(r.user_phone.as_deref().unwrap_or_default()),
            csv_field(r.service_type.label()),
            r.expectation.as_str().to_string(),
            r.quality_rating.to_string(),
            r.given_speed_rating()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string()),
            csv_field(
                r.order_id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or(NOT_AVAILABLE),
            ),
            quoted(r.comment.as_deref().unwrap_or_default()),
            r.status.as_str().to_string(),
            r.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field only when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
