//! REST client for the `/api` endpoints, built on [`reqwest`].

use std::time::Duration;

use asmakam_core::dashboard::{DashboardQuery, FeedbackStats};
use asmakam_core::feedback::{FeedbackRecord, FeedbackStatus, FeedbackSubmission};
use asmakam_core::types::Timestamp;
use asmakam_core::wizard::SUBMIT_TIMEOUT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Body of a successful `POST /api/feedback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub data: FeedbackRecord,
    pub total_feedback: usize,
}

/// Body of `GET /api/feedback`: every record, newest first, plus stats.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackList {
    pub data: Vec<FeedbackRecord>,
    pub stats: FeedbackStats,
    pub last_updated: Timestamp,
}

/// Ordering phone numbers and links from `GET /api/order/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderContactInfo {
    pub online_ordering: String,
    pub primary_phone: String,
    pub primary_tel_link: String,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub alternate_tel_link: Option<String>,
    pub whatsapp_link: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct DeletedBody {
    remaining: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one running feedback API.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedbackClient {
    /// Client with the standard 10 second submit timeout.
    ///
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, SUBMIT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Http)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a submission to `POST /api/feedback`.
    pub async fn submit(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<SubmitResponse, ClientError> {
        let request = self.client.post(self.url("/api/feedback")).json(submission);
        Self::parse(self.send(request).await?).await
    }

    /// Fetch every record with stats. Admin only.
    pub async fn list(&self, password: &str) -> Result<FeedbackList, ClientError> {
        let request = self.client.get(self.url("/api/feedback")).bearer_auth(password);
        Self::parse(self.send(request).await?).await
    }

    /// Change a record's status and return the updated record. Admin only.
    pub async fn update_status(
        &self,
        password: &str,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<FeedbackRecord, ClientError> {
        let request = self
            .client
            .patch(self.url("/api/feedback"))
            .bearer_auth(password)
            .json(&json!({ "id": id, "status": status }));
        let body: DataEnvelope<FeedbackRecord> = Self::parse(self.send(request).await?).await?;
        Ok(body.data)
    }

    /// Delete a record. Returns how many records remain. Admin only.
    pub async fn delete(&self, password: &str, id: &str) -> Result<usize, ClientError> {
        let request = self
            .client
            .delete(self.url("/api/feedback"))
            .bearer_auth(password)
            .json(&json!({ "id": id }));
        let body: DeletedBody = Self::parse(self.send(request).await?).await?;
        Ok(body.remaining)
    }

    /// Download the CSV export of the view described by `query`. Admin only.
    pub async fn export_csv(
        &self,
        password: &str,
        query: &DashboardQuery,
    ) -> Result<String, ClientError> {
        let request = self
            .client
            .get(self.url("/api/feedback/export"))
            .bearer_auth(password)
            .query(query);
        self.send(request)
            .await?
            .text()
            .await
            .map_err(ClientError::from_reqwest)
    }

    pub async fn order_contact(&self) -> Result<OrderContactInfo, ClientError> {
        let request = self.client.get(self.url("/api/order/contact"));
        let body: DataEnvelope<OrderContactInfo> = Self::parse(self.send(request).await?).await?;
        Ok(body.data)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send the request and turn non-2xx responses into [`ClientError`]s.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            let err = ClientError::from_reqwest(e);
            tracing::warn!(error = %err, "Feedback API request failed");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The server's envelope carries a readable message; fall back to
        // the reason phrase when the body is something else.
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "Feedback API rejected request");

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response.json::<T>().await.map_err(ClientError::from_reqwest)
    }
}
