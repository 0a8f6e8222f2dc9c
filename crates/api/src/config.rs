use std::path::PathBuf;

use asmakam_core::contact::{
    OrderContact, DEFAULT_ALTERNATE_PHONE, DEFAULT_PRIMARY_PHONE, DEFAULT_WHATSAPP_COUNTRY_CODE,
};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path of the JSON file holding all feedback.
    pub feedback_file: PathBuf,
    /// Shared secret for the admin endpoints. `None` locks them (500).
    pub admin_password: Option<String>,
    /// Phone / WhatsApp details served to the order page.
    pub order_contact: OrderContact,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `FEEDBACK_FILE`         | `data/feedback.json`       |
    /// | `ADMIN_PASSWORD`        | unset                      |
    /// | `ORDER_PHONE`           | `7259322466`               |
    /// | `ORDER_ALT_PHONE`       | `8951603763` (empty = none)|
    /// | `WHATSAPP_COUNTRY_CODE` | `91`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let feedback_file = std::env::var("FEEDBACK_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data").join("feedback.json"));

        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());
        if admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD is not set; admin endpoints will refuse all requests");
        }

        let order_contact = OrderContact {
            primary_phone: std::env::var("ORDER_PHONE")
                .unwrap_or_else(|_| DEFAULT_PRIMARY_PHONE.into()),
            alternate_phone: match std::env::var("ORDER_ALT_PHONE") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => Some(DEFAULT_ALTERNATE_PHONE.into()),
            },
            whatsapp_country_code: std::env::var("WHATSAPP_COUNTRY_CODE")
                .unwrap_or_else(|_| DEFAULT_WHATSAPP_COUNTRY_CODE.into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            feedback_file,
            admin_password,
            order_contact,
        }
    }
}
