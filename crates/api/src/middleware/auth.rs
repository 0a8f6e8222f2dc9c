//! Shared-secret bearer authentication for the admin endpoints.

use asmakam_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the admin password as a bearer token.
///
/// Use this as an extractor parameter in any admin handler:
///
/// ```ignore
/// async fn admin_only(_admin: AdminAuth, State(state): State<AppState>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
///
/// Rejections:
/// - missing or non-`Bearer` header: 401
/// - `ADMIN_PASSWORD` unset: 500 (fails closed)
/// - wrong token: 401
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing authentication token".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let Some(secret) = state.config.admin_password.as_deref() else {
            return Err(AppError::InternalError(
                "ADMIN_PASSWORD environment variable not set".into(),
            ));
        };

        if !tokens_match(token, secret) {
            tracing::warn!("Rejected admin request with invalid credentials");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid credentials".into(),
            )));
        }

        Ok(AdminAuth)
    }
}

/// Compares SHA-256 digests of both values.
fn tokens_match(token: &str, secret: &str) -> bool {
    Sha256::digest(token.as_bytes()) == Sha256::digest(secret.as_bytes())
}
