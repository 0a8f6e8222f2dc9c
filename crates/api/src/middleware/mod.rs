//! Authorization extractors.
//!
//! - [`auth::AdminAuth`] -- Requires `Authorization: Bearer <ADMIN_PASSWORD>`.

pub mod auth;
