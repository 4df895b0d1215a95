//! Data models for BLT API entities.
//!
//! The backend owns the shape of these records; the client treats them as
//! opaque beyond the fields it displays. Unknown fields are tolerated and
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

/// An authenticated user. Identity and fields are defined by the backend
/// and are not validated here; `username` is the only field the UI needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response body for `POST /auth/login` and `POST /auth/signup`.
///
/// A missing `token` means the backend rejected the attempt even when it
/// answered with a 2xx status, so both fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupData {
    pub username: String,
    pub email: String,
    pub password: String,
}
