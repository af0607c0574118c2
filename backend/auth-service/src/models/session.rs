use serde::{Deserialize, Serialize};

use super::user::{ExternalIdentity, RawUser};

/// Public session returned to gateway callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// Unix timestamp (seconds) of access token expiry
    pub expires_at: i64,
    pub refresh_token: String,
    pub user: ExternalIdentity,
}

/// Token response of GoTrue's password grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: RawUser,
}
