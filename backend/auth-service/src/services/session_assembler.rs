/// Maps provider payloads into the gateway's public shapes
use chrono::{DateTime, Utc};

use crate::models::{ExternalIdentity, RawSession, RawUser, Session};

/// Pure transform from provider wire shapes to public models.
///
/// Timestamps are normalized to UTC; token fields pass through untouched.
pub struct SessionAssembler;

impl SessionAssembler {
    pub fn identity(raw: RawUser) -> ExternalIdentity {
        ExternalIdentity {
            id: raw.id,
            email: raw.email,
            role: raw.role,
            last_sign_in_at: raw.last_sign_in_at.map(|at| at.with_timezone(&Utc)),
            created_at: raw.created_at.with_timezone(&Utc),
            updated_at: raw.updated_at.with_timezone(&Utc),
        }
    }

    /// `received_at` backs `expires_at` when the provider omits it
    pub fn session(raw: RawSession, received_at: DateTime<Utc>) -> Session {
        let expires_at = raw
            .expires_at
            .unwrap_or_else(|| received_at.timestamp().saturating_add(raw.expires_in));

        Session {
            access_token: raw.access_token,
            expires_in: raw.expires_in,
            expires_at,
            refresh_token: raw.refresh_token,
            user: Self::identity(raw.user),
        }
    }
}
