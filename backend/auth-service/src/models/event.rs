use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExternalIdentity, LocalProfile};

/// Fanout exchange announcing new accounts
pub const USER_SIGN_UP_TOPIC: &str = "auth-service.user.sign-up";

/// Payload broadcast once per successful sign-up
///
/// Point-in-time snapshot: `email` is the provider's value at creation and is
/// not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSignUpMessage {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl UserSignUpMessage {
    pub fn new(profile: &LocalProfile, identity: &ExternalIdentity) -> Self {
        Self {
            id: profile.id,
            email: identity.email.clone(),
            name: profile.name.clone(),
        }
    }
}
