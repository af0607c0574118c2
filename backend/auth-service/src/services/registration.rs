/// Registration saga
///
/// Provisions a new identity across three independent resources without a
/// shared transaction:
///
/// 1. `createAccount` - external account at the identity provider
/// 2. `createProfile` - local profile bound to the external id
/// 3. `linkMetadata`  - back-link from the external account to the profile
/// 4. `publish`       - sign-up broadcast on the fanout exchange
/// 5. `signIn`        - session issuance for the new account
///
/// Steps run strictly in order and the first failure aborts the saga. Nothing
/// is retried or compensated, so only a `createAccount` failure is safe to
/// retry blindly; later failures leave partial state behind.
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use crate::error::{DependencyCause, DependencyError, MessagingError, SignUpStage};
use crate::models::{Credentials, Session, UserMetadata, UserSignUpMessage, USER_SIGN_UP_TOPIC};
use crate::services::{EventPublisher, IdentityProvider, ProfileStore, SessionAssembler};

pub struct RegistrationOrchestrator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    events: Arc<dyn EventPublisher>,
}

impl RegistrationOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            identity,
            profiles,
            events,
        }
    }

    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> Result<Session, DependencyError> {
        let span = info_span!("sign_up");

        async {
            let identity = run_stage(
                SignUpStage::CreateAccount,
                self.identity
                    .create_account(&credentials.email, &credentials.password),
            )
            .await?;

            let profile = run_stage(
                SignUpStage::CreateProfile,
                self.profiles.create(&identity.id, name),
            )
            .await?;

            run_stage(
                SignUpStage::LinkMetadata,
                self.identity.link_metadata(
                    &identity.id,
                    UserMetadata {
                        profile_id: profile.id,
                    },
                ),
            )
            .await?;

            let message = UserSignUpMessage::new(&profile, &identity);
            run_stage(SignUpStage::Publish, async {
                let payload = serde_json::to_value(&message)?;
                self.events.publish(USER_SIGN_UP_TOPIC, payload).await?;
                Ok::<_, MessagingError>(())
            })
            .await?;

            let raw_session = run_stage(
                SignUpStage::SignIn,
                self.identity
                    .sign_in(&credentials.email, &credentials.password),
            )
            .await?;

            info!(
                auth_id = %identity.id,
                profile_id = %profile.id,
                "User signed up"
            );

            Ok::<_, DependencyError>(SessionAssembler::session(raw_session, Utc::now()))
        }
        .instrument(span)
        .await
    }
}

/// Run one saga step inside its own span and tag any failure with the stage
async fn run_stage<T, E, F>(stage: SignUpStage, step: F) -> Result<T, DependencyError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<DependencyCause>,
{
    let result = step
        .instrument(info_span!("sign_up_stage", stage = %stage))
        .await;

    result.map_err(|err| {
        let err = DependencyError::new(stage, err);
        warn!(stage = %stage, error = %err.cause, "Sign-up step failed");
        err
    })
}
