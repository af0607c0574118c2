use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Error reported by the hosted identity provider.
///
/// `status` carries the HTTP status of the provider reply when one was
/// received; transport failures and undecodable payloads have none.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Identity provider error: {message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Profile store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Message broker failures
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("Broker rejected message published to {0}")]
    Rejected(String),

    #[error("Timed out after {0:?} waiting for the broker")]
    Timeout(std::time::Duration),
}

/// Step of the sign-up saga that a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpStage {
    CreateAccount,
    CreateProfile,
    LinkMetadata,
    Publish,
    SignIn,
}

impl SignUpStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignUpStage::CreateAccount => "createAccount",
            SignUpStage::CreateProfile => "createProfile",
            SignUpStage::LinkMetadata => "linkMetadata",
            SignUpStage::Publish => "publish",
            SignUpStage::SignIn => "signIn",
        }
    }
}

impl fmt::Display for SignUpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native error of the collaborator that failed
#[derive(Debug, Error)]
pub enum DependencyCause {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

impl DependencyCause {
    /// Status code carried by the cause, if the collaborator reported one
    pub fn status(&self) -> Option<u16> {
        match self {
            DependencyCause::Provider(err) => err.status,
            DependencyCause::Store(_) | DependencyCause::Messaging(_) => None,
        }
    }
}

/// A collaborator call failed during sign-up.
///
/// Earlier stages are not rolled back: a failure at `createProfile` leaves an
/// external account without a local profile, a failure at `publish` leaves a
/// linked profile whose sign-up event was never broadcast.
#[derive(Debug, Error)]
#[error("Sign-up failed at {stage}: {cause}")]
pub struct DependencyError {
    pub stage: SignUpStage,
    #[source]
    pub cause: DependencyCause,
}

impl DependencyError {
    pub fn new(stage: SignUpStage, cause: impl Into<DependencyCause>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

/// HTTP-facing error for the auth endpoints
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        AuthError::Validation(err.to_string())
    }
}

/// Map a collaborator status to an HTTP status, falling back to 500 when the
/// collaborator reported nothing usable.
fn upstream_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| code.is_client_error() || code.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message, stage) = match &self {
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AuthError::Dependency(err) => {
                let status = upstream_status(err.cause.status());
                let message = match &err.cause {
                    DependencyCause::Provider(provider) => provider.message.clone(),
                    // Don't leak store or broker internals
                    DependencyCause::Store(_) | DependencyCause::Messaging(_) => {
                        "Internal server error".to_string()
                    }
                };
                (status, message, Some(err.stage.as_str()))
            }
            AuthError::Provider(err) => (upstream_status(err.status), err.message.clone(), None),
        };

        let body = match stage {
            Some(stage) => json!({
                "error": error_message,
                "status": status.as_u16(),
                "stage": stage,
            }),
            None => json!({
                "error": error_message,
                "status": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
