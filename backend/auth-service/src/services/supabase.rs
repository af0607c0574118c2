/// Supabase GoTrue client
///
/// Implements the identity provider capability on top of the GoTrue REST API.
///
/// ## API Reference
///
/// - Create user (admin):    POST /auth/v1/admin/users
/// - Update user (admin):    PUT  /auth/v1/admin/users/{id}
/// - Password grant:         POST /auth/v1/token?grant_type=password
/// - Logout:                 POST /auth/v1/logout
/// - PostgREST status table: GET  /rest/v1/status
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SupabaseSettings;
use crate::error::ProviderError;
use crate::models::{ExternalIdentity, RawSession, RawUser, UserMetadata};
use crate::services::{IdentityProvider, SessionAssembler};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    email_confirmation: bool,
    http: Client,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseSettings) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::transport(format!("Failed to build HTTP client: {}", e)))?;

        info!(url = %config.url, "Supabase client initialized");

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.key.clone(),
            email_confirmation: config.email_confirmation,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authorized with the service key
    fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response, ProviderError> {
        let response = request.send().await.map_err(|e| {
            warn!(operation, error = %e, "Supabase request failed");
            ProviderError::transport(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        // 4xx replies are mostly caller errors
        info!(
            operation,
            status = status.as_u16(),
            message = %message,
            "Supabase returned an error"
        );

        Err(ProviderError::new(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, ProviderError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            ProviderError::new(status, format!("Failed to parse {} response: {}", operation, e))
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExternalIdentity, ProviderError> {
        let body = CreateUserRequest {
            email,
            password,
            email_confirm: self.email_confirmation,
        };

        debug!("Creating Supabase user");

        let request = self.admin(self.http.post(self.url("/auth/v1/admin/users")).json(&body));
        let response = self.send(request, "create user").await?;
        let user: RawUser = Self::decode(response, "create user").await?;

        Ok(SessionAssembler::identity(user))
    }

    async fn link_metadata(&self, id: &str, metadata: UserMetadata) -> Result<(), ProviderError> {
        let body = UpdateUserRequest {
            user_metadata: metadata,
        };

        let request = self.admin(
            self.http
                .put(self.url(&format!("/auth/v1/admin/users/{}", id)))
                .json(&body),
        );
        self.send(request, "update user").await?;

        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<RawSession, ProviderError> {
        let body = PasswordGrantRequest { email, password };

        let request = self
            .http
            .post(self.url("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.service_key)
            .json(&body);
        let response = self.send(request, "sign in").await?;

        Self::decode(response, "sign in").await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let request = self
            .http
            .post(self.url("/auth/v1/logout"))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token);
        self.send(request, "sign out").await?;

        Ok(())
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let request = self.admin(
            self.http
                .get(self.url("/rest/v1/status"))
                .query(&[("select", "*")]),
        );
        self.send(request, "status").await?;

        Ok(())
    }
}

/// Pull the human readable message out of a GoTrue/PostgREST error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.msg.or(b.error_description).or(b.message).or(b.error))
        .unwrap_or_else(|| body.to_string())
}

// ===== GoTrue API Request/Response Types =====

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Debug, Serialize)]
struct UpdateUserRequest {
    user_metadata: UserMetadata,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}
