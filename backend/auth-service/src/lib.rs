// Auth Gateway Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod health;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;


use std::sync::Arc;

pub use error::{AuthError, Result};

// Re-export commonly used types
pub use models::{ExternalIdentity, LocalProfile, Session, UserSignUpMessage};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<services::AuthService>,
    pub health: Arc<health::HealthAggregator>,
}
