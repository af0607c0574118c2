//! Configuration management for the auth gateway
//!
//! Settings come from environment variables, with a `.env` file honoured in
//! debug builds. Every variable is checked before start-up continues and all
//! problems are reported together.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub env: Environment,
    pub supabase: SupabaseSettings,
    pub rabbitmq: RabbitMqSettings,
    pub database: DatabaseSettings,
    pub health: HealthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

/// Hosted identity provider (Supabase GoTrue)
#[derive(Clone, Serialize, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub jwt_secret: String,
    /// Passed through as `email_confirm` on account creation
    pub email_confirmation: bool,
}

impl fmt::Debug for SupabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseSettings")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("email_confirmation", &self.email_confirmation)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RabbitMqSettings {
    pub uri: String,
}

impl fmt::Debug for RabbitMqSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // URI usually embeds credentials
        f.debug_struct("RabbitMqSettings")
            .field("uri", &"<redacted>")
            .finish()
    }
}

/// Database connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSettings {
    pub probe_timeout_secs: u64,
}

impl HealthSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Every problem found while reading the environment
#[derive(Debug, Error)]
#[error("Invalid configuration: {}", .problems.join("; "))]
pub struct ConfigError {
    pub problems: Vec<String>,
}

/// Merge `.env` into the process environment in debug builds.
///
/// Runs before logging is initialised so `RUST_LOG` from the file applies.
/// Variables already set in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    if cfg!(debug_assertions) {
        dotenvy::dotenv().ok()
    } else {
        None
    }
}

/// Merge a dotenv file into the process environment, if it exists
pub fn load_dotenv_from(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|()| path.to_path_buf())
}

impl Settings {
    /// Read settings from the process environment. Call [`load_dotenv`] first
    /// so `.env` entries are visible here.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
            .context("Failed to load configuration from environment")
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = Vars {
            lookup,
            problems: Vec::new(),
        };

        let server = ServerSettings {
            host: vars.optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: vars.positive("PORT", None),
        };

        let env = match vars.required("ENV") {
            Some(value) => Environment::parse(&value).unwrap_or_else(|| {
                vars.problems.push(format!(
                    "ENV must be one of development, production, test (got {:?})",
                    value
                ));
                Environment::Development
            }),
            None => Environment::Development,
        };

        let supabase = SupabaseSettings {
            url: vars.http_url("SUPABASE_URL"),
            key: vars.required("SUPABASE_KEY").unwrap_or_default(),
            jwt_secret: vars.required("SUPABASE_JWT_SECRET").unwrap_or_default(),
            email_confirmation: vars.boolean("SUPABASE_EMAIL_CONFIRMATION"),
        };

        let rabbitmq = RabbitMqSettings {
            uri: vars.required("USER_RABBITMQ_URI").unwrap_or_default(),
        };

        let database = DatabaseSettings {
            host: vars.required("DB_HOST").unwrap_or_default(),
            port: vars.positive("DB_PORT", None),
            name: vars.required("DB_NAME").unwrap_or_default(),
            username: vars.required("DB_USERNAME").unwrap_or_default(),
            password: vars.required("DB_PASSWORD").unwrap_or_default(),
            max_connections: vars.positive("DB_MAX_CONNECTIONS", Some(10)),
        };

        let health = HealthSettings {
            probe_timeout_secs: vars.positive("HEALTH_PROBE_TIMEOUT_SECS", Some(5)),
        };

        if !vars.problems.is_empty() {
            return Err(ConfigError {
                problems: vars.problems,
            });
        }

        Ok(Settings {
            server,
            env,
            supabase,
            rabbitmq,
            database,
            health,
        })
    }
}

/// Lookup wrapper that records problems instead of failing fast
struct Vars<F> {
    lookup: F,
    problems: Vec<String>,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, key: &str) -> Option<String> {
        let value = self.optional(key);
        if value.is_none() {
            self.problems.push(format!("{} must be set", key));
        }
        value
    }

    fn positive<T>(&mut self, key: &str, default: Option<T>) -> T
    where
        T: std::str::FromStr + PartialOrd + Default,
    {
        let raw = match (self.optional(key), default) {
            (Some(raw), _) => raw,
            (None, Some(default)) => return default,
            (None, None) => {
                self.problems.push(format!("{} must be set", key));
                return T::default();
            }
        };

        match raw.parse::<T>() {
            Ok(value) if value > T::default() => value,
            _ => {
                self.problems
                    .push(format!("{} must be a positive integer (got {:?})", key, raw));
                T::default()
            }
        }
    }

    fn boolean(&mut self, key: &str) -> bool {
        match self.required(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                self.problems
                    .push(format!("{} must be true or false (got {:?})", key, other));
                false
            }
            None => false,
        }
    }

    fn http_url(&mut self, key: &str) -> String {
        let Some(raw) = self.required(key) else {
            return String::new();
        };

        match url::Url::parse(&raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => raw,
            _ => {
                self.problems
                    .push(format!("{} must be an absolute http(s) URL (got {:?})", key, raw));
                raw
            }
        }
    }
}
