//! Configuration management for the event service.
//!
//! Settings are loaded from environment variables, with a `.env` file
//! picked up in development builds.

use anyhow::{Context, Result};
use std::env;
use tracing::warn;

/// Development-only signing secret used when `JWT_SECRET` is not set.
///
/// Matches the weak default the service historically shipped with; any
/// real deployment must override it.
const DEV_JWT_SECRET: &str = "supersecretjwtkey";

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
}

impl Settings {
    /// Load settings from environment variables (and `.env` in debug builds).
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            server: ServerSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            email: EmailSettings::from_env()?,
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Token signing settings
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiry_hours: i64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!(
                    "JWT_SECRET not set; falling back to the insecure built-in \
                     development secret. Do not run like this in production."
                );
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Self {
            secret,
            expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS")?,
        })
    }
}

/// Email delivery configuration
///
/// If `SMTP_HOST` is unset or empty the service runs with email delivery
/// in no-op mode (messages are logged and dropped).
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub use_starttls: bool,
}

impl EmailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "no-reply@virtual-events.local".to_string()),
            use_starttls: env::var("SMTP_USE_STARTTLS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
