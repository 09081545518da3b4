//! Hosted platform configuration.
//!
//! The server reads it from the environment at boot and embeds it in the SSR
//! shell as JSON; the hydrated client deserializes the same struct.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_DOCUMENTS_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_BLOBS_URL: &str = "https://firebasestorage.googleapis.com";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: String },
    #[error("invalid platform config: {0}")]
    Invalid(String),
}

/// Base URLs of the hosted services. Overridable for local emulators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub identity: String,
    pub token: String,
    pub documents: String,
    pub blobs: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity: DEFAULT_IDENTITY_URL.to_owned(),
            token: DEFAULT_TOKEN_URL.to_owned(),
            documents: DEFAULT_DOCUMENTS_URL.to_owned(),
            blobs: DEFAULT_BLOBS_URL.to_owned(),
        }
    }
}

/// Web-app credentials for the hosted platform. None of these are secrets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    #[serde(default)]
    pub messaging_sender_id: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl PlatformConfig {
    /// Build config from environment variables.
    ///
    /// Required:
    /// - `PLATFORM_API_KEY`
    /// - `PLATFORM_PROJECT_ID`
    /// - `PLATFORM_STORAGE_BUCKET`
    ///
    /// Optional:
    /// - `PLATFORM_AUTH_DOMAIN`, `PLATFORM_MESSAGING_SENDER_ID`, `PLATFORM_APP_ID`
    /// - `PLATFORM_IDENTITY_URL`, `PLATFORM_TOKEN_URL`,
    ///   `PLATFORM_DOCUMENTS_URL`, `PLATFORM_BLOBS_URL` (emulator overrides)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Endpoints::default();
        Ok(Self {
            api_key: required("PLATFORM_API_KEY")?,
            auth_domain: optional("PLATFORM_AUTH_DOMAIN").unwrap_or_default(),
            project_id: required("PLATFORM_PROJECT_ID")?,
            storage_bucket: required("PLATFORM_STORAGE_BUCKET")?,
            messaging_sender_id: optional("PLATFORM_MESSAGING_SENDER_ID").unwrap_or_default(),
            app_id: optional("PLATFORM_APP_ID").unwrap_or_default(),
            endpoints: Endpoints {
                identity: endpoint("PLATFORM_IDENTITY_URL", defaults.identity),
                token: endpoint("PLATFORM_TOKEN_URL", defaults.token),
                documents: endpoint("PLATFORM_DOCUMENTS_URL", defaults.documents),
                blobs: endpoint("PLATFORM_BLOBS_URL", defaults.blobs),
            },
        })
    }

    /// Parse the JSON form embedded in the SSR shell.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed JSON or blank required fields.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if config.api_key.trim().is_empty()
            || config.project_id.trim().is_empty()
            || config.storage_bucket.trim().is_empty()
        {
            return Err(ConfigError::Invalid("apiKey, projectId and storageBucket are required".to_owned()));
        }
        Ok(config)
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::Missing { var: key.to_owned() })
}

fn endpoint(key: &str, default: String) -> String {
    optional(key).unwrap_or(default).trim_end_matches('/').to_owned()
}
