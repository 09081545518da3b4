//! Server boot configuration read from the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use platform::PlatformConfig;

pub const DEFAULT_PORT: u16 = 3000;

/// Parse the listen port; unset or blank means [`DEFAULT_PORT`].
pub fn port_from(raw: Option<&str>) -> Result<u16, String> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(value) => value.parse().map_err(|e| format!("PORT={value}: {e}")),
    }
}

/// Hosted platform settings for the browser, or `None` when not configured.
pub fn platform_from_env() -> Option<PlatformConfig> {
    match PlatformConfig::from_env() {
        Ok(config) => {
            tracing::info!(project = %config.project_id, "platform config loaded");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(error = %e, "platform config missing; account features disabled");
            None
        }
    }
}
