//! Crate configuration.
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal (or absent) config files
//! - Validation separates syntactic (serde) from semantic checks

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration for the lifecycle subsystem.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub shutdown: ShutdownConfig,
    pub grace: GraceConfig,
    pub admin: AdminConfig,
}

/// Shutdown detection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Interval between polls of the host's shutdown-requested indicator,
    /// in seconds.
    pub poll_interval_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
        }
    }
}

/// Outer grace budget a host may allow between cancellation and forced
/// process exit. The coordinator itself never enforces a timeout on
/// individual workers; this is host-integration policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraceConfig {
    pub grace_period_secs: u64,
}

impl Default for GraceConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 15,
        }
    }
}

/// Admin-surface access restrictions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Comma-separated user allow-list ("alice, bob"). Empty means any
    /// authenticated user is allowed.
    pub users: String,
    /// Comma-separated role allow-list ("staff, admin").
    pub roles: String,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WardenConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: WardenConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &WardenConfig) -> Result<(), ConfigError> {
    if config.shutdown.poll_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "shutdown.poll_interval_secs must be greater than zero".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = WardenConfig::default();
        assert_eq!(config.shutdown.poll_interval_secs, 10);
        assert_eq!(config.grace.grace_period_secs, 15);
        assert!(config.admin.users.is_empty());
    }

    #[test]
    fn parses_partial_toml() {
        let config: WardenConfig = toml::from_str(
            r#"
            [shutdown]
            poll_interval_secs = 3

            [admin]
            roles = "staff, admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.shutdown.poll_interval_secs, 3);
        assert_eq!(config.grace.grace_period_secs, 15);
        assert_eq!(config.admin.roles, "staff, admin");
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let config: WardenConfig = toml::from_str("[shutdown]\npoll_interval_secs = 0\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
