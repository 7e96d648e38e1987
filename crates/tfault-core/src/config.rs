use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{PolicyError, RetryPolicy};

/// Retry policy parameters for one kind of handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of transient failures before giving up (at least 2).
    pub max_attempts: u32,
    /// Wait between attempts in seconds (e.g. 0.25 = 250ms).
    pub wait_interval_secs: f64,
}

impl RetryConfig {
    /// Build the policy this section describes.
    pub fn to_policy(&self) -> Result<RetryPolicy, PolicyError> {
        let secs = self.wait_interval_secs;
        let wait = Duration::try_from_secs_f64(secs)
            .map_err(|_| PolicyError::InvalidWaitInterval { secs })?;
        RetryPolicy::new(self.max_attempts, wait)
    }
}

impl From<RetryPolicy> for RetryConfig {
    fn from(p: RetryPolicy) -> Self {
        Self {
            max_attempts: p.max_attempts(),
            wait_interval_secs: p.wait_interval().as_secs_f64(),
        }
    }
}

/// Global configuration loaded from `~/.config/tfault/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfaultConfig {
    /// Policy for state-changing operations.
    #[serde(default = "default_command")]
    pub command: RetryConfig,
    /// Policy for read-only operations.
    #[serde(default = "default_query")]
    pub query: RetryConfig,
}

fn default_command() -> RetryConfig {
    RetryPolicy::for_commands().into()
}

fn default_query() -> RetryConfig {
    RetryPolicy::for_queries().into()
}

impl Default for TfaultConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            query: default_query(),
        }
    }
}

impl TfaultConfig {
    /// Check that every section builds a valid policy.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.command.to_policy()?;
        self.query.to_policy()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tfault")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TfaultConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<TfaultConfig> {
    if !path.exists() {
        let default_cfg = TfaultConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Read and validate a config file.
pub fn load_from(path: &Path) -> Result<TfaultConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: TfaultConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TfaultConfig::default();
        assert_eq!(cfg.command.max_attempts, 5);
        assert_eq!(cfg.query.max_attempts, 6);
        assert!((cfg.query.wait_interval_secs - 1.0).abs() < 1e-9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TfaultConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TfaultConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            [command]
            max_attempts = 3
            wait_interval_secs = 0.5
        "#;
        let cfg: TfaultConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.command.max_attempts, 3);
        assert_eq!(
            cfg.command.to_policy().unwrap().wait_interval(),
            Duration::from_millis(500)
        );
        // Missing section falls back to the built-in profile.
        assert_eq!(cfg.query, default_query());
    }

    #[test]
    fn invalid_attempts_rejected() {
        let cfg = RetryConfig {
            max_attempts: 1,
            wait_interval_secs: 1.0,
        };
        assert!(matches!(
            cfg.to_policy(),
            Err(PolicyError::InvalidConfiguration { max_attempts: 1, .. })
        ));
    }

    #[test]
    fn negative_or_non_finite_wait_rejected() {
        for secs in [-3.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            let cfg = RetryConfig {
                max_attempts: 2,
                wait_interval_secs: secs,
            };
            assert!(
                matches!(cfg.to_policy(), Err(PolicyError::InvalidWaitInterval { .. })),
                "{} should be rejected",
                secs
            );
        }
    }

    #[test]
    fn wait_beyond_limit_rejected() {
        let cfg = RetryConfig {
            max_attempts: 2,
            wait_interval_secs: 7200.0,
        };
        assert!(matches!(
            cfg.to_policy(),
            Err(PolicyError::WaitIntervalTooLong { .. })
        ));
        let cfg = RetryConfig {
            max_attempts: 2,
            wait_interval_secs: 3600.0,
        };
        assert_eq!(
            cfg.to_policy().unwrap().wait_interval(),
            RetryPolicy::MAX_WAIT_INTERVAL
        );
    }
}
