//! # Registry Configuration
//!
//! Knobs that change how the registry treats ambiguous input. The struct is
//! serde-compatible so applications can embed it in their own config files.
//!
//! ```bash
//! # Keep the old "last registration wins" behaviour
//! COMPONENT_REGISTRY_DUPLICATES=replace cargo run
//! ```

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable read by [`RegistryConfig::from_env`].
pub const DUPLICATES_ENV: &str = "COMPONENT_REGISTRY_DUPLICATES";

/// What `create()` does when two factories produce the same component name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`RegistryError::DuplicateName`] and create nothing.
    #[default]
    Reject,
    /// The later registration silently replaces the earlier one (a warning is logged).
    Replace,
}

impl FromStr for DuplicatePolicy {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "replace" => Ok(DuplicatePolicy::Replace),
            other => Err(RegistryError::InvalidArgument(format!(
                "unknown duplicate policy '{other}', expected 'reject' or 'replace'"
            ))),
        }
    }
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub duplicate_names: DuplicatePolicy,
}

impl RegistryConfig {
    /// Builds a config from the environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, RegistryError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(DUPLICATES_ENV) {
            config.duplicate_names = value.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_duplicates() {
        assert_eq!(
            RegistryConfig::default().duplicate_names,
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn parses_policy_case_insensitively() {
        assert_eq!(" Replace ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Replace);
        assert!(matches!(
            "sometimes".parse::<DuplicatePolicy>(),
            Err(RegistryError::InvalidArgument(_))
        ));
    }

    // the only test touching this variable, so it cannot race another test
    #[test]
    fn reads_policy_from_environment() {
        std::env::set_var(DUPLICATES_ENV, "replace");
        assert_eq!(
            RegistryConfig::from_env().unwrap().duplicate_names,
            DuplicatePolicy::Replace
        );

        std::env::set_var(DUPLICATES_ENV, "bogus");
        assert!(matches!(
            RegistryConfig::from_env(),
            Err(RegistryError::InvalidArgument(_))
        ));

        std::env::remove_var(DUPLICATES_ENV);
        assert_eq!(RegistryConfig::from_env().unwrap(), RegistryConfig::default());
    }

    #[test]
    fn deserializes_from_json() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{ "duplicate_names": "replace" }"#).unwrap();
        assert_eq!(config.duplicate_names, DuplicatePolicy::Replace);

        let empty: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RegistryConfig::default());
    }
}
