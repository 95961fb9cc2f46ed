//! Configuration
//!
//! Loaded from TOML, then overridden from `PLAYLOG_*` environment variables.
//! Every field has a default, so an empty file is a valid configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Default service route the relay posts to
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8710/service";

/// Default listen address of the endpoint service
pub const DEFAULT_BIND: &str = "127.0.0.1:8710";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylogConfig {
    /// Player license key, applied once before player setup
    pub license_key: Option<String>,
    pub relay: RelayConfig,
    pub server: ServerConfig,
    pub users: Vec<UserConfig>,
    pub contexts: Vec<ContextConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Service route URL
    pub endpoint: String,
    /// Bearer credential sent with every call
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout_ms: 10_000,
        }
    }
}

impl RelayConfig {
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidConfig(format!("relay endpoint '{}': {e}", self.endpoint)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Credential accepted by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: i64,
    pub token: String,
}

/// Context known to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Users allowed to log events here
    #[serde(default)]
    pub members: Vec<i64>,
    /// Any authenticated user may log events here
    #[serde(default)]
    pub open: bool,
}

impl PlaylogConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Apply `PLAYLOG_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("PLAYLOG_LICENSE_KEY") {
            self.license_key = Some(key);
        }
        if let Some(endpoint) = lookup("PLAYLOG_RELAY_ENDPOINT") {
            self.relay.endpoint = endpoint;
        }
        if let Some(token) = lookup("PLAYLOG_RELAY_TOKEN") {
            self.relay.token = Some(token);
        }
        if let Some(bind) = lookup("PLAYLOG_BIND") {
            self.server.bind = bind;
        }
    }

    /// License key, ignoring blank values
    pub fn license_key(&self) -> Option<&str> {
        self.license_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        self.relay.endpoint_url()?;

        let mut context_ids = HashSet::new();
        for context in &self.contexts {
            if !context_ids.insert(context.id) {
                return Err(Error::InvalidConfig(format!("duplicate context id {}", context.id)));
            }
        }

        let mut tokens = HashSet::new();
        for user in &self.users {
            if user.token.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("user {} has an empty token", user.id)));
            }
            if !tokens.insert(user.token.as_str()) {
                return Err(Error::InvalidConfig(format!("user {} reuses a token", user.id)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config = PlaylogConfig::from_toml_str("").unwrap();
        assert_eq!(config.license_key, None);
        assert_eq!(config.relay.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.relay.timeout_ms, 10_000);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = PlaylogConfig::from_toml_str(
            r#"
            license_key = "ABCD-1234"

            [relay]
            endpoint = "https://lms.example.com/service"
            token = "s3cret"

            [server]
            bind = "0.0.0.0:9000"

            [[users]]
            id = 7
            token = "s3cret"

            [[contexts]]
            id = 42
            name = "Course: Rust 101"
            members = [7]

            [[contexts]]
            id = 1
            open = true
            "#,
        )
        .unwrap();

        assert_eq!(config.license_key(), Some("ABCD-1234"));
        assert_eq!(config.relay.token.as_deref(), Some("s3cret"));
        assert_eq!(config.relay.timeout_ms, 10_000);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.contexts.len(), 2);
        assert!(config.contexts[1].open);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PlaylogConfig::default();
        config.apply_overrides(|key| match key {
            "PLAYLOG_LICENSE_KEY" => Some("from-env".to_string()),
            "PLAYLOG_BIND" => Some("0.0.0.0:1".to_string()),
            _ => None,
        });
        assert_eq!(config.license_key(), Some("from-env"));
        assert_eq!(config.server.bind, "0.0.0.0:1");
        assert_eq!(config.relay.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_blank_license_key_ignored() {
        let config = PlaylogConfig {
            license_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(config.license_key(), None);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = PlaylogConfig::default();
        config.relay.endpoint = "not a url".into();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = PlaylogConfig::default();
        config.contexts = vec![
            ContextConfig { id: 1, name: String::new(), members: vec![], open: true },
            ContextConfig { id: 1, name: String::new(), members: vec![], open: false },
        ];
        assert!(config.validate().is_err());

        let mut config = PlaylogConfig::default();
        config.users = vec![
            UserConfig { id: 1, token: "t".into() },
            UserConfig { id: 2, token: "t".into() },
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            PlaylogConfig::from_toml_str("license_key = ["),
            Err(Error::InvalidConfig(_))
        ));
    }
}
