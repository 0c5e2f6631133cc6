//! LDAP connector configuration
//!
//! Configuration types for LDAP directory connections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use trellis_connector::config::{ConnectionSettings, ConnectorConfig, TlsConfig};
use trellis_connector::error::{ConnectorError, ConnectorResult};
use trellis_connector::types::ConnectorType;

/// Authentication mode for the directory session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Anonymous bind.
    #[default]
    None,
    /// Simple bind with a DN and password.
    Simple,
}

impl AuthMode {
    /// Get the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "none",
            AuthMode::Simple => "simple",
        }
    }

    /// Whether this mode carries no credentials.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthMode::None)
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How directory referrals are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralPolicy {
    /// Treat referral results as success.
    #[default]
    Ignore,
    /// Chase referrals (not supported by the underlying client; rejected
    /// at validation time).
    Follow,
    /// Surface referral results as errors.
    Throw,
}

impl ReferralPolicy {
    /// Get the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralPolicy::Ignore => "ignore",
            ReferralPolicy::Follow => "follow",
            ReferralPolicy::Throw => "throw",
        }
    }
}

impl fmt::Display for ReferralPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the LDAP connector.
///
/// Bind identity and credential are not part of the configuration; they are
/// passed to `LdapConnection::bind` and replayed by `rebind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// Provider URL (`ldap://host:port` or `ldaps://host:port`).
    pub url: String,

    /// Authentication mode.
    #[serde(default)]
    pub auth: AuthMode,

    /// Referral handling policy.
    #[serde(default)]
    pub referral: ReferralPolicy,

    /// Upgrade a plain connection with STARTTLS.
    #[serde(default)]
    pub use_starttls: bool,

    /// Connection settings (timeouts, pool sizing).
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// TLS configuration.
    #[serde(default)]
    pub tls: TlsConfig,

    /// Extended properties forwarded verbatim into the connection
    /// environment.
    #[serde(default)]
    pub extended: BTreeMap<String, String>,
}

impl LdapConfig {
    /// Create a new LDAP config for the given provider URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: AuthMode::default(),
            referral: ReferralPolicy::default(),
            use_starttls: false,
            connection: ConnectionSettings::default(),
            tls: TlsConfig::default(),
            extended: BTreeMap::new(),
        }
    }

    /// Use simple authentication.
    #[must_use]
    pub fn with_simple_auth(mut self) -> Self {
        self.auth = AuthMode::Simple;
        self
    }

    /// Set the referral policy.
    #[must_use]
    pub fn with_referral(mut self, referral: ReferralPolicy) -> Self {
        self.referral = referral;
        self
    }

    /// Enable STARTTLS.
    #[must_use]
    pub fn with_starttls(mut self) -> Self {
        self.use_starttls = true;
        self
    }

    /// Set connection settings.
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Set TLS configuration.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Add an extended property.
    #[must_use]
    pub fn with_extended(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extended.insert(key.into(), value.into());
        self
    }

    /// Whether the provider URL uses the `ldaps` scheme.
    pub fn is_ldaps(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| u.scheme().eq_ignore_ascii_case("ldaps"))
            .unwrap_or(false)
    }

    /// Host portion of the provider URL, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Assemble the effective connection-environment property map.
    ///
    /// Pooling keys are present only when pooling is enabled, and only the
    /// pool parameters that are set. Extended properties are merged last,
    /// verbatim. Credentials are never included.
    pub fn environment(&self, principal: Option<&str>) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        env.insert("url".to_string(), self.url.clone());
        env.insert("authentication".to_string(), self.auth.to_string());
        env.insert("referral".to_string(), self.referral.to_string());

        if !self.auth.is_anonymous() {
            if let Some(dn) = principal {
                env.insert("principal".to_string(), dn.to_string());
            }
        }

        let pool = &self.connection;
        if pool.pooling_enabled() {
            env.insert("pool.enabled".to_string(), "true".to_string());
            env.insert("pool.authentication".to_string(), self.auth.to_string());
            env.insert(
                "pool.initial_size".to_string(),
                pool.initial_pool_size.to_string(),
            );
            if pool.max_pool_size > 0 {
                env.insert("pool.max_size".to_string(), pool.max_pool_size.to_string());
            }
            if pool.pool_timeout_secs > 0 {
                env.insert(
                    "pool.timeout_secs".to_string(),
                    pool.pool_timeout_secs.to_string(),
                );
            }
        } else {
            env.insert("pool.enabled".to_string(), "false".to_string());
        }

        for (key, value) in &self.extended {
            env.insert(key.clone(), value.clone());
        }

        env
    }
}

impl ConnectorConfig for LdapConfig {
    fn connector_type() -> ConnectorType {
        ConnectorType::Ldap
    }

    fn validate(&self) -> ConnectorResult<()> {
        let url = Url::parse(&self.url).map_err(|e| ConnectorError::InvalidConfiguration {
            message: format!("invalid provider URL '{}': {}", self.url, e),
        })?;

        let scheme = url.scheme().to_ascii_lowercase();
        if scheme != "ldap" && scheme != "ldaps" {
            return Err(ConnectorError::InvalidConfiguration {
                message: format!("unsupported URL scheme '{scheme}', expected ldap or ldaps"),
            });
        }

        if url.host_str().is_none() {
            return Err(ConnectorError::InvalidConfiguration {
                message: "provider URL has no host".to_string(),
            });
        }

        if self.use_starttls && scheme == "ldaps" {
            return Err(ConnectorError::InvalidConfiguration {
                message: "cannot use STARTTLS with an ldaps URL".to_string(),
            });
        }

        if self.referral == ReferralPolicy::Follow {
            return Err(ConnectorError::InvalidConfiguration {
                message: "referral policy 'follow' is not supported; use 'ignore' or 'throw'"
                    .to_string(),
            });
        }

        let pool = &self.connection;
        if pool.max_pool_size > 0 && pool.initial_pool_size > pool.max_pool_size {
            return Err(ConnectorError::InvalidConfiguration {
                message: format!(
                    "initial pool size {} exceeds maximum pool size {}",
                    pool.initial_pool_size, pool.max_pool_size
                ),
            });
        }

        Ok(())
    }

    fn get_credentials(&self) -> Vec<(&'static str, String)> {
        // Bind credentials are call parameters, not configuration.
        Vec::new()
    }

    fn redacted(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LdapConfig::new("ldap://directory.example.com:389");
        assert_eq!(config.auth, AuthMode::None);
        assert_eq!(config.referral, ReferralPolicy::Ignore);
        assert!(!config.use_starttls);
        assert!(config.extended.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_host() {
        let config = LdapConfig::new("ldaps://directory.example.com:636");
        assert_eq!(config.host().as_deref(), Some("directory.example.com"));
        assert!(config.is_ldaps());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = LdapConfig::new("http://directory.example.com");
        assert!(config.validate().is_err());

        let config = LdapConfig::new("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_starttls_over_ldaps() {
        let config = LdapConfig::new("ldaps://directory.example.com:636").with_starttls();
        assert!(config.validate().is_err());

        let config = LdapConfig::new("ldap://directory.example.com:389").with_starttls();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_follow_referrals() {
        let config =
            LdapConfig::new("ldap://directory.example.com").with_referral(ReferralPolicy::Follow);
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_validate_pool_sizes() {
        let mut config = LdapConfig::new("ldap://directory.example.com");
        config.connection.initial_pool_size = 10;
        config.connection.max_pool_size = 5;
        assert!(config.validate().is_err());

        config.connection.max_pool_size = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_without_pooling() {
        let config = LdapConfig::new("ldap://directory.example.com").with_simple_auth();
        let env = config.environment(Some("cn=admin,dc=example,dc=com"));

        assert_eq!(env.get("url").unwrap(), "ldap://directory.example.com");
        assert_eq!(env.get("authentication").unwrap(), "simple");
        assert_eq!(env.get("referral").unwrap(), "ignore");
        assert_eq!(env.get("principal").unwrap(), "cn=admin,dc=example,dc=com");
        assert_eq!(env.get("pool.enabled").unwrap(), "false");
        assert!(!env.contains_key("pool.initial_size"));
        assert!(!env.contains_key("pool.max_size"));
    }

    #[test]
    fn test_environment_with_pooling() {
        let mut config = LdapConfig::new("ldap://directory.example.com");
        config.connection.initial_pool_size = 2;
        config.connection.max_pool_size = 8;

        let env = config.environment(None);
        assert_eq!(env.get("pool.enabled").unwrap(), "true");
        assert_eq!(env.get("pool.authentication").unwrap(), "none");
        assert_eq!(env.get("pool.initial_size").unwrap(), "2");
        assert_eq!(env.get("pool.max_size").unwrap(), "8");
        // Idle timeout unset, so the key is absent.
        assert!(!env.contains_key("pool.timeout_secs"));
    }

    #[test]
    fn test_environment_anonymous_has_no_principal() {
        let config = LdapConfig::new("ldap://directory.example.com");
        let env = config.environment(Some("cn=admin,dc=example,dc=com"));
        assert!(!env.contains_key("principal"));
    }

    #[test]
    fn test_environment_extended_merged_verbatim() {
        let config = LdapConfig::new("ldap://directory.example.com")
            .with_extended("binary_attributes", "objectGUID jpegPhoto")
            .with_extended("referral", "overridden");

        let env = config.environment(None);
        assert_eq!(
            env.get("binary_attributes").unwrap(),
            "objectGUID jpegPhoto"
        );
        // Extended properties win over assembled keys.
        assert_eq!(env.get("referral").unwrap(), "overridden");
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = LdapConfig::new("ldap://directory.example.com:389")
            .with_simple_auth()
            .with_referral(ReferralPolicy::Throw)
            .with_extended("binary", "objectGUID");

        let json = serde_json::to_string(&config).unwrap();
        let parsed: LdapConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.url, "ldap://directory.example.com:389");
        assert_eq!(parsed.auth, AuthMode::Simple);
        assert_eq!(parsed.referral, ReferralPolicy::Throw);
        assert_eq!(parsed.extended.get("binary").unwrap(), "objectGUID");
    }

    #[test]
    fn test_config_serde_defaults() {
        let parsed: LdapConfig =
            serde_json::from_str(r#"{"url": "ldap://directory.example.com"}"#).unwrap();
        assert_eq!(parsed.auth, AuthMode::None);
        assert_eq!(parsed.referral, ReferralPolicy::Ignore);
        assert_eq!(parsed.connection.connection_timeout_secs, 30);
    }
}
