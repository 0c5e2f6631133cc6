//! Connector configuration types
//!
//! Base trait and common configuration structures.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ConnectorResult;
use crate::types::ConnectorType;

/// Trait for connector-specific configuration.
///
/// Each connector type implements this trait to define its configuration
/// schema and validation rules.
pub trait ConnectorConfig: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Get the connector type this configuration is for.
    fn connector_type() -> ConnectorType;

    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid.
    fn validate(&self) -> ConnectorResult<()>;

    /// Get credentials that need to be protected at rest.
    ///
    /// Returns a list of (field_name, value) pairs for sensitive data.
    fn get_credentials(&self) -> Vec<(&'static str, String)>;

    /// Create a redacted version of this config (for logging/display).
    ///
    /// Sensitive fields should be replaced with placeholders.
    fn redacted(&self) -> Self;
}

/// Common connection settings shared across connector types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Read timeout in seconds, applied per operation.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Initial connection pool size. Pooling is enabled when this is
    /// greater than zero.
    #[serde(default)]
    pub initial_pool_size: u32,

    /// Maximum connection pool size (0 = client default).
    #[serde(default)]
    pub max_pool_size: u32,

    /// Idle timeout in seconds for pooled connections (0 = client default).
    #[serde(default)]
    pub pool_timeout_secs: u64,
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    60
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connection_timeout_secs: default_connection_timeout(),
            read_timeout_secs: default_read_timeout(),
            initial_pool_size: 0,
            max_pool_size: 0,
            pool_timeout_secs: 0,
        }
    }
}

impl ConnectionSettings {
    /// Create new connection settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    pub fn with_connection_timeout(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set the read timeout.
    pub fn with_read_timeout(mut self, secs: u64) -> Self {
        self.read_timeout_secs = secs;
        self
    }

    /// Set initial and maximum pool sizes.
    pub fn with_pool(mut self, initial: u32, max: u32) -> Self {
        self.initial_pool_size = initial;
        self.max_pool_size = max;
        self
    }

    /// Set the pool idle timeout.
    pub fn with_pool_timeout(mut self, secs: u64) -> Self {
        self.pool_timeout_secs = secs;
        self
    }

    /// Whether connection pooling is enabled.
    pub fn pooling_enabled(&self) -> bool {
        self.initial_pool_size > 0
    }

    /// Get connection timeout as Duration.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get read timeout as Duration.
    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.read_timeout_secs)
    }
}

/// SSL/TLS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether to verify the server certificate.
    #[serde(default = "default_true")]
    pub verify_certificate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_certificate: true,
        }
    }
}

impl TlsConfig {
    /// Validate the TLS configuration and log security warnings.
    ///
    /// Should be called after deserializing TLS configuration from external
    /// sources to detect insecure configurations.
    pub fn validate_security(&self) {
        if !self.verify_certificate {
            tracing::warn!(
                target: "security",
                "TLS certificate verification is DISABLED; the connection is \
                 vulnerable to man-in-the-middle attacks"
            );
        }
    }

    /// Create a TLS config with certificate verification disabled.
    ///
    /// # Warning
    ///
    /// **SECURITY RISK**: only suitable for local development and testing.
    pub fn insecure() -> Self {
        tracing::warn!(
            target: "security",
            "TLS certificate verification disabled - THIS IS INSECURE"
        );
        Self {
            verify_certificate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_settings_defaults() {
        let settings = ConnectionSettings::default();
        assert_eq!(settings.connection_timeout_secs, 30);
        assert_eq!(settings.read_timeout_secs, 60);
        assert_eq!(settings.initial_pool_size, 0);
        assert_eq!(settings.max_pool_size, 0);
        assert!(!settings.pooling_enabled());
    }

    #[test]
    fn test_connection_settings_builder() {
        let settings = ConnectionSettings::new()
            .with_connection_timeout(60)
            .with_pool(2, 10)
            .with_pool_timeout(300);

        assert_eq!(settings.connection_timeout_secs, 60);
        assert_eq!(settings.initial_pool_size, 2);
        assert_eq!(settings.max_pool_size, 10);
        assert_eq!(settings.pool_timeout_secs, 300);
        assert!(settings.pooling_enabled());
    }

    #[test]
    fn test_connection_settings_durations() {
        let settings = ConnectionSettings::new().with_read_timeout(5);
        assert_eq!(settings.read_timeout(), std::time::Duration::from_secs(5));
        assert_eq!(
            settings.connection_timeout(),
            std::time::Duration::from_secs(30)
        );
    }

    #[test]
    fn test_tls_config_defaults() {
        let tls = TlsConfig::default();
        assert!(tls.verify_certificate);
    }

    #[test]
    fn test_tls_config_insecure() {
        let tls = TlsConfig::insecure();
        assert!(!tls.verify_certificate);
    }

    #[test]
    fn test_connection_settings_serde_defaults() {
        let settings: ConnectionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.connection_timeout_secs, 30);
        assert!(!settings.pooling_enabled());
    }
}
