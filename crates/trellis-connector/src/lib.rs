//! # Connector Framework
//!
//! Core abstractions for connecting an integration runtime to external
//! systems.
//!
//! This crate provides the foundation protocol bindings build on: a shared
//! error type with transient/permanent classification, the configuration
//! trait and common connection settings, and the base [`Connector`]
//! capability trait the host runtime drives.
//!
//! ## Crate Organization
//!
//! - [`error`] - Error types with transient/permanent classification
//! - [`config`] - Configuration trait and shared settings structures
//! - [`traits`] - The base `Connector` capability trait
//! - [`types`] - Connector type enum
//!
//! [`Connector`]: traits::Connector

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use trellis_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConnectionSettings, ConnectorConfig, TlsConfig};
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::traits::Connector;
    pub use crate::types::ConnectorType;
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _ct = ConnectorType::Ldap;
        let _settings = ConnectionSettings::default();
        let _tls = TlsConfig::default();
        let err = ConnectorError::NotBound;
        assert!(err.is_permanent());
    }
}
