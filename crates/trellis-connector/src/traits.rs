//! Connector traits
//!
//! The base capability trait implemented by every connector binding.

use async_trait::async_trait;

use crate::error::ConnectorResult;
use crate::types::ConnectorType;

/// Base trait for all connectors.
///
/// Provides the lifecycle surface the host runtime drives, regardless of
/// the protocol-specific operations a binding exposes.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Get the type of this connector.
    fn connector_type(&self) -> ConnectorType;

    /// Get the display name for this connector instance.
    fn display_name(&self) -> &str;

    /// Test the connection to the target system.
    ///
    /// Returns `Ok(())` if the connection is usable, or an error describing
    /// what went wrong.
    async fn test_connection(&self) -> ConnectorResult<()>;

    /// Dispose of connector resources.
    ///
    /// Called when the connector is being removed by its owner.
    /// Implementations should close sessions and release resources.
    async fn dispose(&self) -> ConnectorResult<()>;

    /// Check if the connector is currently healthy.
    ///
    /// A lightweight check, different from `test_connection` which may
    /// perform a round-trip to the target system.
    fn is_healthy(&self) -> bool {
        true
    }
}
