//! Connector type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of connector for external system integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    /// LDAP/Active Directory connector
    Ldap,
    /// Database connector
    Database,
    /// REST API connector
    Rest,
}

impl ConnectorType {
    /// Get all available connector types.
    #[must_use]
    pub fn all() -> &'static [ConnectorType] {
        &[
            ConnectorType::Ldap,
            ConnectorType::Database,
            ConnectorType::Rest,
        ]
    }

    /// Get the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorType::Ldap => "ldap",
            ConnectorType::Database => "database",
            ConnectorType::Rest => "rest",
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectorType {
    type Err = ParseConnectorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ldap" => Ok(ConnectorType::Ldap),
            "database" => Ok(ConnectorType::Database),
            "rest" => Ok(ConnectorType::Rest),
            _ => Err(ParseConnectorTypeError(s.to_string())),
        }
    }
}

/// Error parsing connector type from string.
#[derive(Debug, Clone)]
pub struct ParseConnectorTypeError(String);

impl fmt::Display for ParseConnectorTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid connector type '{}', expected one of: ldap, database, rest",
            self.0
        )
    }
}

impl std::error::Error for ParseConnectorTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_type_round_trip() {
        for ct in ConnectorType::all() {
            let parsed: ConnectorType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, *ct);
        }
    }

    #[test]
    fn test_connector_type_display() {
        assert_eq!(ConnectorType::Ldap.to_string(), "ldap");
    }

    #[test]
    fn test_connector_type_parse_invalid() {
        assert!("carrier-pigeon".parse::<ConnectorType>().is_err());
    }

    #[test]
    fn test_connector_type_serde() {
        let json = serde_json::to_string(&ConnectorType::Ldap).unwrap();
        assert_eq!(json, "\"ldap\"");
        let parsed: ConnectorType = serde_json::from_str("\"rest\"").unwrap();
        assert_eq!(parsed, ConnectorType::Rest);
    }
}
