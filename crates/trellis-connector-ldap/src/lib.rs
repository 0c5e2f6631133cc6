//! # LDAP Connector
//!
//! LDAP directory binding for the trellis connector framework.
//!
//! This crate exposes directory operations (bind, search with paging,
//! lookup, entry and attribute mutations, rename) to a host integration
//! runtime. It contains no protocol logic of its own: every call is
//! delegated to the `ldap3` client, and results are translated into the
//! entry/attribute model.
//!
//! ## Features
//!
//! - LDAP v3 via `ldap3` (rustls TLS, STARTTLS)
//! - Simple and anonymous authentication, with rebind
//! - Paged search results (simple-paged-results control)
//! - Case-insensitive attribute model with LDIF rendering
//!
//! ## Example
//!
//! ```ignore
//! use trellis_connector_ldap::{LdapConfig, LdapConnection, SearchControls};
//!
//! let config = LdapConfig::new("ldap://directory.example.com:389").with_simple_auth();
//! let connection = LdapConnection::new(config)?;
//!
//! connection.bind(Some("cn=admin,dc=example,dc=com"), Some("secret")).await?;
//!
//! let mut results = connection
//!     .search(
//!         "dc=example,dc=com",
//!         "(objectClass=inetOrgPerson)",
//!         &SearchControls::new().with_page_size(500),
//!     )
//!     .await?;
//! while let Some(entry) = results.next_entry().await? {
//!     println!("{}", entry.to_ldif());
//! }
//!
//! connection.close().await?;
//! ```

pub mod config;
pub mod connection;
pub mod entry;
pub mod search;

// Re-exports
pub use config::{AuthMode, LdapConfig, ReferralPolicy};
pub use connection::LdapConnection;
pub use entry::{Attribute, AttributeSet, AttributeValue, Entry};
pub use search::{SearchControls, SearchResults, SearchScope};
