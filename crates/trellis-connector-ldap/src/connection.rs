//! LDAP connection wrapper
//!
//! `LdapConnection` holds the configuration and, once bound, an open
//! session handle. Every directory operation is a single delegated call to
//! the underlying client with uniform error translation; there is no retry
//! and no partial-failure handling.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{
    Ldap, LdapConnAsync, LdapConnSettings, LdapResult, Mod, Scope, SearchEntry,
    SearchResult as RawSearchResult,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use trellis_connector::config::ConnectorConfig;
use trellis_connector::error::{ConnectorError, ConnectorResult};
use trellis_connector::traits::Connector;
use trellis_connector::types::ConnectorType;

use crate::config::{AuthMode, LdapConfig, ReferralPolicy};
use crate::entry::{Attribute, Entry};
use crate::search::{SearchControls, SearchResults};

/// Identity used for the current bind, replayed by `rebind`.
#[derive(Clone)]
struct BoundIdentity {
    dn: Option<String>,
    credential: Option<String>,
}

/// A connection to an LDAP directory.
///
/// Not a pool: one open session, exclusively owned. Callers serialize
/// access or use one connection per concurrent caller.
pub struct LdapConnection {
    /// Configuration.
    config: LdapConfig,

    /// Display name for this connection instance.
    display_name: String,

    /// The open session handle, present while bound.
    conn: Arc<RwLock<Option<Ldap>>>,

    /// Identity of the last successful bind.
    bound: Arc<RwLock<Option<BoundIdentity>>>,
}

impl LdapConnection {
    /// Create a new connection for the given configuration.
    ///
    /// The connection starts unbound; call [`bind`](Self::bind) before
    /// issuing directory operations.
    pub fn new(config: LdapConfig) -> ConnectorResult<Self> {
        config.validate()?;
        config.tls.validate_security();

        let display_name = format!(
            "LDAP: {}",
            config.host().unwrap_or_else(|| config.url.clone())
        );

        Ok(Self {
            config,
            display_name,
            conn: Arc::new(RwLock::new(None)),
            bound: Arc::new(RwLock::new(None)),
        })
    }

    /// The configuration this connection was created with.
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    /// Whether the connection currently has no open session.
    pub async fn is_closed(&self) -> bool {
        self.conn.read().await.is_none()
    }

    /// DN of the currently bound identity; `None` when anonymous or
    /// closed.
    pub async fn bound_dn(&self) -> Option<String> {
        if self.conn.read().await.is_none() {
            return None;
        }
        self.bound.read().await.as_ref().and_then(|b| b.dn.clone())
    }

    /// Open a session and bind with the given identity.
    ///
    /// An already-open session is closed first. For `simple`
    /// authentication a non-empty DN is required; for `none` the identity
    /// is ignored and an anonymous bind is performed.
    #[instrument(skip(self, credential))]
    pub async fn bind(&self, dn: Option<&str>, credential: Option<&str>) -> ConnectorResult<()> {
        if !self.is_closed().await {
            let previous = self.bound_dn().await;
            info!(
                previous = previous.as_deref().unwrap_or("anonymous"),
                "already bound; closing existing session first"
            );
            self.close().await?;
        }

        if self.config.auth == AuthMode::Simple && dn.map_or(true, str::is_empty) {
            return Err(ConnectorError::InvalidConfiguration {
                message: "simple authentication requires a bind DN".to_string(),
            });
        }

        debug!(environment = ?self.config.environment(dn), "opening directory session");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.connection.connection_timeout())
            .set_starttls(self.config.use_starttls)
            .set_no_tls_verify(!self.config.tls.verify_certificate);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source(
                    format!("failed to connect to {}", self.config.url),
                    e,
                )
            })?;

        // Drive the connection on its own task for the lifetime of the
        // session.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "connection driver error");
            }
        });

        let (bind_dn, bind_credential) = match self.config.auth {
            AuthMode::Simple => (dn.unwrap_or(""), credential.unwrap_or("")),
            AuthMode::None => ("", ""),
        };

        let result = ldap
            .simple_bind(bind_dn, bind_credential)
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source(
                    format!("bind failed for {}", self.config.url),
                    e,
                )
            })?;

        if result.rc == 49 {
            return Err(ConnectorError::AuthenticationFailed);
        }
        if result.rc != 0 {
            return Err(ConnectorError::connection_failed(format!(
                "bind failed with code {}: {}",
                result.rc, result.text
            )));
        }

        *self.conn.write().await = Some(ldap);
        *self.bound.write().await = Some(BoundIdentity {
            dn: dn.map(str::to_string),
            credential: credential.map(str::to_string),
        });

        info!(
            url = %self.config.url,
            auth = %self.config.auth,
            principal = dn.unwrap_or("anonymous"),
            "bound to directory"
        );

        Ok(())
    }

    /// Re-bind using the identity of the current bind.
    ///
    /// Fails with [`ConnectorError::NotBound`] if the connection is not
    /// currently bound.
    #[instrument(skip(self))]
    pub async fn rebind(&self) -> ConnectorResult<()> {
        if self.is_closed().await {
            return Err(ConnectorError::NotBound);
        }
        let identity = self
            .bound
            .read()
            .await
            .clone()
            .ok_or(ConnectorError::NotBound)?;

        self.bind(identity.dn.as_deref(), identity.credential.as_deref())
            .await
    }

    /// Close the session. Closing an unbound connection is a no-op.
    pub async fn close(&self) -> ConnectorResult<()> {
        let mut guard = self.conn.write().await;
        if let Some(mut ldap) = guard.take() {
            if let Err(e) = ldap.unbind().await {
                warn!(error = %e, "error during unbind");
            }
            info!("connection closed");
        }
        Ok(())
    }

    /// Search the directory under `base` with the given filter.
    ///
    /// When paging is requested the search runs over a derived session
    /// carrying the paged-results control and the returned sequence fetches
    /// pages lazily; otherwise the sequence wraps the client's in-memory
    /// result list.
    #[instrument(skip(self, controls))]
    pub async fn search(
        &self,
        base: &str,
        filter: &str,
        controls: &SearchControls,
    ) -> ConnectorResult<SearchResults> {
        let ldap = self.handle().await?;

        debug!(paging = controls.paging_enabled(), "searching directory");

        if controls.paging_enabled() {
            return SearchResults::open_paged(
                ldap,
                base,
                filter,
                controls,
                self.config.referral,
                self.read_timeout(),
            )
            .await;
        }

        let mut ldap = ldap;
        let result = ldap
            .with_search_options(controls.client_options())
            .with_timeout(self.read_timeout())
            .search(
                base,
                controls.scope.as_scope(),
                filter,
                controls.requested_attributes(),
            )
            .await
            .map_err(|e| ConnectorError::operation_failed_with_source("search failed", e))?;

        let RawSearchResult(entries, res) = result;
        self.check_result(res, "search", base)?;

        Ok(SearchResults::eager(
            entries
                .into_iter()
                .map(|entry| Entry::from(SearchEntry::construct(entry)))
                .collect(),
        ))
    }

    /// Search with `{n}` placeholders in the filter substituted by the
    /// given arguments, escaped per RFC 4515.
    #[instrument(skip(self, controls))]
    pub async fn search_with_args(
        &self,
        base: &str,
        filter: &str,
        args: &[&str],
        controls: &SearchControls,
    ) -> ConnectorResult<SearchResults> {
        let expanded = apply_filter_args(filter, args);
        self.search(base, &expanded, controls).await
    }

    /// Fetch a single entry's attributes.
    #[instrument(skip(self))]
    pub async fn lookup(&self, dn: &str) -> ConnectorResult<Entry> {
        self.do_lookup(dn, None).await
    }

    /// Fetch a single entry, restricted to the named attributes.
    #[instrument(skip(self))]
    pub async fn lookup_with_attrs(&self, dn: &str, attributes: &[&str]) -> ConnectorResult<Entry> {
        self.do_lookup(dn, Some(attributes)).await
    }

    async fn do_lookup(&self, dn: &str, attributes: Option<&[&str]>) -> ConnectorResult<Entry> {
        let mut ldap = self.handle().await?;

        let wanted: Vec<String> = match attributes {
            Some(names) => names.iter().map(|s| s.to_string()).collect(),
            None => vec!["*".to_string()],
        };

        let result = ldap
            .with_timeout(self.read_timeout())
            .search(dn, Scope::Base, "(objectClass=*)", wanted)
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(format!("lookup failed for {dn}"), e)
            })?;

        let RawSearchResult(entries, res) = result;
        self.check_result(res, "lookup", dn)?;

        entries
            .into_iter()
            .next()
            .map(|entry| Entry::from(SearchEntry::construct(entry)))
            .ok_or_else(|| ConnectorError::ObjectNotFound {
                identifier: dn.to_string(),
            })
    }

    /// Add a new entry.
    #[instrument(skip(self, entry), fields(dn = %entry.dn()))]
    pub async fn add_entry(&self, entry: &Entry) -> ConnectorResult<()> {
        let mut ldap = self.handle().await?;

        let attributes: Vec<(Vec<u8>, HashSet<Vec<u8>>)> = entry
            .attributes()
            .iter()
            .map(|attribute| {
                (
                    attribute.name().as_bytes().to_vec(),
                    modification_values(attribute),
                )
            })
            .collect();

        let result = ldap
            .with_timeout(self.read_timeout())
            .add(entry.dn(), attributes)
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(
                    format!("add entry failed for {}", entry.dn()),
                    e,
                )
            })?;

        self.check_result(result, "add entry", entry.dn())?;
        info!(dn = %entry.dn(), "entry added");
        Ok(())
    }

    /// Update an entry, replacing every attribute the entry carries.
    #[instrument(skip(self, entry), fields(dn = %entry.dn()))]
    pub async fn update_entry(&self, entry: &Entry) -> ConnectorResult<()> {
        let mods: Vec<Mod<Vec<u8>>> = entry
            .attributes()
            .iter()
            .map(|attribute| {
                Mod::Replace(
                    attribute.name().as_bytes().to_vec(),
                    modification_values(attribute),
                )
            })
            .collect();

        if mods.is_empty() {
            return Ok(());
        }

        let mut ldap = self.handle().await?;
        let result = ldap
            .with_timeout(self.read_timeout())
            .modify(entry.dn(), mods)
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(
                    format!("update entry failed for {}", entry.dn()),
                    e,
                )
            })?;

        self.check_result(result, "update entry", entry.dn())?;
        info!(dn = %entry.dn(), "entry updated");
        Ok(())
    }

    /// Delete an entry.
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, dn: &str) -> ConnectorResult<()> {
        let mut ldap = self.handle().await?;

        let result = ldap
            .with_timeout(self.read_timeout())
            .delete(dn)
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(
                    format!("delete entry failed for {dn}"),
                    e,
                )
            })?;

        self.check_result(result, "delete entry", dn)?;
        info!(dn, "entry deleted");
        Ok(())
    }

    /// Rename an entry to a new DN.
    ///
    /// The new DN's leading RDN becomes the entry's new relative name; the
    /// remainder, when present, is the new superior. The old RDN is not
    /// retained as an attribute value.
    #[instrument(skip(self))]
    pub async fn rename_entry(&self, old_dn: &str, new_dn: &str) -> ConnectorResult<()> {
        let (rdn, superior) = split_dn(new_dn)?;

        let mut ldap = self.handle().await?;
        let result = ldap
            .with_timeout(self.read_timeout())
            .modifydn(old_dn, rdn, true, superior)
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(
                    format!("rename entry failed for {old_dn}"),
                    e,
                )
            })?;

        self.check_result(result, "rename entry", old_dn)?;
        info!(old_dn, new_dn, "entry renamed");
        Ok(())
    }

    /// Add an attribute (or values to an existing attribute) on an entry.
    #[instrument(skip(self, attribute), fields(attribute = %attribute.name()))]
    pub async fn add_attribute(&self, dn: &str, attribute: &Attribute) -> ConnectorResult<()> {
        self.modify_one(
            dn,
            Mod::Add(
                attribute.name().as_bytes().to_vec(),
                modification_values(attribute),
            ),
            "add attribute",
        )
        .await
    }

    /// Replace an attribute's values on an entry.
    #[instrument(skip(self, attribute), fields(attribute = %attribute.name()))]
    pub async fn update_attribute(&self, dn: &str, attribute: &Attribute) -> ConnectorResult<()> {
        self.modify_one(
            dn,
            Mod::Replace(
                attribute.name().as_bytes().to_vec(),
                modification_values(attribute),
            ),
            "update attribute",
        )
        .await
    }

    /// Remove an attribute's values (or the whole attribute) from an
    /// entry.
    #[instrument(skip(self, attribute), fields(attribute = %attribute.name()))]
    pub async fn delete_attribute(&self, dn: &str, attribute: &Attribute) -> ConnectorResult<()> {
        self.modify_one(
            dn,
            Mod::Delete(
                attribute.name().as_bytes().to_vec(),
                modification_values(attribute),
            ),
            "delete attribute",
        )
        .await
    }

    async fn modify_one(
        &self,
        dn: &str,
        modification: Mod<Vec<u8>>,
        op: &'static str,
    ) -> ConnectorResult<()> {
        let mut ldap = self.handle().await?;

        let result = ldap
            .with_timeout(self.read_timeout())
            .modify(dn, vec![modification])
            .await
            .map_err(|e| {
                ConnectorError::operation_failed_with_source(format!("{op} failed for {dn}"), e)
            })?;

        self.check_result(result, op, dn)?;
        info!(dn, operation = op, "attribute modified");
        Ok(())
    }

    /// Get a derived handle to the open session.
    async fn handle(&self) -> ConnectorResult<Ldap> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or(ConnectorError::NotBound)
    }

    fn read_timeout(&self) -> Duration {
        self.config.connection.read_timeout()
    }

    fn check_result(&self, result: LdapResult, op: &str, target: &str) -> ConnectorResult<()> {
        match result_error(op, result.rc, &result.text, target, self.config.referral) {
            None => Ok(()),
            Some(err) => {
                warn!(
                    operation = op,
                    rc = result.rc,
                    target,
                    "directory operation failed"
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Connector for LdapConnection {
    fn connector_type(&self) -> ConnectorType {
        ConnectorType::Ldap
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    #[instrument(skip(self))]
    async fn test_connection(&self) -> ConnectorResult<()> {
        let mut ldap = self.handle().await?;

        let result = ldap
            .with_timeout(self.read_timeout())
            .search(
                "",
                Scope::Base,
                "(objectClass=*)",
                vec!["supportedLDAPVersion"],
            )
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source("root DSE search failed", e)
            })?;

        let RawSearchResult(_entries, res) = result;
        self.check_result(res, "test connection", "root DSE")?;

        info!("connection test successful");
        Ok(())
    }

    async fn dispose(&self) -> ConnectorResult<()> {
        self.close().await
    }

    fn is_healthy(&self) -> bool {
        self.conn
            .try_read()
            .map(|guard| guard.is_some())
            .unwrap_or(true)
    }
}

impl std::fmt::Debug for LdapConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConnection")
            .field("display_name", &self.display_name)
            .field("config", &self.config.redacted())
            .finish()
    }
}

/// Translate an LDAP result code into a connector error. `None` means the
/// result is a success under the given referral policy.
pub(crate) fn result_error(
    op: &str,
    rc: u32,
    text: &str,
    target: &str,
    referral: ReferralPolicy,
) -> Option<ConnectorError> {
    match rc {
        0 => None,
        // referral
        10 => match referral {
            ReferralPolicy::Throw => Some(ConnectorError::operation_failed(format!(
                "{op} returned a referral for {target}: {text}"
            ))),
            _ => None,
        },
        // constraintViolation / objectClassViolation
        19 | 65 => Some(ConnectorError::ConstraintViolation {
            message: format!("{op} failed for {target}: {text}"),
        }),
        // noSuchObject
        32 => Some(ConnectorError::ObjectNotFound {
            identifier: target.to_string(),
        }),
        // invalidCredentials
        49 => Some(ConnectorError::AuthenticationFailed),
        // insufficientAccessRights
        50 => Some(ConnectorError::AuthorizationFailed {
            operation: op.to_string(),
        }),
        // entryAlreadyExists
        68 => Some(ConnectorError::ObjectAlreadyExists {
            identifier: target.to_string(),
        }),
        _ => Some(ConnectorError::operation_failed(format!(
            "{op} failed with code {rc}: {text}"
        ))),
    }
}

/// Substitute `{n}` placeholders with escaped argument values.
fn apply_filter_args(filter: &str, args: &[&str]) -> String {
    let mut expanded = filter.to_string();
    for (index, arg) in args.iter().enumerate() {
        let placeholder = format!("{{{index}}}");
        expanded = expanded.replace(&placeholder, &escape_filter_value(arg));
    }
    expanded
}

/// Escape special characters in filter values (RFC 4515).
fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// Split a DN into its leading RDN and the remaining superior DN,
/// honoring backslash escapes.
fn split_dn(dn: &str) -> ConnectorResult<(&str, Option<&str>)> {
    let trimmed = dn.trim();
    if trimmed.is_empty() {
        return Err(ConnectorError::InvalidData {
            message: "DN must not be empty".to_string(),
        });
    }

    let mut split_at = None;
    let mut escaped = false;
    for (index, ch) in trimmed.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            ',' => {
                split_at = Some(index);
                break;
            }
            _ => {}
        }
    }

    let (rdn, superior) = match split_at {
        Some(index) => {
            let superior = trimmed[index + 1..].trim();
            (
                trimmed[..index].trim(),
                (!superior.is_empty()).then_some(superior),
            )
        }
        None => (trimmed, None),
    };

    if !rdn.contains('=') {
        return Err(ConnectorError::InvalidData {
            message: format!("'{rdn}' is not a valid relative DN"),
        });
    }

    Ok((rdn, superior))
}

fn modification_values(attribute: &Attribute) -> HashSet<Vec<u8>> {
    attribute
        .values()
        .iter()
        .map(|value| value.as_bytes().to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AttributeValue;

    fn test_config() -> LdapConfig {
        LdapConfig::new("ldap://directory.example.com:389")
    }

    #[test]
    fn test_new_validates_config() {
        assert!(LdapConnection::new(test_config()).is_ok());
        assert!(LdapConnection::new(LdapConfig::new("not a url")).is_err());
    }

    #[test]
    fn test_display_name_and_type() {
        let conn = LdapConnection::new(test_config()).unwrap();
        assert_eq!(conn.display_name(), "LDAP: directory.example.com");
        assert_eq!(conn.connector_type(), ConnectorType::Ldap);
    }

    #[tokio::test]
    async fn test_close_unbound_is_noop() {
        let conn = LdapConnection::new(test_config()).unwrap();
        assert!(conn.is_closed().await);
        assert!(conn.close().await.is_ok());
        assert!(conn.is_closed().await);
    }

    #[tokio::test]
    async fn test_rebind_before_bind_fails() {
        let conn = LdapConnection::new(test_config()).unwrap();
        let err = conn.rebind().await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotBound));
    }

    #[tokio::test]
    async fn test_operations_require_bind() {
        let conn = LdapConnection::new(test_config()).unwrap();

        let err = conn
            .search("dc=example,dc=com", "(objectClass=*)", &SearchControls::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::NotBound));

        let err = conn.lookup("cn=admin,dc=example,dc=com").await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotBound));

        let err = conn
            .delete_entry("cn=admin,dc=example,dc=com")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::NotBound));
    }

    #[tokio::test]
    async fn test_bound_dn_none_when_closed() {
        let conn = LdapConnection::new(test_config()).unwrap();
        assert_eq!(conn.bound_dn().await, None);
    }

    #[test]
    fn test_is_healthy_unbound() {
        let conn = LdapConnection::new(test_config()).unwrap();
        assert!(!conn.is_healthy());
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("John Doe"), "John Doe");
        assert_eq!(escape_filter_value("John*"), "John\\2a");
        assert_eq!(escape_filter_value("(admin)"), "\\28admin\\29");
        assert_eq!(escape_filter_value("a\\b"), "a\\5cb");
        assert_eq!(escape_filter_value("a\0b"), "a\\00b");
    }

    #[test]
    fn test_apply_filter_args() {
        assert_eq!(
            apply_filter_args("(uid={0})", &["admin"]),
            "(uid=admin)"
        );
        assert_eq!(
            apply_filter_args("(&(uid={0})(ou={1}))", &["admin", "people"]),
            "(&(uid=admin)(ou=people))"
        );
        // Values are escaped before substitution.
        assert_eq!(
            apply_filter_args("(uid={0})", &["a*b"]),
            "(uid=a\\2ab)"
        );
        // Placeholders without a matching argument are left alone.
        assert_eq!(apply_filter_args("(uid={0})", &[]), "(uid={0})");
    }

    #[test]
    fn test_split_dn() {
        assert_eq!(
            split_dn("cn=admin,dc=example,dc=com").unwrap(),
            ("cn=admin", Some("dc=example,dc=com"))
        );
        assert_eq!(split_dn("cn=admin").unwrap(), ("cn=admin", None));
    }

    #[test]
    fn test_split_dn_escaped_comma() {
        assert_eq!(
            split_dn("cn=Doe\\, John,dc=example,dc=com").unwrap(),
            ("cn=Doe\\, John", Some("dc=example,dc=com"))
        );
    }

    #[test]
    fn test_split_dn_invalid() {
        assert!(split_dn("").is_err());
        assert!(split_dn("   ").is_err());
        assert!(split_dn("no-rdn-here,dc=example,dc=com").is_err());
    }

    #[test]
    fn test_result_error_success() {
        assert!(result_error("search", 0, "", "dc=x", ReferralPolicy::Ignore).is_none());
    }

    #[test]
    fn test_result_error_mapping() {
        let err = result_error("lookup", 32, "no such object", "cn=x", ReferralPolicy::Ignore)
            .unwrap();
        assert!(matches!(err, ConnectorError::ObjectNotFound { .. }));

        let err = result_error("bind", 49, "", "cn=x", ReferralPolicy::Ignore).unwrap();
        assert!(matches!(err, ConnectorError::AuthenticationFailed));

        let err = result_error("delete entry", 50, "", "cn=x", ReferralPolicy::Ignore).unwrap();
        assert!(matches!(err, ConnectorError::AuthorizationFailed { .. }));

        let err = result_error("add entry", 68, "", "cn=x", ReferralPolicy::Ignore).unwrap();
        assert!(matches!(err, ConnectorError::ObjectAlreadyExists { .. }));

        let err = result_error("add entry", 19, "", "cn=x", ReferralPolicy::Ignore).unwrap();
        assert!(matches!(err, ConnectorError::ConstraintViolation { .. }));

        let err = result_error("search", 80, "other", "dc=x", ReferralPolicy::Ignore).unwrap();
        assert!(matches!(err, ConnectorError::OperationFailed { .. }));
    }

    #[test]
    fn test_result_error_referral_policy() {
        assert!(result_error("search", 10, "", "dc=x", ReferralPolicy::Ignore).is_none());
        let err = result_error("search", 10, "", "dc=x", ReferralPolicy::Throw).unwrap();
        assert!(matches!(err, ConnectorError::OperationFailed { .. }));
    }

    #[test]
    fn test_modification_values_text_and_binary() {
        let attr = Attribute::multi(
            "userCertificate",
            [
                AttributeValue::Text("abc".to_string()),
                AttributeValue::Binary(vec![0u8, 1, 2]),
            ],
        );
        let values = modification_values(&attr);
        assert!(values.contains("abc".as_bytes()));
        assert!(values.contains(&vec![0u8, 1, 2]));
    }

    #[test]
    fn test_debug_output_has_display_name() {
        let conn = LdapConnection::new(test_config()).unwrap();
        let debug = format!("{conn:?}");
        assert!(debug.contains("LDAP: directory.example.com"));
    }
}
