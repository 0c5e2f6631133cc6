//! Search controls and result sequences
//!
//! `SearchControls` carries the per-search parameters (scope, attribute
//! projection, limits, page size). `SearchResults` wraps the client's
//! result enumeration: either an in-memory list, or a lazily-driven paged
//! search over a derived session carrying the simple-paged-results control.

use std::collections::VecDeque;
use std::time::Duration;

use ldap3::controls::{Control, ControlType, PagedResults};
use ldap3::{Ldap, Scope, SearchEntry, SearchResult as RawSearchResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use trellis_connector::error::{ConnectorError, ConnectorResult};

use crate::config::ReferralPolicy;
use crate::connection::result_error;
use crate::entry::Entry;

/// Scope of a directory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// The base object only.
    Base,
    /// Direct children of the base object.
    OneLevel,
    /// The base object and its whole subtree.
    #[default]
    Subtree,
}

impl SearchScope {
    pub(crate) fn as_scope(self) -> Scope {
        match self {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }
}

/// Parameters for a search operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchControls {
    /// Search scope.
    #[serde(default)]
    pub scope: SearchScope,

    /// Attributes to return; `None` means all user attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,

    /// Maximum number of entries to return (0 = no limit).
    #[serde(default)]
    pub size_limit: u32,

    /// Server-side time limit in seconds (0 = no limit).
    #[serde(default)]
    pub time_limit_secs: u32,

    /// Page size for the simple-paged-results control (0 = paging
    /// disabled).
    #[serde(default)]
    pub page_size: u32,
}

impl SearchControls {
    /// Create search controls with default values (subtree scope, all
    /// attributes, no limits, no paging).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search scope.
    #[must_use]
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Restrict the attributes to return.
    #[must_use]
    pub fn with_attributes<S>(mut self, attributes: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the maximum number of entries to return.
    #[must_use]
    pub fn with_size_limit(mut self, limit: u32) -> Self {
        self.size_limit = limit;
        self
    }

    /// Set the server-side time limit.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Request paged results with the given page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Whether paging was requested.
    pub fn paging_enabled(&self) -> bool {
        self.page_size > 0
    }

    pub(crate) fn requested_attributes(&self) -> Vec<String> {
        self.attributes
            .clone()
            .unwrap_or_else(|| vec!["*".to_string()])
    }

    pub(crate) fn client_options(&self) -> ldap3::SearchOptions {
        let mut options = ldap3::SearchOptions::new();
        if self.size_limit > 0 {
            options = options.sizelimit(self.size_limit as i32);
        }
        if self.time_limit_secs > 0 {
            options = options.timelimit(self.time_limit_secs as i32);
        }
        options
    }
}

/// A sequence of entries produced by a search.
pub struct SearchResults {
    inner: Inner,
}

impl std::fmt::Debug for SearchResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.inner {
            Inner::Eager(entries) => format!("Eager({} entries)", entries.len()),
            Inner::Paged(_) => "Paged".to_string(),
        };
        f.debug_struct("SearchResults").field("inner", &mode).finish()
    }
}

enum Inner {
    Eager(VecDeque<Entry>),
    Paged(Box<PagedSearch>),
}

impl SearchResults {
    pub(crate) fn eager(entries: Vec<Entry>) -> Self {
        Self {
            inner: Inner::Eager(entries.into()),
        }
    }

    /// Open a paged search on a derived session. The first page is fetched
    /// immediately so delegation errors surface at the call site.
    pub(crate) async fn open_paged(
        ldap: Ldap,
        base: &str,
        filter: &str,
        controls: &SearchControls,
        referral: ReferralPolicy,
        read_timeout: Duration,
    ) -> ConnectorResult<Self> {
        let mut paged = PagedSearch {
            ldap,
            base: base.to_string(),
            filter: filter.to_string(),
            attributes: controls.requested_attributes(),
            scope: controls.scope.as_scope(),
            controls: controls.clone(),
            referral,
            read_timeout,
            cookie: Vec::new(),
            buffer: VecDeque::new(),
            done: false,
        };
        paged.fetch_page().await?;
        Ok(Self {
            inner: Inner::Paged(Box::new(paged)),
        })
    }

    /// Whether this result sequence pages through the directory lazily.
    pub fn is_paged(&self) -> bool {
        matches!(self.inner, Inner::Paged(_))
    }

    /// Get the next entry, fetching the next page if necessary.
    pub async fn next_entry(&mut self) -> ConnectorResult<Option<Entry>> {
        match &mut self.inner {
            Inner::Eager(entries) => Ok(entries.pop_front()),
            Inner::Paged(paged) => paged.next_entry().await,
        }
    }

    /// Drain the sequence into a vector.
    pub async fn collect_all(mut self) -> ConnectorResult<Vec<Entry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

struct PagedSearch {
    ldap: Ldap,
    base: String,
    filter: String,
    attributes: Vec<String>,
    scope: Scope,
    controls: SearchControls,
    referral: ReferralPolicy,
    read_timeout: Duration,
    cookie: Vec<u8>,
    buffer: VecDeque<Entry>,
    done: bool,
}

impl PagedSearch {
    async fn next_entry(&mut self) -> ConnectorResult<Option<Entry>> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry));
            }
            if self.done {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> ConnectorResult<()> {
        let control = PagedResults {
            size: self.controls.page_size as i32,
            cookie: std::mem::take(&mut self.cookie),
        };

        debug!(base = %self.base, filter = %self.filter, "fetching result page");

        let result = self
            .ldap
            .with_controls(control)
            .with_search_options(self.controls.client_options())
            .with_timeout(self.read_timeout)
            .search(
                &self.base,
                self.scope,
                &self.filter,
                self.attributes.clone(),
            )
            .await
            .map_err(|e| ConnectorError::operation_failed_with_source("paged search failed", e))?;

        let RawSearchResult(entries, res) = result;
        if let Some(err) = result_error("search", res.rc, &res.text, &self.base, self.referral) {
            return Err(err);
        }

        self.cookie = res
            .ctrls
            .iter()
            .find_map(|control| match control {
                Control(Some(ControlType::PagedResults), raw) => {
                    Some(raw.parse::<PagedResults>().cookie)
                }
                _ => None,
            })
            .unwrap_or_default();
        if self.cookie.is_empty() {
            self.done = true;
        }

        self.buffer.extend(
            entries
                .into_iter()
                .map(|entry| Entry::from(SearchEntry::construct(entry))),
        );
        Ok(())
    }
}
