//! Link scoping: exclusion checks and scope-mode rewriting

use crate::config::{compute_scope_hash, ScopeMode};
use crate::url::domain::{extract_host, DomainRegistry};
use crate::url::matcher::matches_suffix;
use crate::url::resolve::resolve;
use std::sync::Arc;
use url::Url;

/// What happened to a single href found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeDecision {
    /// The (possibly rewritten) URL may be offered to the frontier
    Admit(Url),
    /// The host is excluded or has no registrable domain
    Excluded,
    /// The href does not resolve to an HTTP(S) URL
    Unresolvable,
}

/// Decides which discovered links may enter the frontier
///
/// Built once at startup; read-only and shared by every worker.
pub struct Scoper {
    excluded: Vec<String>,
    registry: Arc<dyn DomainRegistry>,
    mode: ScopeMode,
}

impl Scoper {
    /// Creates a scoper
    ///
    /// # Arguments
    ///
    /// * `excluded` - Bare domain suffixes, already lowercased
    /// * `registry` - Registrable-domain lookup
    /// * `mode` - How links are rewritten before admission
    pub fn new(excluded: Vec<String>, registry: Arc<dyn DomainRegistry>, mode: ScopeMode) -> Self {
        Self {
            excluded,
            registry,
            mode,
        }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Fingerprint of the rules, stored alongside snapshots
    pub fn fingerprint(&self) -> String {
        compute_scope_hash(self.mode, &self.excluded)
    }

    /// Returns true if the URL must never be crawled
    ///
    /// A URL is excluded when its host is, or is a subdomain of, an excluded
    /// suffix, or when the host has no registrable domain at all.
    pub fn is_excluded(&self, url: &Url) -> bool {
        let Some(host) = extract_host(url) else {
            return true;
        };

        if self
            .excluded
            .iter()
            .any(|suffix| matches_suffix(suffix, &host))
        {
            return true;
        }

        self.registry.registrable_domain(&host).is_none()
    }

    /// Rewrites a candidate link according to the scope mode
    ///
    /// - `Full`: the link is kept unchanged
    /// - `BaseDomainOnly`: the link collapses to `scheme://registrable-domain`
    /// - `MainOnly`: nothing is ever enqueued, so this yields None
    pub fn scope_transform(&self, url: Url) -> Option<Url> {
        match self.mode {
            ScopeMode::Full => Some(url),
            ScopeMode::MainOnly => None,
            ScopeMode::BaseDomainOnly => {
                let host = extract_host(&url)?;
                let domain = self.registry.registrable_domain(&host)?;
                Url::parse(&format!("{}://{}", url.scheme(), domain)).ok()
            }
        }
    }

    /// Runs one href through resolution, exclusion and scope rewriting
    pub fn admit(&self, base: &Url, href: &str) -> ScopeDecision {
        let Some(url) = resolve(base, href) else {
            return ScopeDecision::Unresolvable;
        };

        if self.is_excluded(&url) {
            return ScopeDecision::Excluded;
        }

        // A rewritten root must pass the exclusion rules too
        match self.scope_transform(url) {
            Some(scoped) if !self.is_excluded(&scoped) => ScopeDecision::Admit(scoped),
            _ => ScopeDecision::Excluded,
        }
    }
}

impl std::fmt::Debug for Scoper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoper")
            .field("excluded", &self.excluded)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
