//! Core data types for subdomain discovery.
//!
//! This module defines the main data structures used throughout the library:
//! candidates, lookup outcomes, scan configuration, and run reporting.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// A single prefix + base-domain combination awaiting DNS resolution.
///
/// Candidates are created once at the start of a scan and are read-only
/// afterwards. Each candidate produces exactly one [`LookupOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The wordlist prefix (e.g., "www")
    pub prefix: String,

    /// The fully qualified name to resolve (e.g., "www.example.com")
    pub fqdn: String,
}

impl Candidate {
    /// Build a candidate from a prefix and a base domain.
    ///
    /// Stray dots on either side of the join are stripped, so `"www."` +
    /// `"example.com."` still yields `www.example.com`.
    pub fn new(prefix: &str, base_domain: &str) -> Self {
        let prefix = prefix.trim_matches('.');
        let base = base_domain.trim_matches('.');
        Self {
            prefix: prefix.to_string(),
            fqdn: format!("{}.{}", prefix, base),
        }
    }
}

/// Why a candidate did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// The resolver returned a definitive negative answer (NXDOMAIN,
    /// or a response carrying no addresses)
    #[serde(rename = "not_found")]
    NotFound,

    /// The per-lookup timeout elapsed before the resolver answered
    #[serde(rename = "timeout")]
    Timeout,

    /// Any other failure: network error, malformed response, resolver refusal
    #[serde(rename = "error")]
    Error,
}

/// The result of one DNS lookup attempt.
///
/// Produced exactly once per candidate by a resolution worker and consumed
/// exactly once by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The name resolved to at least one address
    Resolved {
        fqdn: String,
        addresses: Vec<IpAddr>,
    },

    /// The name did not resolve
    Unresolved {
        fqdn: String,
        reason: UnresolvedReason,
    },
}

impl LookupOutcome {
    /// The fully qualified name this outcome belongs to.
    pub fn fqdn(&self) -> &str {
        match self {
            Self::Resolved { fqdn, .. } => fqdn,
            Self::Unresolved { fqdn, .. } => fqdn,
        }
    }

    /// Whether the lookup confirmed the name exists.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// A confirmed subdomain, as delivered on the result stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    /// The fully qualified name that resolved
    pub fqdn: String,

    /// The addresses it resolved to
    pub addresses: Vec<IpAddr>,
}

/// Configuration for one scan run.
///
/// Set once at start and never mutated during a run. Defaults match the
/// tool's CLI defaults: concurrency 100, per-lookup timeout 2 seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// The base domain candidates are appended to (e.g., "example.com")
    pub base_domain: String,

    /// Maximum number of in-flight DNS lookups
    pub concurrency: usize,

    /// Timeout for each individual lookup
    #[serde(skip)] // Don't serialize Duration directly
    pub timeout: Duration,
}

impl ScanConfig {
    /// Create a configuration for the given base domain with default limits.
    pub fn new<D: Into<String>>(base_domain: D) -> Self {
        Self {
            base_domain: base_domain.into(),
            ..Self::default()
        }
    }

    /// Set the maximum number of concurrent lookups.
    ///
    /// The value is validated when a scan starts; zero is a configuration
    /// error, not silently clamped.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_domain: String::new(),
            concurrency: 100,
            timeout: Duration::from_secs(2),
        }
    }
}

/// Lifecycle of a scan run.
///
/// `Idle → Running → Draining → Complete`; transitions never go back and
/// `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Scan handle created, nothing dispatched yet
    Idle,

    /// Candidates are being dispatched to workers
    Running,

    /// All candidates dispatched; workers still finishing
    Draining,

    /// Every candidate has produced an outcome
    Complete,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Running => write!(f, "running"),
            RunPhase::Draining => write!(f, "draining"),
            RunPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Outcome counts for a finished (or cancelled) run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Candidates produced by the candidate source
    pub total: usize,

    /// Candidates that produced an outcome (equals `total` unless cancelled)
    pub completed: usize,

    /// Names that resolved to at least one address
    pub resolved: usize,

    /// Definitive negative answers
    pub not_found: usize,

    /// Lookups that hit the per-lookup timeout
    pub timed_out: usize,

    /// Other per-candidate failures
    pub errors: usize,

    /// Whether dispatch stopped early due to cancellation
    pub cancelled: bool,

    /// Wall time for the whole run
    #[serde(skip)] // Don't serialize Duration directly
    pub duration: Duration,
}

/// Everything a batch scan returns: the discoveries plus the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Confirmed subdomains, in arrival order
    pub discoveries: Vec<Discovery>,

    /// Outcome counts for the run
    pub summary: RunSummary,
}
