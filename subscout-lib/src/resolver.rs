//! DNS resolution seam.
//!
//! This module defines the [`NameResolver`] trait the engine depends on,
//! plus [`SystemResolver`], the production implementation backed by
//! `hickory-resolver`. The trait exists so tests can inject scripted
//! resolvers with fake answers and delays.

use crate::error::SubscoutError;
use futures::future::BoxFuture;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;

/// How a single resolution attempt failed, before timeout handling.
///
/// The worker maps these (together with the timeout race) onto
/// [`crate::UnresolvedReason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// Definitive negative answer: the name does not exist
    NotFound,

    /// Anything else: network error, malformed response, resolver refusal
    Other(String),
}

/// Address resolution for one fully qualified name.
///
/// Implementations must be safe to call from many concurrent workers.
/// Returning `Ok` with an empty address list is treated as not-found by
/// the engine.
pub trait NameResolver: Send + Sync {
    /// Resolve a name to its A/AAAA addresses.
    fn resolve<'a>(&'a self, fqdn: &'a str)
        -> BoxFuture<'a, Result<Vec<IpAddr>, ResolveFailure>>;
}

/// Production resolver on top of hickory's tokio runtime integration.
///
/// Uses the host's DNS configuration (`/etc/resolv.conf`) when readable,
/// falling back to the library defaults otherwise.
#[derive(Clone)]
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    /// Build a resolver from the system DNS configuration.
    pub fn from_system_conf() -> Result<Self, SubscoutError> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| SubscoutError::resolver_init(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Build a resolver with hickory's default upstream configuration.
    ///
    /// Useful on hosts without a readable `/etc/resolv.conf`.
    pub fn with_defaults() -> Self {
        let inner = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self { inner }
    }

    /// Build the best available resolver: system configuration if readable,
    /// library defaults otherwise.
    pub fn new() -> Self {
        match Self::from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::debug!("system resolver config unavailable ({}), using defaults", e);
                Self::with_defaults()
            }
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver for SystemResolver {
    fn resolve<'a>(
        &'a self,
        fqdn: &'a str,
    ) -> BoxFuture<'a, Result<Vec<IpAddr>, ResolveFailure>> {
        Box::pin(async move {
            match self.inner.lookup_ip(fqdn).await {
                Ok(lookup) => Ok(lookup.iter().collect()),
                Err(e) => match e.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => Err(ResolveFailure::NotFound),
                    _ => {
                        tracing::trace!("lookup failed for {}: {}", fqdn, e);
                        Err(ResolveFailure::Other(e.to_string()))
                    }
                },
            }
        })
    }
}
