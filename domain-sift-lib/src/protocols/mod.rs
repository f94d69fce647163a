//! Protocol implementations for the two lookup signals.
//!
//! This module contains the registry side (RDAP with a WHOIS fallback) and
//! the DNS side of a domain check. Both sit behind small async traits so
//! callers and tests can substitute scripted lookups for the network.

use async_trait::async_trait;

use crate::types::{DnsSignal, RegistrySignal};

/// RDAP (Registration Data Access Protocol) implementation
pub mod rdap;

/// WHOIS protocol implementation
pub mod whois;

/// Forward DNS resolution
pub mod dns;

/// Registry endpoint directory and the composite registry client
pub mod registry;

/// The registry side of a domain check.
///
/// Implementations answer the single question "does a registration record
/// exist for this domain?" and must fold every failure mode into
/// [`RegistrySignal::LookupFailed`] rather than returning an error.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> RegistrySignal;
}

/// The DNS side of a domain check.
///
/// Implementations perform one forward resolution and fold every failure
/// mode into [`DnsSignal::ResolveFailed`].
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, domain: &str) -> DnsSignal;
}

// Re-export the clients the checker wires together
pub use dns::DnsClient;
pub use registry::RegistryClient;
