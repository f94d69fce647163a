//! Forward DNS resolution.
//!
//! The second lookup signal: does the name currently resolve to an
//! address? A registered domain almost always does, so resolution catches
//! registrations the registry side missed. Only the no-records error class
//! is distinguished from other failures, and even that distinction exists
//! for logging; the verdict treats both as "did not resolve".

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;
use tracing::{debug, warn};

use crate::protocols::NameResolver;
use crate::types::DnsSignal;

/// DNS client for the resolution signal.
#[derive(Clone)]
pub struct DnsClient {
    resolver: TokioAsyncResolver,
    /// Timeout for one resolution
    timeout: Duration,
}

impl DnsClient {
    /// Create a new DNS client with the given per-lookup timeout.
    ///
    /// Uses the system resolver configuration when it is readable and
    /// falls back to the library defaults otherwise, so construction
    /// cannot fail.
    pub fn new(timeout: Duration) -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "no usable system resolver config, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });

        Self { resolver, timeout }
    }
}

#[async_trait]
impl NameResolver for DnsClient {
    async fn resolve(&self, domain: &str) -> DnsSignal {
        debug!(domain, "dns resolution");

        match tokio::time::timeout(self.timeout, self.resolver.lookup_ip(domain)).await {
            Ok(Ok(lookup)) => match lookup.iter().next() {
                Some(addr) => DnsSignal::Resolved(addr),
                // A successful answer with zero addresses is still "does not resolve"
                None => DnsSignal::NoSuchHost,
            },
            Ok(Err(e)) => classify_resolve_error(&e),
            Err(_) => {
                DnsSignal::ResolveFailed(format!("DNS timed out after {:?}", self.timeout))
            }
        }
    }
}

fn classify_resolve_error(error: &ResolveError) -> DnsSignal {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => DnsSignal::NoSuchHost,
        _ => DnsSignal::ResolveFailed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dns_client_creation() {
        let client = DnsClient::new(Duration::from_secs(3));
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_generic_errors_classify_as_resolve_failed() {
        let error = ResolveError::from(ResolveErrorKind::Message("no reachable nameserver"));
        match classify_resolve_error(&error) {
            DnsSignal::ResolveFailed(reason) => {
                assert!(reason.contains("no reachable nameserver"));
            }
            other => panic!("expected ResolveFailed, got {:?}", other),
        }
    }
}
