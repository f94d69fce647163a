//! Main orchestration for checking a single domain.
//!
//! One check runs the two lookup signals sequentially: registry first,
//! then forward DNS, with the resolution skipped entirely when the
//! registry already confirmed a registration. The checker never returns
//! an error for a failed lookup; failures are data and the verdict
//! absorbs them.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::SiftError;
use crate::protocols::{DnsClient, NameResolver, RegistryClient, RegistryLookup};
use crate::types::{is_available, CheckConfig, CheckOutcome, RegistrySignal};

/// Checks individual domains by combining the registry and DNS signals.
///
/// Cheap to clone: the underlying protocol clients are shared.
///
/// # Example
///
/// ```rust,no_run
/// use domain_sift_lib::DomainChecker;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = DomainChecker::new()?;
///     let outcome = checker.check_domain("example.com").await;
///     println!("{}: available = {}", outcome.domain, outcome.available);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Registry side: RDAP with WHOIS fallback in production
    registry: Arc<dyn RegistryLookup>,
    /// DNS side: forward resolution
    resolver: Arc<dyn NameResolver>,
}

impl DomainChecker {
    /// Create a checker with default configuration.
    ///
    /// Default settings:
    /// - RDAP timeout: 3 seconds
    /// - WHOIS timeout: 5 seconds
    /// - DNS timeout: 3 seconds
    /// - WHOIS fallback: enabled
    pub fn new() -> Result<Self, SiftError> {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use domain_sift_lib::{DomainChecker, CheckConfig};
    /// use std::time::Duration;
    ///
    /// let config = CheckConfig::default()
    ///     .with_timeout(Duration::from_secs(10))
    ///     .with_whois_fallback(false);
    ///
    /// let checker = DomainChecker::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: CheckConfig) -> Result<Self, SiftError> {
        let registry = RegistryClient::new(&config)?;
        let resolver = DnsClient::new(config.dns_timeout);

        Ok(Self {
            config,
            registry: Arc::new(registry),
            resolver: Arc::new(resolver),
        })
    }

    /// Create a checker with injected lookup capabilities.
    ///
    /// This is the seam for tests and for embedders that bring their own
    /// registry or resolver implementation.
    pub fn with_providers(
        config: CheckConfig,
        registry: Arc<dyn RegistryLookup>,
        resolver: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            config,
            registry,
            resolver,
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Check availability of a single domain.
    ///
    /// The checking process:
    /// 1. Trim the input; a string empty after trimming comes back
    ///    immediately as unavailable with no network traffic.
    /// 2. Consult the registry.
    /// 3. Consult DNS, unless the registry already confirmed the domain
    ///    as taken.
    /// 4. Reduce the observed signals to the verdict.
    ///
    /// This method does not fail: every lookup problem folds into the
    /// signals carried on the returned [`CheckOutcome`].
    pub async fn check_domain(&self, raw: &str) -> CheckOutcome {
        let start_time = Instant::now();
        let domain = raw.trim();

        // Blank input never reaches the network
        if domain.is_empty() {
            return CheckOutcome {
                domain: String::new(),
                available: false,
                registry: RegistrySignal::LookupFailed("empty domain name".to_string()),
                dns: None,
                elapsed: start_time.elapsed(),
            };
        }

        let registry = self.registry.lookup(domain).await;

        // A confirmed registration makes the DNS question moot
        let dns = if registry.confirms_taken() {
            None
        } else {
            Some(self.resolver.resolve(domain).await)
        };

        let available = is_available(&registry, dns.as_ref());
        debug!(domain, available, registry = %registry, "check complete");

        CheckOutcome {
            domain: domain.to_string(),
            available,
            registry,
            dns,
            elapsed: start_time.elapsed(),
        }
    }
}
