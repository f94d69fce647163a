//! Core data types for domain availability checking.
//!
//! The two lookup signals are explicit tagged types rather than booleans or
//! errors: every way a lookup can end has a variant, and the availability
//! verdict is a pure function over those variants. Code that needs the
//! verdict never has to guess what a thrown error meant.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Outcome of one registry (RDAP or WHOIS) lookup.
///
/// Lookup failures are data, not errors: a timeout, an unsupported TLD, or
/// a garbled response all land in [`RegistrySignal::LookupFailed`] and count
/// as "no evidence of registration" when the verdict is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySignal {
    /// The registry answered with a registration record.
    Found(RegistrationRecord),

    /// The registry answered authoritatively that no record exists.
    NotFound,

    /// No usable answer: timeout, refusal, unknown TLD, rate limiting,
    /// or a response that matched no known shape.
    LookupFailed(String),
}

/// Outcome of one forward DNS resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsSignal {
    /// The name resolved; the first returned address is retained.
    Resolved(IpAddr),

    /// The resolver answered that the name does not exist (the
    /// no-records/NXDOMAIN class).
    NoSuchHost,

    /// Any other resolver error, including timeouts. The verdict treats
    /// this the same as [`DnsSignal::NoSuchHost`]; the variant exists so
    /// logs and results can tell the two apart.
    ResolveFailed(String),
}

/// Registration details extracted from a registry answer.
///
/// Only [`registered_name`](RegistrationRecord::registered_name) takes part
/// in the availability verdict. The remaining fields are carried for
/// display and downstream use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// The registered domain name as the registry reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_name: Option<String>,

    /// The registrar that manages this domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// When the domain was first registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// When the domain registration expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Domain status codes (e.g., "clientTransferProhibited")
    pub status: Vec<String>,
}

/// Result of checking one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// The domain name that was checked, trimmed (e.g., "example.com")
    pub domain: String,

    /// The verdict: true when neither signal shows evidence of registration
    pub available: bool,

    /// The registry signal as observed
    pub registry: RegistrySignal,

    /// The DNS signal as observed. `None` when the registry already
    /// confirmed the domain as taken (the resolution is skipped) or when
    /// the input was blank and nothing was looked up.
    pub dns: Option<DnsSignal>,

    /// Wall time spent on this check
    pub elapsed: Duration,
}

impl RegistrySignal {
    /// True only when the registry returned a record with a non-empty
    /// registered name. A record without a usable name does not confirm
    /// the domain as taken; the DNS signal arbitrates.
    pub fn confirms_taken(&self) -> bool {
        match self {
            Self::Found(record) => record
                .registered_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty()),
            _ => false,
        }
    }
}

impl DnsSignal {
    /// True when the name resolved to at least one address.
    pub fn resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Reduce the two lookup signals to the availability verdict.
///
/// A domain is taken when the registry holds a populated record, or,
/// failing that, when the name still resolves. Everything else, including
/// the case where both lookups failed outright, is reported available:
/// false "available" beats a crashed or skipped check.
///
/// `dns` is `None` when the resolution was skipped, which only happens
/// once the registry has already confirmed the domain as taken.
pub fn is_available(registry: &RegistrySignal, dns: Option<&DnsSignal>) -> bool {
    if registry.confirms_taken() {
        return false;
    }
    !dns.map(DnsSignal::resolved).unwrap_or(false)
}

/// Configuration options for domain checking operations.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Timeout for each RDAP request
    /// Default: 3 seconds
    pub rdap_timeout: Duration,

    /// Timeout for each WHOIS conversation
    /// Default: 5 seconds
    pub whois_timeout: Duration,

    /// Timeout for each DNS resolution
    /// Default: 3 seconds
    pub dns_timeout: Duration,

    /// Whether to fall back to WHOIS when RDAP fails to answer
    /// Default: true
    pub whois_fallback: bool,
}

impl Default for CheckConfig {
    /// Create a sensible default configuration.
    ///
    /// Every external call carries one of these timeouts; there are no
    /// unbounded waits anywhere in a check.
    fn default() -> Self {
        Self {
            rdap_timeout: Duration::from_secs(3),
            whois_timeout: Duration::from_secs(5),
            dns_timeout: Duration::from_secs(3),
            whois_fallback: true,
        }
    }
}

impl CheckConfig {
    /// Set one timeout for all three lookup kinds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self.whois_timeout = timeout;
        self.dns_timeout = timeout;
        self
    }

    /// Set the RDAP request timeout.
    pub fn with_rdap_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self
    }

    /// Set the WHOIS conversation timeout.
    pub fn with_whois_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self
    }

    /// Set the DNS resolution timeout.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    /// Enable or disable the WHOIS fallback.
    pub fn with_whois_fallback(mut self, enabled: bool) -> Self {
        self.whois_fallback = enabled;
        self
    }
}

impl std::fmt::Display for RegistrySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(_) => write!(f, "found"),
            Self::NotFound => write!(f, "not-found"),
            Self::LookupFailed(reason) => write!(f, "lookup-failed: {}", reason),
        }
    }
}

impl std::fmt::Display for DnsSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(addr) => write!(f, "resolved: {}", addr),
            Self::NoSuchHost => write!(f, "no-such-host"),
            Self::ResolveFailed(reason) => write!(f, "resolve-failed: {}", reason),
        }
    }
}
