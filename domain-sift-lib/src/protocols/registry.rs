//! Registry endpoint directory and the composite registry client.
//!
//! TLD to endpoint mappings are static tables: one for RDAP base URLs and
//! one for WHOIS server hostnames. There is no IANA bootstrap fetch and no
//! discovery cache; each check is a single pass, and a TLD absent from both
//! tables simply yields a failed registry signal while DNS arbitrates.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::error::SiftError;
use crate::protocols::rdap::RdapClient;
use crate::protocols::whois::WhoisClient;
use crate::protocols::RegistryLookup;
use crate::types::{CheckConfig, RegistrySignal};

/// Get the built-in RDAP registry mappings.
///
/// Maps TLD strings to their corresponding RDAP endpoint base URLs, based
/// on known registry endpoints. A domain path appended to the base URL
/// forms the full lookup URL.
pub fn rdap_registry_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Popular gTLDs (Generic Top-Level Domains)
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        (
            "org",
            "https://rdap.publicinterestregistry.org/rdap/domain/",
        ),
        ("info", "https://rdap.identitydigital.services/rdap/domain/"),
        ("biz", "https://rdap.nic.biz/domain/"),
        // Google TLDs
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        ("page", "https://pubapi.registry.google/rdap/domain/"),
        // CentralNic managed gTLDs
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("tech", "https://rdap.centralnic.com/tech/domain/"),
        ("online", "https://rdap.centralnic.com/online/domain/"),
        ("site", "https://rdap.centralnic.com/site/domain/"),
        ("website", "https://rdap.centralnic.com/website/domain/"),
        // Other popular gTLDs
        ("shop", "https://rdap.gmoregistry.net/rdap/domain/"),
        ("cloud", "https://rdap.registry.cloud/rdap/domain/"),
        // Identity Digital managed TLDs
        ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
        ("io", "https://rdap.identitydigital.services/rdap/domain/"),
        ("me", "https://rdap.identitydigital.services/rdap/domain/"),
        ("zone", "https://rdap.identitydigital.services/rdap/domain/"),
        (
            "digital",
            "https://rdap.identitydigital.services/rdap/domain/",
        ),
        // Country code TLDs with working RDAP endpoints
        ("us", "https://rdap.nic.us/domain/"),
        ("uk", "https://rdap.nominet.uk/domain/"),
        ("de", "https://rdap.denic.de/domain/"),
        ("ca", "https://rdap.ca.fury.ca/rdap/domain/"),
        ("au", "https://rdap.cctld.au/rdap/domain/"),
        ("fr", "https://rdap.nic.fr/domain/"),
        ("nl", "https://rdap.sidn.nl/domain/"),
        ("br", "https://rdap.registro.br/domain/"),
        ("in", "https://rdap.nixiregistry.in/rdap/domain/"),
        // Verisign managed ccTLDs
        ("tv", "https://rdap.nic.tv/domain/"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
        // NOTE: co, eu, it, jp, es, cn have no working RDAP endpoint.
        // They fall through to the WHOIS table below.
    ])
}

/// Get the built-in WHOIS server mappings.
///
/// Maps TLD strings to the authoritative WHOIS server hostname for direct
/// port-43 queries. Covers the RDAP table plus the TLDs whose registries
/// never stood up RDAP.
pub fn whois_server_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("com", "whois.verisign-grs.com"),
        ("net", "whois.verisign-grs.com"),
        ("org", "whois.pir.org"),
        ("info", "whois.nic.info"),
        ("biz", "whois.nic.biz"),
        ("app", "whois.nic.google"),
        ("dev", "whois.nic.google"),
        ("page", "whois.nic.google"),
        ("xyz", "whois.nic.xyz"),
        ("tech", "whois.nic.tech"),
        ("online", "whois.nic.online"),
        ("site", "whois.nic.site"),
        ("website", "whois.nic.website"),
        ("shop", "whois.nic.shop"),
        ("cloud", "whois.nic.cloud"),
        ("ai", "whois.nic.ai"),
        ("io", "whois.nic.io"),
        ("me", "whois.nic.me"),
        ("zone", "whois.nic.zone"),
        ("digital", "whois.nic.digital"),
        ("us", "whois.nic.us"),
        ("uk", "whois.nic.uk"),
        ("de", "whois.denic.de"),
        ("ca", "whois.cira.ca"),
        ("au", "whois.auda.org.au"),
        ("fr", "whois.nic.fr"),
        ("nl", "whois.domain-registry.nl"),
        ("br", "whois.registro.br"),
        ("in", "whois.registry.in"),
        ("tv", "whois.nic.tv"),
        ("cc", "ccwhois.verisign-grs.com"),
        // WHOIS-only registries
        ("co", "whois.nic.co"),
        ("eu", "whois.eu"),
        ("it", "whois.nic.it"),
        ("jp", "whois.jprs.jp"),
        ("es", "whois.nic.es"),
        ("cn", "whois.cnnic.cn"),
    ])
}

/// Look up the RDAP endpoint base URL for a TLD.
pub fn rdap_endpoint_for(tld: &str) -> Option<&'static str> {
    rdap_registry_map().get(tld).copied()
}

/// Look up the authoritative WHOIS server for a TLD.
pub fn whois_server_for(tld: &str) -> Option<&'static str> {
    whois_server_map().get(tld).copied()
}

/// Extract the TLD from a domain name.
///
/// Returns the lowercased last label, or `None` when the name has no dot
/// or ends with one. Multi-level TLDs like .co.uk are not special-cased;
/// the last label is enough to pick an endpoint.
pub fn extract_tld(domain: &str) -> Option<String> {
    let parts: Vec<&str> = domain.split('.').collect();

    if parts.len() < 2 {
        return None;
    }

    let last = parts.last()?;
    if last.is_empty() {
        return None;
    }

    Some(last.to_lowercase())
}

/// The production registry signal: RDAP first, WHOIS as fallback.
///
/// The fallback only engages when RDAP produced a `LookupFailed`; an
/// authoritative RDAP answer (found or not found) is final. When both
/// protocols fail, the combined reason carries both failures.
#[derive(Clone)]
pub struct RegistryClient {
    rdap: RdapClient,
    whois: WhoisClient,
    whois_fallback: bool,
}

impl RegistryClient {
    /// Create a registry client from checker configuration.
    pub fn new(config: &CheckConfig) -> Result<Self, SiftError> {
        Ok(Self {
            rdap: RdapClient::new(config.rdap_timeout)?,
            whois: WhoisClient::with_timeout(config.whois_timeout),
            whois_fallback: config.whois_fallback,
        })
    }
}

#[async_trait]
impl RegistryLookup for RegistryClient {
    async fn lookup(&self, domain: &str) -> RegistrySignal {
        let rdap_reason = match self.rdap.lookup(domain).await {
            RegistrySignal::LookupFailed(reason) => reason,
            // An authoritative RDAP answer is final
            signal => return signal,
        };

        if !self.whois_fallback {
            return RegistrySignal::LookupFailed(rdap_reason);
        }

        debug!(domain, reason = %rdap_reason, "rdap gave no answer, trying whois");

        match self.whois.lookup(domain).await {
            RegistrySignal::LookupFailed(whois_reason) => RegistrySignal::LookupFailed(format!(
                "rdap: {}; whois: {}",
                rdap_reason, whois_reason
            )),
            signal => signal,
        }
    }
}
