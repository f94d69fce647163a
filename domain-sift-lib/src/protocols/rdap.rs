//! RDAP (Registration Data Access Protocol) implementation.
//!
//! RDAP is the primary registry signal: the modern, structured-JSON
//! replacement for WHOIS. One HTTP GET against the TLD's registry endpoint
//! answers the registration question directly: 404 means no record, 200
//! carries the record. Everything else folds into
//! [`RegistrySignal::LookupFailed`]; there is no retry, not even on 429.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::error::SiftError;
use crate::protocols::registry::{extract_tld, rdap_endpoint_for};
use crate::types::{RegistrationRecord, RegistrySignal};

/// RDAP client for the registry signal.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client shared across all requests
    http_client: reqwest::Client,
    /// Timeout for one RDAP lookup
    timeout: Duration,
}

impl RdapClient {
    /// Create a new RDAP client with the given per-lookup timeout.
    pub fn new(timeout: Duration) -> Result<Self, SiftError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout + Duration::from_secs(2)) // Buffer over the outer timeout
            .connect_timeout(timeout)
            .pool_max_idle_per_host(16)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                SiftError::network_with_source("Failed to create RDAP HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Query the registry for one domain.
    ///
    /// Never fails: unknown TLDs, transport errors, timeouts, and
    /// unparseable bodies all come back as
    /// [`RegistrySignal::LookupFailed`].
    pub async fn lookup(&self, domain: &str) -> RegistrySignal {
        let Some(tld) = extract_tld(domain) else {
            return RegistrySignal::LookupFailed("domain has no TLD".to_string());
        };

        let Some(endpoint) = rdap_endpoint_for(&tld) else {
            return RegistrySignal::LookupFailed(format!("no RDAP endpoint for .{}", tld));
        };

        let rdap_url = format!("{}{}", endpoint, domain);
        debug!(domain, url = %rdap_url, "rdap lookup");

        match tokio::time::timeout(self.timeout, self.request(&rdap_url)).await {
            Ok(signal) => signal,
            Err(_) => {
                debug!(domain, timeout = ?self.timeout, "rdap lookup timed out");
                RegistrySignal::LookupFailed(format!("RDAP timed out after {:?}", self.timeout))
            }
        }
    }

    async fn request(&self, rdap_url: &str) -> RegistrySignal {
        let response = match self.http_client.get(rdap_url).send().await {
            Ok(response) => response,
            Err(e) => {
                return RegistrySignal::LookupFailed(format!("RDAP request failed: {}", e));
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<serde_json::Value>().await {
                Ok(json) => RegistrySignal::Found(extract_registration(&json)),
                Err(e) => {
                    RegistrySignal::LookupFailed(format!("unparseable RDAP response: {}", e))
                }
            },
            StatusCode::NOT_FOUND => RegistrySignal::NotFound,
            StatusCode::TOO_MANY_REQUESTS => {
                RegistrySignal::LookupFailed("rate limited by RDAP server (HTTP 429)".to_string())
            }
            code => RegistrySignal::LookupFailed(format!("RDAP server returned {}", code)),
        }
    }
}

/// Extract a registration record from an RDAP JSON response.
///
/// Parses the standardized RDAP format: `ldhName` (with `unicodeName` as a
/// fallback) for the registered name, registrar entities including their
/// vCard form, registration/expiration events, and status codes.
pub(crate) fn extract_registration(json: &serde_json::Value) -> RegistrationRecord {
    let registered_name = json
        .get("ldhName")
        .and_then(|name| name.as_str())
        .or_else(|| json.get("unicodeName").and_then(|name| name.as_str()))
        .map(String::from);

    let registrar = json
        .get("entities")
        .and_then(|entities| entities.as_array())
        .and_then(|entities| {
            entities
                .iter()
                .filter(|entity| has_role(entity, "registrar"))
                .find_map(|entity| {
                    // Prefer the vCard full name, then registry identifiers
                    registrar_from_vcard(entity).or_else(|| registrar_identifier(entity))
                })
        });

    let mut creation_date = None;
    let mut expiration_date = None;
    if let Some(events) = json.get("events").and_then(|events| events.as_array()) {
        for event in events {
            let action = event.get("eventAction").and_then(|action| action.as_str());
            let date = event.get("eventDate").and_then(|date| date.as_str());
            match (action, date) {
                (Some("registration"), Some(date)) => creation_date = Some(date.to_string()),
                (Some("expiration"), Some(date)) => expiration_date = Some(date.to_string()),
                _ => {}
            }
        }
    }

    let status = json
        .get("status")
        .and_then(|status| status.as_array())
        .map(|codes| {
            codes
                .iter()
                .filter_map(|code| code.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    RegistrationRecord {
        registered_name,
        registrar,
        creation_date,
        expiration_date,
        status,
    }
}

fn has_role(entity: &serde_json::Value, role: &str) -> bool {
    entity
        .get("roles")
        .and_then(|roles| roles.as_array())
        .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some(role)))
}

/// Registrar display name from the entity's vCard, via the "fn" item.
fn registrar_from_vcard(entity: &serde_json::Value) -> Option<String> {
    let items = entity.get("vcardArray")?.get(1)?.as_array()?;
    items.iter().find_map(|item| {
        let fields = item.as_array()?;
        if fields.first()?.as_str()? == "fn" {
            fields.get(3)?.as_str().map(String::from)
        } else {
            None
        }
    })
}

/// Registrar identifier fallback: IANA public ID, then handle, then name.
fn registrar_identifier(entity: &serde_json::Value) -> Option<String> {
    let public_id = entity
        .get("publicIds")
        .and_then(|ids| ids.as_array())
        .and_then(|ids| ids.first())
        .and_then(|id| id.get("identifier"))
        .and_then(|id| id.as_str());

    public_id
        .or_else(|| entity.get("handle").and_then(|handle| handle.as_str()))
        .or_else(|| entity.get("name").and_then(|name| name.as_str()))
        .map(String::from)
}
