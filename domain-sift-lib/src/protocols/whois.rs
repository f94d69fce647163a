//! WHOIS protocol implementation.
//!
//! WHOIS is the fallback registry signal, used when RDAP cannot answer.
//! One raw TCP conversation on port 43 per lookup: send the domain, read
//! the unstructured text response, classify it. Responses vary wildly
//! between registries, so classification leans on a broad pattern set and
//! refuses to guess when nothing matches.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::protocols::registry::{extract_tld, whois_server_for};
use crate::types::{RegistrationRecord, RegistrySignal};

const WHOIS_PORT: u16 = 43;

/// WHOIS client for the fallback registry signal.
#[derive(Clone)]
pub struct WhoisClient {
    /// Timeout for one full WHOIS conversation
    timeout: Duration,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query the authoritative WHOIS server for one domain.
    ///
    /// Never fails: unknown TLDs, connection problems, timeouts, rate
    /// limiting, and unclassifiable responses all come back as
    /// [`RegistrySignal::LookupFailed`].
    pub async fn lookup(&self, domain: &str) -> RegistrySignal {
        let Some(tld) = extract_tld(domain) else {
            return RegistrySignal::LookupFailed("domain has no TLD".to_string());
        };

        let Some(server) = whois_server_for(&tld) else {
            return RegistrySignal::LookupFailed(format!("no WHOIS server for .{}", tld));
        };

        debug!(domain, server, "whois lookup");

        let result = tokio::time::timeout(self.timeout, query_server(server, domain)).await;

        match result {
            Ok(Ok(response)) => parse_whois_response(&response),
            Ok(Err(e)) => {
                RegistrySignal::LookupFailed(format!("WHOIS connection failed: {}", e))
            }
            Err(_) => {
                RegistrySignal::LookupFailed(format!("WHOIS timed out after {:?}", self.timeout))
            }
        }
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One port-43 conversation: send the domain, read until the server closes.
async fn query_server(server: &str, domain: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect((server, WHOIS_PORT)).await?;
    stream
        .write_all(format!("{}\r\n", domain).as_bytes())
        .await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;

    Ok(response)
}

/// Classify a WHOIS response into a registry signal.
///
/// Availability patterns are checked first since they are the most
/// specific. Otherwise the record fields are scraped line-wise; multiple
/// registration indicators without a scrapeable name still count as a
/// (nameless) record, which the verdict will not treat as confirmation.
/// Responses that match nothing are a lookup failure, not a guess.
pub(crate) fn parse_whois_response(response: &str) -> RegistrySignal {
    let output_lower = response.to_lowercase();

    // Rate limiting gets no retry; report it and move on
    if is_rate_limited(&output_lower) {
        return RegistrySignal::LookupFailed("rate limited by WHOIS server".to_string());
    }

    // Patterns that indicate the registry has no record
    let available_patterns = [
        "no match",
        "not found",
        "no data found",
        "no entries found",
        "domain not found",
        "domain available",
        "status: available",
        "status: free",
        "no information available",
        "not registered",
        "no matching record",
        "domain status: no object found",
        "the queried object does not exist",
        "object does not exist",
        "no matching entry",
        "domain name not found",
        "this domain name has not been registered",
    ];

    for pattern in &available_patterns {
        if output_lower.contains(pattern) {
            return RegistrySignal::NotFound;
        }
    }

    let record = scrape_record(response);
    if record
        .registered_name
        .as_deref()
        .is_some_and(|name| !name.is_empty())
    {
        return RegistrySignal::Found(record);
    }

    // Patterns that indicate a registration exists
    let taken_patterns = [
        "domain status:",
        "registrar:",
        "creation date:",
        "created:",
        "registry domain id:",
        "registrant:",
        "admin contact:",
        "tech contact:",
        "name server:",
        "nameservers:",
        "expiry date:",
        "expires:",
        "updated:",
        "last updated:",
    ];

    let taken_pattern_count = taken_patterns
        .iter()
        .filter(|pattern| output_lower.contains(*pattern))
        .count();

    // Multiple indicators without a scrapeable name: still a record
    if taken_pattern_count >= 2 {
        return RegistrySignal::Found(record);
    }

    // Very short responses usually mean "nothing on file"
    if output_lower.trim().len() < 50 {
        return RegistrySignal::NotFound;
    }

    // For truly ambiguous cases, fail the lookup instead of guessing
    RegistrySignal::LookupFailed("unclassifiable WHOIS response".to_string())
}

/// Scrape registration fields from a WHOIS response, line-wise.
///
/// Keys are matched case-insensitively; values keep their original case.
/// The first occurrence of each key wins, so the registry section of a
/// thick response takes precedence over registrar boilerplate below it.
fn scrape_record(response: &str) -> RegistrationRecord {
    let mut record = RegistrationRecord::default();

    for line in response.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "domain name" | "domain" => {
                if record.registered_name.is_none() {
                    record.registered_name = Some(value.to_string());
                }
            }
            "registrar" => {
                if record.registrar.is_none() {
                    record.registrar = Some(value.to_string());
                }
            }
            "creation date" | "created" | "registered on" => {
                if record.creation_date.is_none() {
                    record.creation_date = Some(value.to_string());
                }
            }
            "registry expiry date" | "expiry date" | "expiration date" | "expires" => {
                if record.expiration_date.is_none() {
                    record.expiration_date = Some(value.to_string());
                }
            }
            "domain status" | "status" => {
                record.status.push(value.to_string());
            }
            _ => {}
        }
    }

    record
}

/// Check if the WHOIS output indicates rate limiting.
fn is_rate_limited(output_lower: &str) -> bool {
    let rate_limit_patterns = [
        "rate limit exceeded",
        "too many requests",
        "try again later",
        "quota exceeded",
        "limit exceeded",
        "throttled",
        "rate-limited",
    ];

    rate_limit_patterns
        .iter()
        .any(|pattern| output_lower.contains(pattern))
}
