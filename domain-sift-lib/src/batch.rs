//! Bounded concurrent checking of many domains.
//!
//! The runner owns the concurrency limit and nothing else owns one: at
//! most `workers` checks are in flight at any moment, and results come
//! back in completion order, not input order. Aggregation is single
//! writer; one collector loop appends to the two lists, so there is no
//! locking anywhere in the fan-out.

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::debug;

use crate::checker::DomainChecker;
use crate::error::SiftError;
use crate::types::CheckOutcome;
use crate::utils::normalize_lines;

/// Percolates batches of domains through a bounded worker pool.
///
/// # Example
///
/// ```rust,no_run
/// use domain_sift_lib::{BatchRunner, DomainChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let runner = BatchRunner::new(DomainChecker::new()?, 20)?;
///     let report = runner.run(vec!["example.com", "probably-free-0192.com"]).await;
///     println!("available: {:?}", report.available);
///     Ok(())
/// }
/// ```
pub struct BatchRunner {
    checker: DomainChecker,
    workers: usize,
}

/// The partitioned outcome of one batch run.
///
/// Both lists hold domains in the order their checks completed. They are
/// disjoint, and together they account for every non-blank input line,
/// duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Domains with no evidence of registration
    pub available: Vec<String>,

    /// Domains confirmed or presumed registered
    pub unavailable: Vec<String>,
}

impl BatchReport {
    /// File one outcome into the matching list.
    pub fn record(&mut self, outcome: &CheckOutcome) {
        if outcome.available {
            self.available.push(outcome.domain.clone());
        } else {
            self.unavailable.push(outcome.domain.clone());
        }
    }

    /// Number of domains actually checked (blank lines never count).
    pub fn checked(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }
}

impl BatchRunner {
    /// Create a runner over the given checker with a fixed worker count.
    ///
    /// The worker count is validated here, at startup, rather than deep
    /// inside the pool: zero workers is a configuration error.
    pub fn new(checker: DomainChecker, workers: usize) -> Result<Self, SiftError> {
        if workers == 0 {
            return Err(SiftError::config("worker count must be at least 1"));
        }

        Ok(Self { checker, workers })
    }

    /// The configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Check a prepared list of domains, yielding outcomes as they finish.
    ///
    /// At most [`workers`](Self::workers) checks run concurrently. The
    /// input is dispatched as given: callers that want blank-line
    /// filtering should go through [`run`](Self::run) or normalize first.
    pub fn check_stream(
        &self,
        domains: Vec<String>,
    ) -> Pin<Box<dyn Stream<Item = CheckOutcome> + Send + '_>> {
        let checker = self.checker.clone();

        let stream = stream::iter(domains)
            .map(move |domain| {
                let checker = checker.clone();
                async move { checker.check_domain(&domain).await }
            })
            .buffer_unordered(self.workers);

        Box::pin(stream)
    }

    /// Check a batch of raw input lines and partition the results.
    ///
    /// Lines are trimmed and blank lines dropped before dispatch; dropped
    /// lines are not counted. Duplicates are checked once per occurrence.
    /// The returned report lists domains in completion order.
    pub async fn run<I, S>(&self, lines: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = normalize_lines(lines);
        debug!(
            domains = domains.len(),
            workers = self.workers,
            "starting batch run"
        );

        let mut report = BatchReport::default();
        let mut outcomes = self.check_stream(domains);

        while let Some(outcome) = outcomes.next().await {
            report.record(&outcome);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{NameResolver, RegistryLookup};
    use crate::types::{CheckConfig, DnsSignal, RegistrationRecord, RegistrySignal};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Registry stub: domains present in the map are registered.
    struct MapRegistry(HashMap<String, RegistrySignal>);

    #[async_trait]
    impl RegistryLookup for MapRegistry {
        async fn lookup(&self, domain: &str) -> RegistrySignal {
            self.0
                .get(domain)
                .cloned()
                .unwrap_or(RegistrySignal::NotFound)
        }
    }

    /// Resolver stub: nothing resolves.
    struct DarkResolver;

    #[async_trait]
    impl NameResolver for DarkResolver {
        async fn resolve(&self, _domain: &str) -> DnsSignal {
            DnsSignal::NoSuchHost
        }
    }

    fn registered(domain: &str) -> (String, RegistrySignal) {
        (
            domain.to_string(),
            RegistrySignal::Found(RegistrationRecord {
                registered_name: Some(domain.to_string()),
                ..Default::default()
            }),
        )
    }

    fn stub_runner(taken: &[&str], workers: usize) -> BatchRunner {
        let map: HashMap<_, _> = taken.iter().map(|d| registered(d)).collect();
        let checker = DomainChecker::with_providers(
            CheckConfig::default(),
            Arc::new(MapRegistry(map)),
            Arc::new(DarkResolver),
        );
        BatchRunner::new(checker, workers).unwrap()
    }

    #[test]
    fn zero_workers_is_rejected_at_construction() {
        let checker = DomainChecker::with_providers(
            CheckConfig::default(),
            Arc::new(MapRegistry(HashMap::new())),
            Arc::new(DarkResolver),
        );

        let result = BatchRunner::new(checker, 0);
        assert!(matches!(result, Err(SiftError::Config { .. })));
    }

    #[test]
    fn partitions_taken_from_free() {
        let runner = stub_runner(&["taken.com"], 4);
        let report = tokio_test::block_on(runner.run(vec!["taken.com", "free.com"]));

        assert_eq!(report.unavailable, vec!["taken.com"]);
        assert_eq!(report.available, vec!["free.com"]);
        assert_eq!(report.checked(), 2);
    }

    #[test]
    fn blank_lines_are_dropped_not_counted() {
        let runner = stub_runner(&[], 4);
        let report = tokio_test::block_on(runner.run(vec!["free.com", "", "   ", "\t"]));

        assert_eq!(report.checked(), 1);
        assert_eq!(report.available, vec!["free.com"]);
    }

    #[test]
    fn duplicates_are_checked_per_occurrence() {
        let runner = stub_runner(&["dup.com"], 2);
        let report = tokio_test::block_on(runner.run(vec!["dup.com", "dup.com"]));

        assert_eq!(report.unavailable, vec!["dup.com", "dup.com"]);
        assert_eq!(report.checked(), 2);
    }

    #[test]
    fn single_worker_checks_everything() {
        let runner = stub_runner(&[], 1);
        let domains = vec!["a.com", "b.com", "c.com", "d.com", "e.com"];
        let report = tokio_test::block_on(runner.run(domains.clone()));

        assert_eq!(report.available.len(), 5);
        assert!(report.unavailable.is_empty());
        for domain in domains {
            assert!(report.available.iter().any(|d| d == domain));
        }
    }
}
