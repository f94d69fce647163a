//! Terminal output for the domain-sift CLI.
//!
//! This module handles the per-result lines shown in verbose mode, the
//! spinner animation shown while a quiet batch runs, and the final
//! three-line summary. Uses only the `console` crate (already a dependency).

use console::{pad_str, style, Alignment, Term};
use domain_sift_lib::{BatchReport, CheckOutcome, DnsSignal, RegistrySignal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Activity indicator shown on stderr while a quiet batch runs.
pub struct Spinner {
    active: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Begin animating with the given message. Returns None when stderr is
    /// not attached to a terminal, so piped and redirected runs stay clean.
    pub fn start(message: String) -> Option<Self> {
        let term = Term::stderr();
        if !term.is_term() {
            return None;
        }

        let active = Arc::new(AtomicBool::new(true));
        let ticker = active.clone();

        let handle = tokio::spawn(async move {
            for frame in SPINNER_FRAMES.iter().cycle() {
                if !ticker.load(Ordering::Relaxed) {
                    break;
                }
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            active,
            handle: Some(handle),
        })
    }

    /// Halt the animation and erase the line.
    pub async fn stop(mut self) {
        self.active.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single check outcome with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_result(outcome: &CheckOutcome, counter: Option<(usize, usize)>) {
    let domain_width = 30;
    let padded_domain = pad_str(&outcome.domain, domain_width, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => {
            format!("{} ", style(format!("[{}/{}]", cur, total)).dim())
        }
        None => String::new(),
    };

    let note = outcome_note(outcome);
    let note = if note.is_empty() {
        String::new()
    } else {
        format!("  {}", style(note).dim())
    };

    if outcome.available {
        println!(
            "  {}{}  {}{}",
            prefix,
            style(&padded_domain).white(),
            style("AVAILABLE").green().bold(),
            note,
        );
    } else {
        println!(
            "  {}{}  {}{}",
            prefix,
            style(&padded_domain).white(),
            style("TAKEN").red().bold(),
            note,
        );
    }
}

/// A short parenthesized reason for the verdict, or "" when the clean
/// available case needs no qualifier.
fn outcome_note(outcome: &CheckOutcome) -> String {
    if outcome.available {
        match (&outcome.registry, outcome.dns.as_ref()) {
            (RegistrySignal::LookupFailed(_), _) => "(no registry answer)".to_string(),
            (_, Some(DnsSignal::ResolveFailed(_))) => "(dns inconclusive)".to_string(),
            _ => String::new(),
        }
    } else {
        match (&outcome.registry, outcome.dns.as_ref()) {
            (RegistrySignal::Found(record), _) => match &record.registrar {
                Some(registrar) => format!("(registered via {})", registrar),
                None => "(registered)".to_string(),
            },
            (_, Some(DnsSignal::Resolved(addr))) => format!("(resolves to {})", addr),
            // Only blank inputs reach here: nothing was looked up.
            _ => "(blank input)".to_string(),
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the closing summary. Three lines, always in this shape:
///
/// ```text
/// Checked 9 domains.
/// Available: 4 (see run_available.txt)
/// Unavailable: 5 (see run_unavailable.txt)
/// ```
pub fn print_summary(report: &BatchReport, available_path: &str, unavailable_path: &str) {
    println!("Checked {} domains.", style(report.checked()).bold());
    println!(
        "Available: {} (see {})",
        style(report.available.len()).green().bold(),
        available_path,
    );
    println!(
        "Unavailable: {} (see {})",
        style(report.unavailable.len()).red().bold(),
        unavailable_path,
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use domain_sift_lib::RegistrationRecord;
    use std::net::{IpAddr, Ipv4Addr};

    fn make_outcome(
        available: bool,
        registry: RegistrySignal,
        dns: Option<DnsSignal>,
    ) -> CheckOutcome {
        CheckOutcome {
            domain: "example.com".to_string(),
            available,
            registry,
            dns,
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_note_registered_with_registrar() {
        let outcome = make_outcome(
            false,
            RegistrySignal::Found(RegistrationRecord {
                registered_name: Some("EXAMPLE.COM".to_string()),
                registrar: Some("Example Registrar Inc.".to_string()),
                ..Default::default()
            }),
            None,
        );
        assert_eq!(outcome_note(&outcome), "(registered via Example Registrar Inc.)");
    }

    #[test]
    fn test_note_taken_by_dns_alone() {
        let outcome = make_outcome(
            false,
            RegistrySignal::LookupFailed("rdap: unsupported TLD".to_string()),
            Some(DnsSignal::Resolved(IpAddr::V4(Ipv4Addr::new(
                203, 0, 113, 9,
            )))),
        );
        assert_eq!(outcome_note(&outcome), "(resolves to 203.0.113.9)");
    }

    #[test]
    fn test_note_clean_available_is_empty() {
        let outcome = make_outcome(
            true,
            RegistrySignal::NotFound,
            Some(DnsSignal::NoSuchHost),
        );
        assert_eq!(outcome_note(&outcome), "");
    }

    #[test]
    fn test_note_available_despite_failed_lookup() {
        let outcome = make_outcome(
            true,
            RegistrySignal::LookupFailed("timed out".to_string()),
            Some(DnsSignal::NoSuchHost),
        );
        assert_eq!(outcome_note(&outcome), "(no registry answer)");
    }

    #[test]
    fn test_note_blank_input() {
        let outcome = CheckOutcome {
            domain: String::new(),
            available: false,
            registry: RegistrySignal::LookupFailed("empty domain name".to_string()),
            dns: None,
            elapsed: Duration::ZERO,
        };
        assert_eq!(outcome_note(&outcome), "(blank input)");
    }
}
