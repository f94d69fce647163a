//! Domain Sift CLI Application
//!
//! A command-line interface for sifting batches of domain names into
//! available and unavailable sets. This CLI application provides a
//! user-friendly interface to the domain-sift-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_sift_lib::{
    load_env_config, normalize_lines, parse_duration_string, BatchReport, BatchRunner, CheckConfig,
    ConfigManager, DomainChecker, EnvConfig, FileConfig,
};
use futures::StreamExt;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Worker pool size used when no flag, env var, or config file sets one.
const DEFAULT_WORKERS: usize = 20;

/// CLI arguments for domain-sift
#[derive(Parser, Debug)]
#[command(name = "domain-sift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sift a batch of domains into available and unavailable sets")]
#[command(
    long_about = "Reads a file of domain names (one per line), checks each against its registry (RDAP with WHOIS fallback) and forward DNS, and writes the names into <PREFIX>_available.txt and <PREFIX>_unavailable.txt."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Input file with domain names to check (one per line)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help_heading = "Input/Output"
    )]
    pub input: PathBuf,

    /// Prefix for the two output files (<PREFIX>_available.txt, <PREFIX>_unavailable.txt)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PREFIX",
        help_heading = "Input/Output"
    )]
    pub output: String,

    /// Max concurrent domain checks [default: 20]
    #[arg(
        short = 'w',
        long = "workers",
        value_name = "COUNT",
        help_heading = "Performance"
    )]
    pub workers: Option<usize>,

    /// Per-lookup timeout, e.g. "3s", "750ms", "2m"
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Disable automatic WHOIS fallback
    #[arg(long = "no-whois", help_heading = "Protocol")]
    pub no_whois: bool,

    /// Show each result as it completes
    #[arg(short = 'v', long = "verbose", help_heading = "Diagnostics")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Validate arguments before touching any file
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the batch check
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Set up the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` raises the default
/// level to debug for our crates. Diagnostics go to stderr so stdout
/// stays reserved for results.
fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "domain_sift=debug,domain_sift_lib=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(0) = args.workers {
        return Err("worker count must be at least 1".to_string());
    }

    if args.output.trim().is_empty() {
        return Err("output prefix must not be empty".to_string());
    }

    Ok(())
}

/// Settings after CLI, environment, config file, and defaults are merged.
#[derive(Debug)]
struct EffectiveSettings {
    workers: usize,
    check: CheckConfig,
}

/// Resolve effective settings from every configuration layer.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (DS_*)
/// 3. Discovered config file (nearest of ./.domain-sift.toml and friends)
/// 4. Built-in defaults
fn resolve_settings(args: &Args) -> Result<EffectiveSettings, Box<dyn std::error::Error>> {
    let file_config = ConfigManager::new().discover_and_load()?;
    let env_config = load_env_config();
    merge_settings(file_config, env_config, args)
}

/// Merge the configuration layers in precedence order.
fn merge_settings(
    file_config: FileConfig,
    env_config: EnvConfig,
    args: &Args,
) -> Result<EffectiveSettings, Box<dyn std::error::Error>> {
    let mut workers = DEFAULT_WORKERS;
    let mut check = CheckConfig::default();

    // Config file (lowest of the explicit layers)
    if let Some(defaults) = file_config.defaults {
        if let Some(count) = defaults.workers {
            workers = count;
        }
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_duration_string) {
            check = check.with_timeout(timeout);
        }
        if let Some(enabled) = defaults.whois_fallback {
            check = check.with_whois_fallback(enabled);
        }
    }

    // Environment variables
    if let Some(count) = env_config.workers {
        workers = count;
    }
    if let Some(timeout) = env_config.timeout {
        check = check.with_timeout(timeout);
    }
    if let Some(enabled) = env_config.whois_fallback {
        check = check.with_whois_fallback(enabled);
    }

    // CLI arguments win over everything
    if let Some(count) = args.workers {
        workers = count;
    }
    if let Some(timeout_str) = &args.timeout {
        let timeout = parse_duration_string(timeout_str).ok_or_else(|| {
            format!(
                "invalid --timeout '{}', use a format like '5s', '750ms', '2m'",
                timeout_str
            )
        })?;
        check = check.with_timeout(timeout);
    }
    // The flag only disables; config and env settings survive its absence
    if args.no_whois {
        check = check.with_whois_fallback(false);
    }

    Ok(EffectiveSettings { workers, check })
}

/// Main batch checking logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(&args)?;

    let input = fs::read_to_string(&args.input)
        .map_err(|e| format!("failed to read input file '{}': {}", args.input.display(), e))?;
    let domains = normalize_lines(input.lines());
    let total = domains.len();

    debug!(total, workers = settings.workers, "starting batch check");

    let checker = DomainChecker::with_config(settings.check)?;
    let runner = BatchRunner::new(checker, settings.workers)?;

    // Spinner on stderr while the batch runs, unless per-result lines
    // are being printed anyway
    let spinner = if !args.verbose && total > 0 {
        ui::Spinner::start(format!("Checking {} domains...", total))
    } else {
        None
    };

    let mut report = BatchReport::default();
    let mut completed = 0usize;
    let mut outcomes = runner.check_stream(domains);
    while let Some(outcome) = outcomes.next().await {
        completed += 1;
        report.record(&outcome);
        if args.verbose {
            let counter = if total > 1 {
                Some((completed, total))
            } else {
                None
            };
            ui::print_result(&outcome, counter);
        }
    }

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    let available_path = format!("{}_available.txt", args.output);
    let unavailable_path = format!("{}_unavailable.txt", args.output);
    write_domain_list(&available_path, &report.available)?;
    write_domain_list(&unavailable_path, &report.unavailable)?;

    if args.verbose && total > 0 {
        println!();
    }
    ui::print_summary(&report, &available_path, &unavailable_path);

    Ok(())
}

/// Write one domain list, one name per line with a trailing newline.
/// An empty list produces an empty file.
fn write_domain_list(path: &str, domains: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut content = domains.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)
        .map_err(|e| format!("failed to write output file '{}': {}", path, e))?;
    Ok(())
}

// domain-sift/src/main.rs tests module
