//! # Domain Sift Library
//!
//! A library for sifting batches of domain names into available and
//! unavailable sets, using registry lookups (RDAP with WHOIS fallback)
//! confirmed by forward DNS resolution.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_sift_lib::{BatchRunner, DomainChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = BatchRunner::new(DomainChecker::new()?, 20)?;
//!     let report = runner.run(["example.com", "probably-free-name.org"]).await;
//!
//!     println!("available:   {:?}", report.available);
//!     println!("unavailable: {:?}", report.unavailable);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **RDAP Protocol**: Modern registration data access, tried first
//! - **WHOIS Fallback**: Port-43 lookup when RDAP gives no verdict
//! - **DNS Confirmation**: Forward resolution catches registered-but-quiet names
//! - **Bounded Concurrency**: Batch runs fan out over a fixed worker pool

// Re-export the public API so callers use domain_sift_lib::TypeName
pub use batch::{BatchReport, BatchRunner};
pub use checker::DomainChecker;
pub use config::{
    load_env_config, parse_duration_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::SiftError;
pub use protocols::{NameResolver, RegistryLookup};
pub use types::{
    is_available, CheckConfig, CheckOutcome, DnsSignal, RegistrationRecord, RegistrySignal,
};
pub use utils::normalize_lines;

// Internal modules - these are not part of the public API
mod batch;
mod checker;
mod config;
mod error;
mod protocols;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SiftError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
