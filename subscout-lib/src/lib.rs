//! # Subscout Library
//!
//! A bounded-concurrency DNS subdomain discovery engine.
//!
//! Given a base domain and a wordlist of candidate prefixes, subscout
//! determines which `prefix.domain` combinations resolve to a valid DNS
//! record, using DNS queries only. Lookups run in parallel under a
//! concurrency cap, each bounded by a timeout, and confirmed names are
//! streamed to the caller as they are found.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use subscout_lib::{ScanConfig, SubdomainScanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = SubdomainScanner::new(ScanConfig::new("example.com"));
//!     let prefixes = vec!["www".to_string(), "mail".to_string()];
//!
//!     let report = scanner.scan(&prefixes).await?;
//!     for discovery in &report.discoveries {
//!         println!("{}", discovery.fqdn);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: a permit pool caps in-flight lookups
//! - **Per-lookup timeouts**: slow answers never stall the batch
//! - **Streaming results**: names surface the moment they resolve
//! - **Failure tolerance**: individual lookup failures never abort a run
//! - **Injectable resolver**: test with scripted DNS answers

// Re-export main public API types and functions
pub use config::{load_env_config, ConfigManager, DefaultsConfig, EnvConfig, FileConfig};
pub use engine::{ScanHandle, SubdomainScanner};
pub use error::SubscoutError;
pub use resolver::{NameResolver, ResolveFailure, SystemResolver};
pub use types::{
    Candidate, Discovery, LookupOutcome, RunPhase, RunSummary, ScanConfig, ScanReport,
    UnresolvedReason,
};
pub use wordlist::{load_wordlist, validate_base_domain};

// Internal modules
mod config;
mod engine;
mod error;
mod resolver;
mod types;
mod wordlist;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SubscoutError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
