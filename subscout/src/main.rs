//! Subscout CLI Application
//!
//! A command-line interface for DNS-based subdomain discovery. Confirmed
//! hostnames stream to stdout one per line as they resolve; everything
//! meant for humans (banner, summary, warnings) goes to stderr so the
//! output stays pipeline friendly.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use futures::StreamExt;
use std::process;
use std::time::Duration;
use subscout_lib::{
    load_env_config, load_wordlist, ConfigManager, FileConfig, ScanConfig, SubdomainScanner,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for subscout
#[derive(Parser, Debug)]
#[command(name = "subscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover subdomains via DNS resolution of wordlist candidates")]
#[command(
    long_about = "Discover subdomains by resolving prefix.domain candidates from a wordlist.\n\nLookups run concurrently under a configurable cap, each bounded by a timeout.\nConfirmed hostnames stream to stdout as they resolve. Only scan domains you\nown or are authorized to assess."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Base domain to enumerate (e.g., example.com)
    #[arg(value_name = "DOMAIN", help_heading = "Target")]
    pub domain: String,

    /// Wordlist file with one subdomain prefix per line
    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "FILE",
        help_heading = "Target"
    )]
    pub wordlist: String,

    /// Max concurrent DNS lookups
    #[arg(
        short = 'c',
        long = "concurrency",
        default_value_t = 100,
        help_heading = "Performance"
    )]
    pub concurrency: usize,

    /// Per-lookup timeout in seconds (fractional allowed)
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        default_value_t = 2.0,
        help_heading = "Performance"
    )]
    pub timeout: f64,

    /// Collect everything and print a JSON report instead of streaming
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Colored output with a progress counter per discovery
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Suppress the end-of-run summary
    #[arg(short = 'q', long = "quiet", help_heading = "Output Format")]
    pub quiet: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logging on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose progress information
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Display options resolved from CLI flags, env vars, and config files.
struct DisplayConfig {
    pretty: bool,
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.debug {
        init_tracing();
    }

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(2);
    }

    // Run the scan
    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Set up debug logging to stderr.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("subscout=debug,subscout_lib=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.concurrency == 0 {
        return Err("Concurrency must be at least 1".to_string());
    }

    if !args.timeout.is_finite() || args.timeout <= 0.0 {
        return Err("Timeout must be a positive number of seconds".to_string());
    }

    // Streaming-only decorations make no sense on a JSON report
    if args.json && args.pretty {
        return Err("Cannot use --json with --pretty".to_string());
    }

    Ok(())
}

/// Main scan logic
async fn run_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (config, display) = build_config(&args)?;

    let prefixes = load_wordlist(&args.wordlist)?;

    if args.verbose {
        eprintln!(
            "Scanning {} candidates under {} (concurrency {}, timeout {:?})",
            prefixes.len(),
            config.base_domain,
            config.concurrency,
            config.timeout
        );
    }

    let scanner = SubdomainScanner::new(config);

    if args.json {
        run_batch_scan(&scanner, &prefixes).await
    } else {
        run_streaming_scan(&scanner, &prefixes, &display).await
    }
}

/// Stream confirmed hostnames to stdout as they resolve.
///
/// Ctrl-C cancels cooperatively: dispatch stops, in-flight lookups finish
/// or time out, and the summary still reflects what actually happened.
async fn run_streaming_scan(
    scanner: &SubdomainScanner,
    prefixes: &[String],
    display: &DisplayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if display.pretty {
        ui::print_header(
            &scanner.config().base_domain,
            prefixes.len(),
            scanner.config().concurrency,
        );
    }

    let mut scan = scanner.scan_stream(prefixes)?;
    let mut found = 0usize;
    let mut interrupted = false;

    loop {
        tokio::select! {
            maybe = scan.next() => match maybe {
                Some(discovery) => {
                    found += 1;
                    if display.pretty {
                        ui::print_discovery(&discovery, found);
                    } else {
                        println!("{}", discovery.fqdn);
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                scan.cancel();
                eprintln!("Interrupted, draining in-flight lookups...");
            }
        }
    }

    let summary = scan.finish().await;
    if !display.quiet {
        ui::print_summary(&summary);
    }

    Ok(())
}

/// Collect the whole run and print one JSON report.
async fn run_batch_scan(
    scanner: &SubdomainScanner,
    prefixes: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let report = scanner.scan(prefixes).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Build the scan configuration with proper precedence.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (SUBSCOUT_*)
/// 3. Local config file (./subscout.toml or ./.subscout.toml)
/// 4. Home config file (~/.subscout.toml)
/// 5. XDG config file (~/.config/subscout/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args) -> Result<(ScanConfig, DisplayConfig), Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.verbose);

    let file_config = if let Some(explicit_path) = &args.config {
        config_manager
            .load_file(explicit_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_path, e))?
    } else if let Ok(env_path) = std::env::var("SUBSCOUT_CONFIG") {
        config_manager
            .load_file(&env_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_path, e))?
    } else {
        match config_manager.discover_and_load() {
            Ok(config) => config,
            Err(e) => {
                if args.verbose {
                    eprintln!("Config discovery warning: {}", e);
                }
                FileConfig::default()
            }
        }
    };

    // Built-in defaults
    let mut concurrency = 100usize;
    let mut timeout = 2.0f64;
    let mut pretty = false;
    let mut quiet = false;

    // Config file values
    if let Some(defaults) = file_config.defaults {
        if let Some(value) = defaults.concurrency {
            concurrency = value;
        }
        if let Some(value) = defaults.timeout {
            timeout = value;
        }
        if let Some(value) = defaults.pretty {
            pretty = value;
        }
        if let Some(value) = defaults.quiet {
            quiet = value;
        }
    }

    // Environment variables
    let env_config = load_env_config(args.verbose);
    if let Some(value) = env_config.concurrency {
        concurrency = value;
    }
    if let Some(value) = env_config.timeout {
        timeout = value;
    }
    if let Some(value) = env_config.quiet {
        quiet = value;
    }

    // CLI arguments win. Clap can't tell an explicit default apart from an
    // omitted flag, so a value equal to the default falls through to the
    // env/file layers; boolean flags only ever enable.
    if args.concurrency != 100 {
        concurrency = args.concurrency;
    }
    if args.timeout != 2.0 {
        timeout = args.timeout;
    }
    if args.pretty {
        pretty = true;
    }
    if args.quiet {
        quiet = true;
    }

    let scan_config = ScanConfig::new(args.domain.clone())
        .with_concurrency(concurrency)
        .with_timeout(Duration::from_secs_f64(timeout));

    Ok((scan_config, DisplayConfig { pretty, quiet }))
}
