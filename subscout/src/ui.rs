//! Display logic for the subscout CLI.
//!
//! Pretty-mode discovery lines and the end-of-run summary. Everything
//! human-oriented writes to stderr; only discovered hostnames ever land
//! on stdout, so redirection captures clean data.

use console::style;
use subscout_lib::{Discovery, RunSummary};

/// Print a styled banner at the start of a pretty run.
pub fn print_header(base_domain: &str, candidates: usize, concurrency: usize) {
    eprintln!(
        "{} {} {}",
        style("subscout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— {} candidate{} under {}",
            candidates,
            if candidates == 1 { "" } else { "s" },
            base_domain
        ))
        .dim(),
    );
    eprintln!("{}", style(format!("Concurrency: {}", concurrency)).dim());
    eprintln!();
}

/// Print one confirmed hostname with its running counter and addresses.
///
/// The hostname itself still goes to stdout so pretty mode remains
/// pipeline friendly; only the decorations differ from plain mode.
pub fn print_discovery(discovery: &Discovery, found: usize) {
    let addresses = discovery
        .addresses
        .iter()
        .map(|addr| addr.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{} {}  {}",
        style(format!("[{}]", found)).dim(),
        style(&discovery.fqdn).green().bold(),
        style(addresses).dim(),
    );
}

/// Print the end-of-run summary to stderr.
pub fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!(
        "{} {} resolved, {} not found, {} timed out, {} errors ({} of {} in {:.1}s)",
        style("Summary:").bold(),
        style(summary.resolved).green().bold(),
        style(summary.not_found).dim(),
        style(summary.timed_out).yellow(),
        style(summary.errors).red(),
        summary.completed,
        summary.total,
        summary.duration.as_secs_f64(),
    );

    if summary.cancelled {
        eprintln!(
            "{}",
            style(format!(
                "Cancelled early: {} candidates were never dispatched",
                summary.total - summary.completed
            ))
            .yellow()
        );
    }
}
