//! Wordlist loading and domain validation.
//!
//! The wordlist is the candidate source: one prefix per line, whitespace
//! trimmed, blank lines and `#` comments skipped. Duplicates are kept;
//! they simply double-resolve, which is harmless.

use crate::error::SubscoutError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read subdomain prefixes from a file, one per line.
///
/// Inline comments (`api # main gateway`) are stripped. An unreadable file,
/// or a file yielding no usable prefixes, is a fatal source error.
pub fn load_wordlist(file_path: &str) -> Result<Vec<String>, SubscoutError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SubscoutError::source(file_path, "file not found"));
    }

    let file = File::open(path)
        .map_err(|e| SubscoutError::source(file_path, format!("failed to open: {}", e)))?;
    let reader = BufReader::new(file);

    let mut prefixes = Vec::new();
    for line in reader.lines() {
        let line =
            line.map_err(|e| SubscoutError::source(file_path, format!("read error: {}", e)))?;
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Handle inline comments
        let prefix = trimmed.split('#').next().unwrap_or("").trim();
        if prefix.is_empty() {
            continue;
        }

        prefixes.push(prefix.to_string());
    }

    if prefixes.is_empty() {
        return Err(SubscoutError::source(
            file_path,
            "no usable prefixes found in wordlist",
        ));
    }

    Ok(prefixes)
}

/// Validate the base domain a scan targets.
///
/// Checks basic DNS syntax label by label; more thorough verification
/// happens implicitly during lookup. A malformed base domain is a fatal
/// precondition failure, detected before any lookup is issued.
pub fn validate_base_domain(domain: &str) -> Result<(), SubscoutError> {
    let domain = domain.trim().trim_end_matches('.');

    if domain.is_empty() {
        return Err(SubscoutError::invalid_domain(
            domain,
            "domain cannot be empty",
        ));
    }

    if domain.len() > 253 {
        return Err(SubscoutError::invalid_domain(
            domain,
            "domain exceeds 253 characters",
        ));
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return Err(SubscoutError::invalid_domain(
            domain,
            "expected at least two labels (e.g., example.com)",
        ));
    }

    for part in parts {
        if part.is_empty() || part.len() > 63 {
            return Err(SubscoutError::invalid_domain(
                domain,
                "each label must be 1-63 characters",
            ));
        }

        if part.starts_with('-') || part.ends_with('-') {
            return Err(SubscoutError::invalid_domain(
                domain,
                "labels cannot start or end with a hyphen",
            ));
        }

        if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(SubscoutError::invalid_domain(
                domain,
                "labels may only contain letters, digits, and hyphens",
            ));
        }
    }

    Ok(())
}
