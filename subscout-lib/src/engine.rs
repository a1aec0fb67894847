//! The bounded-concurrency resolution engine.
//!
//! This module provides [`SubdomainScanner`], which drives a full scan:
//! it validates configuration up front, dispatches one resolution worker
//! per candidate under a semaphore-enforced concurrency cap, races every
//! lookup against the per-lookup timeout, and streams confirmed names to
//! the caller as they arrive.
//!
//! A scan is two cooperating tasks plus N short-lived workers:
//! - the dispatcher acquires a permit, spawns a worker, repeat;
//! - each worker performs exactly one lookup and reports one outcome;
//! - the collector receives outcomes, keeps the run counters (it is the
//!   only writer), and forwards resolved names onto the result stream.
//!
//! Individual lookup failures never abort a scan. The only errors a scan
//! can return are pre-run precondition failures.

use crate::error::SubscoutError;
use crate::resolver::{NameResolver, ResolveFailure, SystemResolver};
use crate::types::{
    Candidate, Discovery, LookupOutcome, RunPhase, RunSummary, ScanConfig, ScanReport,
    UnresolvedReason,
};
use crate::wordlist::validate_base_domain;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch, Semaphore};

/// Main scanner that coordinates subdomain discovery runs.
///
/// The scanner owns the scan configuration and the DNS resolver. The
/// resolver is an injected trait object so callers (and tests) can swap
/// the system resolver for a scripted one.
///
/// # Example
///
/// ```rust,no_run
/// use subscout_lib::{ScanConfig, SubdomainScanner};
/// use futures::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scanner = SubdomainScanner::new(ScanConfig::new("example.com"));
///     let prefixes = vec!["www".to_string(), "mail".to_string()];
///
///     let mut scan = scanner.scan_stream(&prefixes)?;
///     while let Some(discovery) = scan.next().await {
///         println!("{}", discovery.fqdn);
///     }
///     Ok(())
/// }
/// ```
pub struct SubdomainScanner {
    /// Configuration settings for this scanner instance
    config: ScanConfig,
    /// DNS resolution backend
    resolver: Arc<dyn NameResolver>,
}

impl SubdomainScanner {
    /// Create a scanner with the system DNS resolver.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            resolver: Arc::new(SystemResolver::new()),
        }
    }

    /// Create a scanner with a caller-provided resolver.
    ///
    /// This is the seam test doubles plug into.
    pub fn with_resolver(config: ScanConfig, resolver: Arc<dyn NameResolver>) -> Self {
        Self { config, resolver }
    }

    /// Get the current configuration for this scanner.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Start a streaming scan over the given prefixes.
    ///
    /// Candidates are dispatched in input order; discoveries arrive on the
    /// returned handle in completion order, which may differ. The stream
    /// closes only after every candidate has produced an outcome.
    ///
    /// # Errors
    ///
    /// Returns `SubscoutError` before any lookup is issued if:
    /// - `concurrency` is zero or `timeout` is zero
    /// - the base domain is malformed
    /// - the prefix list is empty
    pub fn scan_stream(&self, prefixes: &[String]) -> Result<ScanHandle, SubscoutError> {
        self.validate()?;

        let candidates: Vec<Candidate> = prefixes
            .iter()
            .map(|p| Candidate::new(p, &self.config.base_domain))
            .collect();
        if candidates.is_empty() {
            return Err(SubscoutError::config("candidate list is empty"));
        }
        let total = candidates.len();

        // Channel capacities track the concurrency cap: workers can always
        // hand off their outcome without unbounded buffering, and a slow
        // stream consumer applies backpressure instead of dropping results.
        let capacity = self.config.concurrency;
        let (result_tx, result_rx) = mpsc::channel::<Discovery>(capacity);
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<LookupOutcome>(capacity);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let (summary_tx, summary_rx) = oneshot::channel::<RunSummary>();
        let phase_tx = Arc::new(watch::channel(RunPhase::Idle).0);
        let phase_rx = phase_tx.subscribe();

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let timeout = self.config.timeout;
        let started = Instant::now();

        tracing::debug!(
            "scanning {} candidates under {} (concurrency {}, timeout {:?})",
            total,
            self.config.base_domain,
            self.config.concurrency,
            timeout,
        );

        // Dispatcher: admission control. A permit is acquired before each
        // worker is spawned and travels into the worker task, so it is
        // released on every exit path when the task ends.
        let dispatch_phase = Arc::clone(&phase_tx);
        let dispatch_sem = Arc::clone(&semaphore);
        let dispatch_resolver = Arc::clone(&self.resolver);
        tokio::spawn(async move {
            let _ = dispatch_phase.send(RunPhase::Running);

            'dispatch: for candidate in candidates {
                if *cancel_rx.borrow() {
                    tracing::debug!("scan cancelled, dispatch stopped");
                    break 'dispatch;
                }

                // Race the permit wait against the cancel signal so
                // cancellation does not have to wait for a free slot.
                let permit = loop {
                    tokio::select! {
                        acquired = dispatch_sem.clone().acquire_owned() => {
                            match acquired {
                                Ok(permit) => break permit,
                                Err(_) => break 'dispatch,
                            }
                        }
                        changed = cancel_rx.changed() => {
                            if changed.is_err() {
                                // Cancel handle dropped; nothing can stop
                                // us anymore, wait for the permit alone.
                                match dispatch_sem.clone().acquire_owned().await {
                                    Ok(permit) => break permit,
                                    Err(_) => break 'dispatch,
                                }
                            }
                            if *cancel_rx.borrow() {
                                tracing::debug!("scan cancelled, dispatch stopped");
                                break 'dispatch;
                            }
                        }
                    }
                };

                let resolver = Arc::clone(&dispatch_resolver);
                let outcome_tx = outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = resolve_candidate(resolver.as_ref(), &candidate, timeout).await;
                    let _ = outcome_tx.send(outcome).await;
                    drop(permit);
                });
            }

            // Draining must be observable before the outcome channel can
            // close, or a fast collector could mark the run Complete first.
            let _ = dispatch_phase.send(RunPhase::Draining);
            // Workers hold the remaining senders; the outcome channel
            // closes once the last of them reports.
            drop(outcome_tx);
        });

        // Collector: the single writer of the run counters. Receives every
        // outcome, forwards resolved names, and closes the result stream
        // once all outcomes are in.
        let collect_phase = Arc::clone(&phase_tx);
        tokio::spawn(async move {
            let mut state = RunState::new(total);
            while let Some(outcome) = outcome_rx.recv().await {
                state.record(&outcome);
                if let LookupOutcome::Resolved { fqdn, addresses } = outcome {
                    tracing::debug!("resolved {} ({} addresses)", fqdn, addresses.len());
                    // A dropped stream consumer only stops delivery;
                    // accounting continues until every outcome is in.
                    let _ = result_tx.send(Discovery { fqdn, addresses }).await;
                }
            }
            let _ = collect_phase.send(RunPhase::Complete);
            let _ = summary_tx.send(state.into_summary(started.elapsed()));
        });

        Ok(ScanHandle {
            results: result_rx,
            summary: summary_rx,
            phase: phase_rx,
            cancel: cancel_tx,
        })
    }

    /// Run a scan to completion and collect everything.
    ///
    /// Convenience wrapper over [`scan_stream`](Self::scan_stream) for
    /// callers that don't need incremental results.
    pub async fn scan(&self, prefixes: &[String]) -> Result<ScanReport, SubscoutError> {
        use futures::StreamExt;

        let mut scan = self.scan_stream(prefixes)?;
        let mut discoveries = Vec::new();
        while let Some(discovery) = scan.next().await {
            discoveries.push(discovery);
        }
        let summary = scan.finish().await;

        Ok(ScanReport {
            discoveries,
            summary,
        })
    }

    /// Validate the configuration before opening the result stream.
    fn validate(&self) -> Result<(), SubscoutError> {
        if self.config.concurrency == 0 {
            return Err(SubscoutError::config("concurrency must be at least 1"));
        }
        if self.config.timeout.is_zero() {
            return Err(SubscoutError::config(
                "per-lookup timeout must be greater than zero",
            ));
        }
        validate_base_domain(&self.config.base_domain)?;
        Ok(())
    }
}

/// A running scan: a stream of discoveries plus run control.
///
/// Implements [`Stream`] yielding [`Discovery`] items in completion order.
/// The stream ends when every candidate has produced an outcome (or, after
/// cancellation, when the in-flight remainder has drained).
#[derive(Debug)]
pub struct ScanHandle {
    results: mpsc::Receiver<Discovery>,
    summary: oneshot::Receiver<RunSummary>,
    phase: watch::Receiver<RunPhase>,
    cancel: watch::Sender<bool>,
}

impl ScanHandle {
    /// Current phase of the run. `Complete` is terminal and remains
    /// observable for as long as the handle lives.
    pub fn phase(&self) -> RunPhase {
        *self.phase.borrow()
    }

    /// Request cooperative cancellation.
    ///
    /// No new candidates are dispatched; in-flight lookups finish or time
    /// out naturally, then the stream drains and closes. Idempotent.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Stop consuming discoveries and wait for the run's final summary.
    ///
    /// Closes the result stream side first, so this never blocks on
    /// undelivered discoveries.
    pub async fn finish(mut self) -> RunSummary {
        self.results.close();
        self.summary
            .await
            .expect("scan collector exited without reporting a summary")
    }
}

impl Stream for ScanHandle {
    type Item = Discovery;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.results.poll_recv(cx)
    }
}

/// Resolve one candidate, racing the lookup against the timeout.
///
/// This is the whole resolution worker: no retries, no failure escapes.
async fn resolve_candidate(
    resolver: &dyn NameResolver,
    candidate: &Candidate,
    timeout: Duration,
) -> LookupOutcome {
    match tokio::time::timeout(timeout, resolver.resolve(&candidate.fqdn)).await {
        Ok(Ok(addresses)) if !addresses.is_empty() => LookupOutcome::Resolved {
            fqdn: candidate.fqdn.clone(),
            addresses,
        },
        // A response with zero addresses is not a discovery
        Ok(Ok(_)) => LookupOutcome::Unresolved {
            fqdn: candidate.fqdn.clone(),
            reason: UnresolvedReason::NotFound,
        },
        Ok(Err(ResolveFailure::NotFound)) => LookupOutcome::Unresolved {
            fqdn: candidate.fqdn.clone(),
            reason: UnresolvedReason::NotFound,
        },
        Ok(Err(ResolveFailure::Other(message))) => {
            tracing::debug!("lookup error for {}: {}", candidate.fqdn, message);
            LookupOutcome::Unresolved {
                fqdn: candidate.fqdn.clone(),
                reason: UnresolvedReason::Error,
            }
        }
        // Timeout won the race; the lookup future is dropped, not awaited
        Err(_) => LookupOutcome::Unresolved {
            fqdn: candidate.fqdn.clone(),
            reason: UnresolvedReason::Timeout,
        },
    }
}

/// Run counters, owned exclusively by the collector task.
struct RunState {
    total: usize,
    completed: usize,
    resolved: usize,
    not_found: usize,
    timed_out: usize,
    errors: usize,
}

impl RunState {
    fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            resolved: 0,
            not_found: 0,
            timed_out: 0,
            errors: 0,
        }
    }

    fn record(&mut self, outcome: &LookupOutcome) {
        self.completed += 1;
        match outcome {
            LookupOutcome::Resolved { .. } => self.resolved += 1,
            LookupOutcome::Unresolved { reason, .. } => match reason {
                UnresolvedReason::NotFound => self.not_found += 1,
                UnresolvedReason::Timeout => self.timed_out += 1,
                UnresolvedReason::Error => self.errors += 1,
            },
        }
    }

    fn into_summary(self, duration: Duration) -> RunSummary {
        RunSummary {
            total: self.total,
            completed: self.completed,
            resolved: self.resolved,
            not_found: self.not_found,
            timed_out: self.timed_out,
            errors: self.errors,
            cancelled: self.completed < self.total,
            duration,
        }
    }
}
