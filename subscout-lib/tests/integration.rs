// subscout-lib/tests/integration.rs

//! Integration tests for the resolution engine, driven through the public
//! API with a scripted resolver instead of live DNS.

use futures::future::BoxFuture;
use futures::StreamExt;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use subscout_lib::{
    NameResolver, ResolveFailure, RunPhase, ScanConfig, SubdomainScanner, SubscoutError,
};

/// Scripted resolver with a concurrency gauge.
///
/// Names in `answers` resolve; names in `failing` return a generic
/// resolver failure; names in `slow` sleep long enough to trip any small
/// per-lookup timeout; everything else is a definitive not-found.
#[derive(Default)]
struct FakeResolver {
    answers: HashMap<String, Vec<IpAddr>>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeResolver {
    fn new() -> Self {
        Self::default()
    }

    fn answer(mut self, fqdn: &str, ip: &str) -> Self {
        self.answers
            .insert(fqdn.to_string(), vec![ip.parse().unwrap()]);
        self
    }

    fn failing(mut self, fqdn: &str) -> Self {
        self.failing.insert(fqdn.to_string());
        self
    }

    fn slow(mut self, fqdn: &str) -> Self {
        self.slow.insert(fqdn.to_string());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Highest number of lookups observed in flight at once.
    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight gauge even when the lookup future is dropped
/// mid-await by the timeout race.
struct GaugeGuard<'a>(&'a AtomicUsize);

impl Drop for GaugeGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl NameResolver for FakeResolver {
    fn resolve<'a>(
        &'a self,
        fqdn: &'a str,
    ) -> BoxFuture<'a, Result<Vec<IpAddr>, ResolveFailure>> {
        Box::pin(async move {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            let _guard = GaugeGuard(&self.in_flight);

            if self.slow.contains(fqdn) {
                tokio::time::sleep(Duration::from_secs(1)).await;
            } else if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if self.failing.contains(fqdn) {
                return Err(ResolveFailure::Other("resolver refused".to_string()));
            }
            match self.answers.get(fqdn) {
                Some(addresses) => Ok(addresses.clone()),
                None => Err(ResolveFailure::NotFound),
            }
        })
    }
}

fn prefixes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn scanner(config: ScanConfig, resolver: FakeResolver) -> (SubdomainScanner, Arc<FakeResolver>) {
    let resolver = Arc::new(resolver);
    let scanner = SubdomainScanner::with_resolver(config, resolver.clone());
    (scanner, resolver)
}

/// Scenario A: one mapped name, one NXDOMAIN. The stream yields exactly
/// the mapped name and the run completes after both outcomes.
#[tokio::test]
async fn test_known_and_unknown_candidates() {
    let resolver = FakeResolver::new().answer("www.example.com", "93.184.216.34");
    let (scanner, _) = scanner(ScanConfig::new("example.com"), resolver);

    let report = scanner
        .scan(&prefixes(&["www", "doesnotexist12345"]))
        .await
        .unwrap();

    let fqdns: Vec<&str> = report.discoveries.iter().map(|d| d.fqdn.as_str()).collect();
    assert_eq!(fqdns, vec!["www.example.com"]);
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.completed, 2);
    assert_eq!(report.summary.resolved, 1);
    assert_eq!(report.summary.not_found, 1);
    assert!(!report.summary.cancelled);
}

/// N candidates yield exactly N outcomes for limits below, at, and above N.
#[tokio::test]
async fn test_outcome_count_invariant_across_limits() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];

    for concurrency in [1usize, 3, 10, 100] {
        let resolver = FakeResolver::new()
            .answer("a.example.com", "10.0.0.1")
            .answer("e.example.com", "10.0.0.5")
            .with_delay(Duration::from_millis(2));
        let config = ScanConfig::new("example.com").with_concurrency(concurrency);
        let (scanner, _) = scanner(config, resolver);

        let report = scanner.scan(&prefixes(&names)).await.unwrap();
        assert_eq!(report.summary.completed, names.len());
        assert_eq!(report.summary.resolved, 2);
        assert_eq!(report.summary.not_found, names.len() - 2);
    }
}

/// Scenario B: with a limit of 1, lookups are strictly serialized.
#[tokio::test]
async fn test_concurrency_limit_one_serializes_lookups() {
    let resolver = FakeResolver::new().with_delay(Duration::from_millis(5));
    let config = ScanConfig::new("example.com").with_concurrency(1);
    let (scanner, resolver) = scanner(config, resolver);

    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    let report = scanner.scan(&prefixes(&names)).await.unwrap();

    assert_eq!(report.summary.completed, 10);
    assert_eq!(resolver.peak(), 1);
}

/// In-flight lookups never exceed the configured limit.
#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let resolver = FakeResolver::new().with_delay(Duration::from_millis(10));
    let config = ScanConfig::new("example.com").with_concurrency(4);
    let (scanner, resolver) = scanner(config, resolver);

    let names: Vec<String> = (0..25).map(|i| format!("host{}", i)).collect();
    let report = scanner.scan(&names).await.unwrap();

    assert_eq!(report.summary.completed, 25);
    assert!(
        resolver.peak() <= 4,
        "peak in-flight was {}, limit 4",
        resolver.peak()
    );
}

/// Scenario C: a lookup that outlives the timeout is reported as a
/// timeout, and costs roughly the timeout rather than the stub's delay.
#[tokio::test]
async fn test_slow_lookup_times_out() {
    let resolver = FakeResolver::new().slow("slow.example.com");
    let config = ScanConfig::new("example.com").with_timeout(Duration::from_millis(10));
    let (scanner, _) = scanner(config, resolver);

    let started = Instant::now();
    let report = scanner.scan(&prefixes(&["slow"])).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.summary.timed_out, 1);
    assert_eq!(report.summary.resolved, 0);
    assert!(
        elapsed < Duration::from_millis(500),
        "run took {:?}, expected roughly the 10ms timeout",
        elapsed
    );
}

/// Scenario D: a non-positive concurrency limit fails before any lookup.
#[tokio::test]
async fn test_invalid_concurrency_rejected_before_lookups() {
    let resolver = FakeResolver::new().answer("www.example.com", "10.0.0.1");
    let config = ScanConfig::new("example.com").with_concurrency(0);
    let (scanner, resolver) = scanner(config, resolver);

    let err = scanner.scan_stream(&prefixes(&["www"])).unwrap_err();
    assert!(matches!(err, SubscoutError::Config { .. }));
    // The result stream was never opened and no lookup was attempted
    assert_eq!(resolver.peak(), 0);
}

/// Mixed failure modes are tallied per reason; none of them abort the run.
#[tokio::test]
async fn test_failures_never_abort_the_batch() {
    let resolver = FakeResolver::new()
        .answer("www.example.com", "10.0.0.1")
        .failing("broken.example.com")
        .slow("slow.example.com");
    let config = ScanConfig::new("example.com").with_timeout(Duration::from_millis(50));
    let (scanner, _) = scanner(config, resolver);

    let report = scanner
        .scan(&prefixes(&["www", "broken", "slow", "missing"]))
        .await
        .unwrap();

    assert_eq!(report.summary.completed, 4);
    assert_eq!(report.summary.resolved, 1);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.summary.timed_out, 1);
    assert_eq!(report.summary.not_found, 1);
}

/// Two identical runs against the same scripted answers find the same set.
#[tokio::test]
async fn test_identical_runs_find_identical_sets() {
    let names = ["www", "mail", "api", "dev", "staging"];
    let mut resolved_sets = Vec::new();

    for _ in 0..2 {
        let resolver = FakeResolver::new()
            .answer("www.example.com", "10.0.0.1")
            .answer("api.example.com", "10.0.0.2")
            .with_delay(Duration::from_millis(2));
        let config = ScanConfig::new("example.com").with_concurrency(3);
        let (scanner, _) = scanner(config, resolver);

        let report = scanner.scan(&prefixes(&names)).await.unwrap();
        let mut fqdns: Vec<String> =
            report.discoveries.iter().map(|d| d.fqdn.clone()).collect();
        fqdns.sort();
        resolved_sets.push(fqdns);
    }

    assert_eq!(resolved_sets[0], resolved_sets[1]);
    assert_eq!(resolved_sets[0], vec!["api.example.com", "www.example.com"]);
}

/// Duplicate prefixes are not deduplicated: each one resolves on its own.
#[tokio::test]
async fn test_duplicate_prefixes_double_resolve() {
    let resolver = FakeResolver::new().answer("www.example.com", "10.0.0.1");
    let (scanner, _) = scanner(ScanConfig::new("example.com"), resolver);

    let report = scanner.scan(&prefixes(&["www", "www"])).await.unwrap();
    assert_eq!(report.summary.completed, 2);
    assert_eq!(report.summary.resolved, 2);
    assert_eq!(report.discoveries.len(), 2);
}

/// Cancellation stops dispatch, lets in-flight lookups drain, and closes
/// the stream with a truthful summary.
#[tokio::test]
async fn test_cancellation_stops_dispatch() {
    let total = 50;
    let names: Vec<String> = (0..total).map(|i| format!("host{}", i)).collect();

    let mut resolver = FakeResolver::new().with_delay(Duration::from_millis(20));
    for name in &names {
        resolver = resolver.answer(&format!("{}.example.com", name), "10.0.0.9");
    }
    let config = ScanConfig::new("example.com").with_concurrency(1);
    let (scanner, _) = scanner(config, resolver);

    let mut scan = scanner.scan_stream(&names).unwrap();

    // Take one discovery, then pull the plug and drain what's left.
    let first = scan.next().await.expect("expected at least one discovery");
    assert!(first.fqdn.ends_with(".example.com"));
    scan.cancel();
    while scan.next().await.is_some() {}

    assert_eq!(scan.phase(), RunPhase::Complete);
    let summary = scan.finish().await;
    assert!(summary.cancelled);
    assert!(
        summary.completed < total,
        "expected an early stop, got {} of {}",
        summary.completed,
        total
    );
    // Everything dispatched before the cancel still got its outcome
    assert_eq!(
        summary.completed,
        summary.resolved + summary.not_found + summary.timed_out + summary.errors
    );
}

/// The stream closes only after the final outcome; the phase is then
/// terminal.
#[tokio::test]
async fn test_stream_closes_after_all_outcomes() {
    let resolver = FakeResolver::new()
        .answer("www.example.com", "10.0.0.1")
        .with_delay(Duration::from_millis(2));
    let config = ScanConfig::new("example.com").with_concurrency(2);
    let (scanner, _) = scanner(config, resolver);

    let mut scan = scanner.scan_stream(&prefixes(&["www", "a", "b", "c"])).unwrap();
    let mut discoveries = 0;
    while let Some(_discovery) = scan.next().await {
        discoveries += 1;
    }

    assert_eq!(scan.phase(), RunPhase::Complete);
    // Re-querying the terminal phase is idempotent
    assert_eq!(scan.phase(), RunPhase::Complete);

    let summary = scan.finish().await;
    assert_eq!(discoveries, 1);
    assert_eq!(summary.completed, 4);
    assert!(!summary.cancelled);
}
