use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

const FANOUT_SIGFIG: u8 = 3;
// Larger fan-outs are clamped; nothing downstream distinguishes them.
const MAX_FANOUT: u64 = 10_000_000;

/// Sink for dispatch-resolution telemetry.
///
/// Implementations must tolerate concurrent calls from resolver threads.
pub trait DispatchTelemetry: Send + Sync {
    /// A call site was resolved against an interface owner with no bound on
    /// the implementor set.
    fn increment_unbounded_interface_dispatch(&self);

    /// Count an unbounded dispatch and attribute it to the interface `owner`.
    fn record_unbounded_interface_dispatch(&self, owner: &str) {
        let _ = owner;
        self.increment_unbounded_interface_dispatch();
    }

    /// Record the number of implementors resolved for a call site on `owner`.
    fn record_fanout(&self, owner: &str, implementors: usize) {
        let _ = (owner, implementors);
    }
}

/// Telemetry sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl DispatchTelemetry for NoopTelemetry {
    fn increment_unbounded_interface_dispatch(&self) {}
}

/// Thread-safe dispatch metrics registry.
///
/// The unbounded-dispatch counter is a plain atomic; the fan-out histogram and
/// per-owner counts sit behind a single mutex.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    unbounded_interface_dispatch: AtomicU64,
    resolved_call_sites: AtomicU64,
    inner: Mutex<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    fanout: Option<Histogram<u64>>,
    unbounded_by_owner: HashMap<String, u64>,
}

fn new_fanout_histogram() -> Histogram<u64> {
    static HISTOGRAM_BOUNDS_ERROR_LOGGED: OnceLock<()> = OnceLock::new();

    Histogram::<u64>::new_with_bounds(1, MAX_FANOUT, FANOUT_SIGFIG).unwrap_or_else(|err| {
        if HISTOGRAM_BOUNDS_ERROR_LOGGED.set(()).is_ok() {
            tracing::debug!(
                target: "sera.metrics",
                error = %err,
                "failed to construct bounded fan-out histogram; falling back to unbounded histogram"
            );
        }
        Histogram::<u64>::new(FANOUT_SIGFIG).expect("histogram")
    })
}

impl DispatchMetrics {
    /// Returns the process-wide metrics registry.
    pub fn global() -> &'static DispatchMetrics {
        static GLOBAL: OnceLock<DispatchMetrics> = OnceLock::new();
        GLOBAL.get_or_init(DispatchMetrics::default)
    }

    pub fn unbounded_interface_dispatch(&self) -> u64 {
        self.unbounded_interface_dispatch.load(Ordering::Relaxed)
    }

    /// Reset all recorded metrics.
    pub fn reset(&self) {
        self.unbounded_interface_dispatch.store(0, Ordering::Relaxed);
        self.resolved_call_sites.store(0, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        *inner = MetricsInner::default();
    }

    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        let inner = self.inner.lock();
        let fanout = match &inner.fanout {
            Some(hist) if !hist.is_empty() => FanoutSummary {
                p50: hist.value_at_quantile(0.50),
                p95: hist.value_at_quantile(0.95),
                max: hist.max(),
            },
            _ => FanoutSummary::default(),
        };

        DispatchMetricsSnapshot {
            unbounded_interface_dispatch: self.unbounded_interface_dispatch(),
            resolved_call_sites: self.resolved_call_sites.load(Ordering::Relaxed),
            fanout,
            unbounded_by_owner: inner
                .unbounded_by_owner
                .iter()
                .map(|(owner, count)| (owner.clone(), *count))
                .collect(),
        }
    }
}

impl DispatchTelemetry for DispatchMetrics {
    fn increment_unbounded_interface_dispatch(&self) {
        self.unbounded_interface_dispatch
            .fetch_add(1, Ordering::Relaxed);
    }

    fn record_unbounded_interface_dispatch(&self, owner: &str) {
        self.increment_unbounded_interface_dispatch();
        let mut inner = self.inner.lock();
        let count = inner
            .unbounded_by_owner
            .entry(owner.to_owned())
            .or_insert(0);
        *count = count.saturating_add(1);
    }

    fn record_fanout(&self, owner: &str, implementors: usize) {
        static HISTOGRAM_RECORD_ERROR_LOGGED: OnceLock<()> = OnceLock::new();

        self.resolved_call_sites.fetch_add(1, Ordering::Relaxed);
        // Histogram lower bound is 1.
        let value = (implementors as u64).clamp(1, MAX_FANOUT);

        let mut inner = self.inner.lock();
        let hist = inner.fanout.get_or_insert_with(new_fanout_histogram);
        if let Err(err) = hist.record(value) {
            if HISTOGRAM_RECORD_ERROR_LOGGED.set(()).is_ok() {
                tracing::debug!(
                    target: "sera.metrics",
                    owner,
                    value,
                    error = %err,
                    "failed to record fan-out sample"
                );
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMetricsSnapshot {
    pub unbounded_interface_dispatch: u64,
    pub resolved_call_sites: u64,
    pub fanout: FanoutSummary,
    pub unbounded_by_owner: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutSummary {
    pub p50: u64,
    pub p95: u64,
    pub max: u64,
}
