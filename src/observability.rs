//! Logging setup and in-process counters

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins over the configured filter. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(telemetry: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&telemetry.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if telemetry.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Metrics handle for engine operations
#[derive(Debug, Default)]
pub struct Metrics {
    vouchers_accepted: AtomicU64,
    vouchers_rejected: AtomicU64,
    lookups: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voucher_accepted(&self) {
        self.vouchers_accepted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "vouchers_accepted", "Metric incremented");
    }

    pub fn voucher_rejected(&self) {
        self.vouchers_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "vouchers_rejected", "Metric incremented");
    }

    pub fn lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "lookups", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            vouchers_accepted: self.vouchers_accepted.load(Ordering::Relaxed),
            vouchers_rejected: self.vouchers_rejected.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub vouchers_accepted: u64,
    pub vouchers_rejected: u64,
    pub lookups: u64,
}
