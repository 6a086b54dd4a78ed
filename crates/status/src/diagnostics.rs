//! Diagnostics Sink
//!
//! Where checker failures are reported. Failures never reach the caller
//! of `check`, so this is the only trace they leave.

use parking_lot::Mutex;
use tracing::warn;

use keepalive_core::CapabilityId;

use crate::context::QueryError;

/// Checker backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Standard platform permission / special-access state
    PublicApi,
    /// Tiered restrict-background state with legacy fallback
    Connectivity,
    /// Vendor app-op code
    AppOps,
    /// Vendor content provider
    ContentQuery,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::PublicApi => "public-api",
            Backend::Connectivity => "connectivity",
            Backend::AppOps => "app-ops",
            Backend::ContentQuery => "content-query",
        }
    }
}

/// A failed status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub capability: CapabilityId,
    pub backend: Backend,
    /// What was queried: a permission, an op code, a URI
    pub target: String,
    pub error: QueryError,
}

/// Receiver of query failures
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, failure: &QueryFailure);
}

/// Sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, failure: &QueryFailure) {
        warn!(
            capability = %failure.capability,
            backend = failure.backend.as_str(),
            target = %failure.target,
            "Status query failed: {}",
            failure.error
        );
    }
}

/// Sink that keeps failures in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    failures: Mutex<Vec<QueryFailure>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded failures
    pub fn failures(&self) -> Vec<QueryFailure> {
        self.failures.lock().clone()
    }

    /// Remove and return recorded failures
    pub fn drain(&self) -> Vec<QueryFailure> {
        std::mem::take(&mut *self.failures.lock())
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, failure: &QueryFailure) {
        self.failures.lock().push(failure.clone());
    }
}
