//! Checker Strategy
//!
//! A checker answers one question about one backend. New backends are
//! new implementations of [`StatusChecker`].

use crate::context::{PlatformQueryContext, QueryError};
use crate::diagnostics::Backend;

/// A failed query, before it is attributed to a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// What was queried
    pub target: String,
    pub error: QueryError,
}

impl CheckFailure {
    pub fn new(target: impl Into<String>, error: QueryError) -> Self {
        Self {
            target: target.into(),
            error,
        }
    }
}

/// Outcome of evaluating a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Enabled,
    Disabled,
    /// The query failed; reported as not enabled
    Failed(CheckFailure),
    /// No checker is registered for the capability
    Unregistered,
}

impl CheckOutcome {
    /// Collapse to the boolean the registry exposes
    pub fn is_enabled(&self) -> bool {
        matches!(self, CheckOutcome::Enabled)
    }
}

impl From<bool> for CheckOutcome {
    fn from(enabled: bool) -> Self {
        if enabled {
            CheckOutcome::Enabled
        } else {
            CheckOutcome::Disabled
        }
    }
}

/// Status checker strategy
pub trait StatusChecker: Send + Sync {
    /// Backend this checker queries
    fn backend(&self) -> Backend;

    /// Evaluate the capability against the platform
    fn evaluate(&self, ctx: &dyn PlatformQueryContext) -> Result<bool, CheckFailure>;
}
