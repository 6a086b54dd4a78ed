//! Checker Registry
//!
//! Static table from capability id to checker. Built once, read-only
//! afterwards; `check` never fails and reports anything it cannot
//! determine as `false`.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use keepalive_core::CapabilityId;

use crate::checker::{CheckOutcome, StatusChecker};
use crate::connectivity::BackgroundDataChecker;
use crate::context::PlatformQueryContext;
use crate::diagnostics::{DiagnosticsSink, QueryFailure, TracingSink};
use crate::oem::{
    AppOpsChecker, ContentQueryChecker, OP_XIAOMI_BACKGROUND_POPUP, OP_XIAOMI_SHOW_WHEN_LOCKED,
    VIVO_URI_BG_START_ACTIVITY, VIVO_URI_LOCK_SCREEN_ACTION,
};
use crate::permission::PermissionChecker;
use crate::permissions;

static GLOBAL: Lazy<CheckerRegistry> = Lazy::new(|| CheckerRegistry::standard(Arc::new(TracingSink)));

/// Capability status checker registry
pub struct CheckerRegistry {
    checkers: HashMap<CapabilityId, Box<dyn StatusChecker>>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl CheckerRegistry {
    /// Create an empty registry
    pub fn new(diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            checkers: HashMap::new(),
            diagnostics,
        }
    }

    /// Create a registry with every built-in checker
    pub fn standard(diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self::new(diagnostics)
            .with_checker(
                CapabilityId::BatteryOptimization,
                PermissionChecker::new(permissions::REQUEST_IGNORE_BATTERY_OPTIMIZATIONS),
            )
            .with_checker(
                CapabilityId::AlertWindow,
                PermissionChecker::new(permissions::SYSTEM_ALERT_WINDOW),
            )
            .with_checker(CapabilityId::BackgroundData, BackgroundDataChecker)
            .with_checker(
                CapabilityId::XiaomiBackgroundPopup,
                AppOpsChecker::new(OP_XIAOMI_BACKGROUND_POPUP),
            )
            .with_checker(
                CapabilityId::XiaomiLockPopup,
                AppOpsChecker::new(OP_XIAOMI_SHOW_WHEN_LOCKED),
            )
            .with_checker(
                CapabilityId::VivoBackgroundPopup,
                ContentQueryChecker::new(VIVO_URI_BG_START_ACTIVITY),
            )
            .with_checker(
                CapabilityId::VivoLockScreen,
                ContentQueryChecker::new(VIVO_URI_LOCK_SCREEN_ACTION),
            )
    }

    /// Process-wide registry logging through `tracing`
    pub fn global() -> &'static CheckerRegistry {
        &GLOBAL
    }

    /// Register a checker, replacing any existing one for `id`
    pub fn with_checker(mut self, id: CapabilityId, checker: impl StatusChecker + 'static) -> Self {
        self.checkers.insert(id, Box::new(checker));
        self
    }

    /// Whether a checker exists for `id`
    pub fn is_registered(&self, id: CapabilityId) -> bool {
        self.checkers.contains_key(&id)
    }

    /// Evaluate `id`, keeping the reason for a negative answer
    pub fn evaluate(&self, id: CapabilityId, ctx: &dyn PlatformQueryContext) -> CheckOutcome {
        let Some(checker) = self.checkers.get(&id) else {
            debug!("No checker registered for {}", id);
            return CheckOutcome::Unregistered;
        };

        match checker.evaluate(ctx) {
            Ok(enabled) => {
                debug!("{} enabled: {}", id, enabled);
                CheckOutcome::from(enabled)
            }
            Err(failure) => {
                self.diagnostics.record(&QueryFailure {
                    capability: id,
                    backend: checker.backend(),
                    target: failure.target.clone(),
                    error: failure.error.clone(),
                });
                CheckOutcome::Failed(failure)
            }
        }
    }

    /// Whether capability `id` is currently enabled
    ///
    /// `false` covers "disabled", "could not be determined" and "no
    /// checker"; it is not proof that the user turned anything off.
    pub fn check(&self, id: CapabilityId, ctx: &dyn PlatformQueryContext) -> bool {
        self.evaluate(id, ctx).is_enabled()
    }
}
