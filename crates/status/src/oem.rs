//! OEM-private checkers
//!
//! Vendor mechanisms with no public contract: Xiaomi exposes its extra
//! permissions as private app-op codes, vivo exposes them through its
//! permission-manager content provider.

use crate::checker::{CheckFailure, StatusChecker};
use crate::context::{OpMode, PlatformQueryContext, QueryError};
use crate::diagnostics::{Backend, DiagnosticsSink, QueryFailure};
use crate::sdk;

use keepalive_core::CapabilityId;

/// Xiaomi "display pop-up windows while running in the background"
pub const OP_XIAOMI_BACKGROUND_POPUP: i32 = 10021;
/// Xiaomi "show on lock screen"
pub const OP_XIAOMI_SHOW_WHEN_LOCKED: i32 = 10020;

/// vivo background activity start permission
pub const VIVO_URI_BG_START_ACTIVITY: &str =
    "content://com.vivo.permissionmanager.provider.permission/start_bg_activity";
/// vivo lock screen display permission
pub const VIVO_URI_LOCK_SCREEN_ACTION: &str =
    "content://com.vivo.permissionmanager.provider.permission/control_locked_screen_action";

/// vivo permission state: allowed
pub const VIVO_PERMISSION_ALLOWED: i64 = 0;
/// vivo permission state: denied, also returned when the query fails
pub const VIVO_PERMISSION_DENIED: i64 = 1;

const VIVO_SELECTION: &str = "pkgname = ?";
const VIVO_STATE_COLUMN: &str = "currentstate";

/// Checks a vendor app-op code for the calling uid and package
#[derive(Debug, Clone, Copy)]
pub struct AppOpsChecker {
    op: i32,
}

impl AppOpsChecker {
    pub fn new(op: i32) -> Self {
        Self { op }
    }

    pub fn op(&self) -> i32 {
        self.op
    }

    fn target(&self) -> String {
        format!("op {}", self.op)
    }
}

impl StatusChecker for AppOpsChecker {
    fn backend(&self) -> Backend {
        Backend::AppOps
    }

    fn evaluate(&self, ctx: &dyn PlatformQueryContext) -> Result<bool, CheckFailure> {
        if ctx.sdk_int() < sdk::KITKAT {
            return Ok(false);
        }

        let service = ctx.app_ops().ok_or_else(|| {
            CheckFailure::new(self.target(), QueryError::ServiceUnavailable("app ops service".into()))
        })?;

        let mode = service
            .check_op_no_throw(self.op, ctx.uid(), ctx.package_name())
            .map_err(|e| CheckFailure::new(self.target(), e))?;
        Ok(mode == OpMode::Allowed)
    }
}

/// Reads a vendor provider's `currentstate` column for the package
#[derive(Debug, Clone, Copy)]
pub struct ContentQueryChecker {
    uri: &'static str,
}

impl ContentQueryChecker {
    pub fn new(uri: &'static str) -> Self {
        Self { uri }
    }

    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Raw permission state, [`VIVO_PERMISSION_DENIED`] if it cannot be read
    pub fn state(&self, capability: CapabilityId, ctx: &dyn PlatformQueryContext, diagnostics: &dyn DiagnosticsSink) -> i64 {
        match self.query_state(ctx) {
            Ok(state) => state,
            Err(failure) => {
                diagnostics.record(&QueryFailure {
                    capability,
                    backend: Backend::ContentQuery,
                    target: failure.target,
                    error: failure.error,
                });
                VIVO_PERMISSION_DENIED
            }
        }
    }

    fn query_state(&self, ctx: &dyn PlatformQueryContext) -> Result<i64, CheckFailure> {
        let fail = |error: QueryError| CheckFailure::new(self.uri, error);

        let resolver = ctx
            .content_resolver()
            .ok_or_else(|| fail(QueryError::ServiceUnavailable("content resolver".into())))?;

        let row = resolver
            .query_first(self.uri, VIVO_SELECTION, &[ctx.package_name()])
            .map_err(fail)?
            .ok_or_else(|| fail(QueryError::Failed("no row for package".into())))?;

        row.get_int(VIVO_STATE_COLUMN)
            .ok_or_else(|| fail(QueryError::Failed(format!("column '{}' absent", VIVO_STATE_COLUMN))))
    }
}

impl StatusChecker for ContentQueryChecker {
    fn backend(&self) -> Backend {
        Backend::ContentQuery
    }

    fn evaluate(&self, ctx: &dyn PlatformQueryContext) -> Result<bool, CheckFailure> {
        self.query_state(ctx).map(|state| state == VIVO_PERMISSION_ALLOWED)
    }
}
