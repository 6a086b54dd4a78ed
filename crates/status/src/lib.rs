//! Capability Status Checker Registry
//!
//! Answers "is this capability currently enabled?" for every capability
//! that can be checked, using public platform state, the connectivity
//! restriction tiers, or vendor-private app-op and content-provider
//! queries. Checks are best-effort: any failure reads as `false`.

pub mod context;
pub mod diagnostics;
pub mod checker;
pub mod permission;
pub mod connectivity;
pub mod oem;
pub mod registry;

pub use context::{
    AppOpsService, ConnectivityService, ContentResolver, ContentRow, OpMode, PermissionService,
    PlatformQueryContext, QueryError, RestrictBackgroundStatus,
};
pub use diagnostics::{Backend, DiagnosticsSink, MemorySink, QueryFailure, TracingSink};
pub use checker::{CheckFailure, CheckOutcome, StatusChecker};
pub use permission::PermissionChecker;
pub use connectivity::BackgroundDataChecker;
pub use oem::{AppOpsChecker, ContentQueryChecker};
pub use registry::CheckerRegistry;

/// Platform API levels the checkers care about
pub mod sdk {
    /// Android 4.4, first level with the app-ops service
    pub const KITKAT: u32 = 19;
    /// Android 7.0, first level with tiered background-data restriction
    pub const N: u32 = 24;
}

/// Permission names used by the public-API checkers
pub mod permissions {
    pub const REQUEST_IGNORE_BATTERY_OPTIMIZATIONS: &str =
        "android.permission.REQUEST_IGNORE_BATTERY_OPTIMIZATIONS";
    pub const SYSTEM_ALERT_WINDOW: &str = "android.permission.SYSTEM_ALERT_WINDOW";
}
