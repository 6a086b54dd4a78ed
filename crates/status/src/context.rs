//! Platform Query Context
//!
//! The handle checkers query the platform through. Each service is
//! optional; a missing service is reported as unavailable.

use std::collections::BTreeMap;
use std::time::Duration;

/// Platform query errors
///
/// Never escapes the registry; every error becomes a negative result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Operation unsupported: {0}")]
    Unsupported(String),
    #[error("Query timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Query failed: {0}")]
    Failed(String),
}

/// Permission / special-access state
pub trait PermissionService {
    /// Whether the calling package holds `permission`
    fn is_granted(&self, permission: &str) -> Result<bool, QueryError>;
}

/// Restrict-background (Data Saver) state for the calling package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictBackgroundStatus {
    /// Data Saver is off
    Disabled,
    /// Data Saver is on but the package is exempt
    Whitelisted,
    /// Data Saver is on and applies to the package
    Enabled,
    /// A code this build does not know
    Unknown(i32),
}

impl RestrictBackgroundStatus {
    /// Map a platform status code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => RestrictBackgroundStatus::Disabled,
            2 => RestrictBackgroundStatus::Whitelisted,
            3 => RestrictBackgroundStatus::Enabled,
            other => RestrictBackgroundStatus::Unknown(other),
        }
    }
}

/// Connectivity service
pub trait ConnectivityService {
    /// Tiered restrict-background status (API level 24+)
    fn restrict_background_status(&self) -> Result<RestrictBackgroundStatus, QueryError>;

    /// Legacy background-data setting
    fn background_data_setting(&self) -> Result<bool, QueryError>;
}

/// App-op mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Allowed,
    Ignored,
    Errored,
    Default,
    Foreground,
    Other(i32),
}

impl OpMode {
    /// Map a platform mode code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => OpMode::Allowed,
            1 => OpMode::Ignored,
            2 => OpMode::Errored,
            3 => OpMode::Default,
            4 => OpMode::Foreground,
            other => OpMode::Other(other),
        }
    }
}

/// App-ops service, including vendor-private op codes
pub trait AppOpsService {
    /// Check an op for a uid/package without raising on denial
    ///
    /// Returns `QueryError::Unsupported` when the op or the call itself
    /// is not available on this firmware.
    fn check_op_no_throw(&self, op: i32, uid: u32, package: &str) -> Result<OpMode, QueryError>;
}

/// One row of a content-provider query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRow {
    columns: BTreeMap<String, String>,
}

impl ContentRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.columns.insert(column.to_string(), value.to_string());
        self
    }

    /// Raw column value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Integer column value
    pub fn get_int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(|v| v.trim().parse().ok())
    }
}

/// Content provider access
pub trait ContentResolver {
    /// Query `uri` and return the first row, `None` if there are no rows
    fn query_first(&self, uri: &str, selection: &str, selection_args: &[&str]) -> Result<Option<ContentRow>, QueryError>;
}

/// Everything a checker can ask the platform
///
/// The registry passes this through untouched; only the individual
/// checkers interpret it.
pub trait PlatformQueryContext {
    /// Package name of the app being checked
    fn package_name(&self) -> &str;

    /// Process uid of the app being checked
    fn uid(&self) -> u32;

    /// Platform API level
    fn sdk_int(&self) -> u32;

    fn permissions(&self) -> Option<&dyn PermissionService> {
        None
    }

    fn connectivity(&self) -> Option<&dyn ConnectivityService> {
        None
    }

    fn app_ops(&self) -> Option<&dyn AppOpsService> {
        None
    }

    fn content_resolver(&self) -> Option<&dyn ContentResolver> {
        None
    }
}
