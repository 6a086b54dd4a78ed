//! Public-API checker: standard permission and special-access state.

use crate::checker::{CheckFailure, StatusChecker};
use crate::context::{PlatformQueryContext, QueryError};
use crate::diagnostics::Backend;

/// Checks that a platform permission is granted
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    permission: &'static str,
}

impl PermissionChecker {
    pub fn new(permission: &'static str) -> Self {
        Self { permission }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }
}

impl StatusChecker for PermissionChecker {
    fn backend(&self) -> Backend {
        Backend::PublicApi
    }

    fn evaluate(&self, ctx: &dyn PlatformQueryContext) -> Result<bool, CheckFailure> {
        let service = ctx.permissions().ok_or_else(|| {
            CheckFailure::new(self.permission, QueryError::ServiceUnavailable("permission service".into()))
        })?;

        let granted = service
            .is_granted(self.permission)
            .map_err(|e| CheckFailure::new(self.permission, e))?;
        tracing::debug!("{} granted: {}", self.permission, granted);
        Ok(granted)
    }
}
