//! Connectivity-restriction checker
//!
//! Background data is available unless Data Saver applies to the app.
//! Below API level 24 (or when the tiered status is unusable) the legacy
//! background-data setting is consulted instead. That setting is known to
//! always report `true` on API level 24 and later, so on those levels the
//! fallback is an approximation rather than an accurate answer.

use tracing::debug;

use crate::checker::{CheckFailure, StatusChecker};
use crate::context::{PlatformQueryContext, QueryError, RestrictBackgroundStatus};
use crate::diagnostics::Backend;
use crate::sdk;

const RESTRICT_BACKGROUND: &str = "restrict-background";
const LEGACY_BACKGROUND_DATA: &str = "background_data";

/// Checks whether the app may use data in the background
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundDataChecker;

impl StatusChecker for BackgroundDataChecker {
    fn backend(&self) -> Backend {
        Backend::Connectivity
    }

    fn evaluate(&self, ctx: &dyn PlatformQueryContext) -> Result<bool, CheckFailure> {
        let service = ctx.connectivity().ok_or_else(|| {
            CheckFailure::new(RESTRICT_BACKGROUND, QueryError::ServiceUnavailable("connectivity service".into()))
        })?;

        if ctx.sdk_int() >= sdk::N {
            match service.restrict_background_status() {
                Ok(RestrictBackgroundStatus::Enabled) => return Ok(false),
                Ok(RestrictBackgroundStatus::Whitelisted) | Ok(RestrictBackgroundStatus::Disabled) => {
                    return Ok(true)
                }
                Ok(RestrictBackgroundStatus::Unknown(code)) => {
                    debug!("Unrecognized restrict-background status {}, using legacy setting", code);
                }
                Err(QueryError::Unsupported(reason)) => {
                    debug!("Tiered restrict-background unsupported ({}), using legacy setting", reason);
                }
                Err(e) => return Err(CheckFailure::new(RESTRICT_BACKGROUND, e)),
            }
        }

        service
            .background_data_setting()
            .map_err(|e| CheckFailure::new(LEGACY_BACKGROUND_DATA, e))
    }
}
