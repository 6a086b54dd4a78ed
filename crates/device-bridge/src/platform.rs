//! ADB Platform Context
//!
//! A [`PlatformQueryContext`] for one package on one device. Every
//! service call runs a shell command and blocks the calling thread until
//! it returns or the per-query timeout elapses; a hung device query
//! therefore costs at most one timeout.
//!
//! On a multi-threaded runtime the query runs on the runtime that created
//! the platform. On a current-thread runtime that runtime cannot make
//! progress while the caller blocks, so the query gets a short-lived
//! runtime on a scoped thread instead.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tracing::debug;

use keepalive_status::{
    permissions, AppOpsService, ConnectivityService, ContentResolver, ContentRow, OpMode, PermissionService,
    PlatformQueryContext, QueryError, RestrictBackgroundStatus,
};

use crate::adb::{AdbClient, AdbError};
use crate::shell_output;

/// Platform queries answered by a device over ADB
#[derive(Debug, Clone)]
pub struct AdbPlatform {
    client: AdbClient,
    serial: Option<String>,
    package: String,
    uid: u32,
    sdk: u32,
    timeout: Duration,
    runtime: Handle,
}

impl AdbPlatform {
    /// Connect to `package` on a device, resolving its uid and API level
    ///
    /// Must be called from within a tokio runtime.
    pub async fn connect(
        client: AdbClient,
        serial: Option<String>,
        package: &str,
        timeout: Duration,
    ) -> Result<Self, AdbError> {
        let sdk = client.get_sdk_version(serial.as_deref()).await?;

        let listing = client
            .shell(serial.as_deref(), &format!("cmd package list packages -U {}", package))
            .await?;
        let uid = shell_output::package_uid(&listing, package)
            .ok_or_else(|| AdbError::PackageNotFound(package.to_string()))?;

        debug!("Connected to {} (uid {}, sdk {})", package, uid, sdk);

        Ok(Self {
            client,
            serial,
            package: package.to_string(),
            uid,
            sdk,
            timeout,
            runtime: Handle::current(),
        })
    }

    /// Device serial, `None` for the default device
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Read a system property, `None` when unset or unreadable
    pub fn system_property(&self, name: &str) -> Option<String> {
        match self.block_on(self.client.get_prop(self.serial(), name)) {
            Ok(value) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                debug!("getprop {} failed: {}", name, e);
                None
            }
        }
    }

    fn shell(&self, command: &str) -> Result<String, QueryError> {
        self.block_on(self.client.shell(self.serial(), command))
    }

    fn block_on<T, F>(&self, future: F) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, AdbError>> + Send,
        T: Send,
    {
        let timeout = self.timeout;
        let bounded = async move { tokio::time::timeout(timeout, future).await };

        let result = match self.runtime.runtime_flavor() {
            RuntimeFlavor::MultiThread => tokio::task::block_in_place(|| self.runtime.block_on(bounded)),
            _ => std::thread::scope(|scope| {
                scope
                    .spawn(|| -> Result<_, QueryError> {
                        let runtime = Builder::new_current_thread()
                            .enable_all()
                            .build()
                            .map_err(|e| QueryError::Failed(format!("cannot start query runtime: {}", e)))?;
                        Ok(runtime.block_on(bounded))
                    })
                    .join()
                    .unwrap_or_else(|_| Err(QueryError::Failed("device query thread panicked".into())))
            })?,
        };

        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(AdbError::NotFound)) => Err(QueryError::ServiceUnavailable("adb".into())),
            Ok(Err(e)) => Err(QueryError::Failed(e.to_string())),
            Err(_) => Err(QueryError::TimedOut(timeout)),
        }
    }

    fn app_op(&self, op: &str) -> Result<OpMode, QueryError> {
        let output = self.shell(&format!("appops get {} {}", self.package, op))?;
        shell_output::app_op_mode(&output)
    }

    fn dumpsys_granted(&self, permission: &str) -> Result<bool, QueryError> {
        let output = self.shell(&format!("dumpsys package {}", self.package))?;
        Ok(shell_output::permission_granted(&output, permission))
    }
}

impl PermissionService for AdbPlatform {
    fn is_granted(&self, permission: &str) -> Result<bool, QueryError> {
        match permission {
            permissions::REQUEST_IGNORE_BATTERY_OPTIMIZATIONS => {
                let output = self.shell("dumpsys deviceidle whitelist")?;
                Ok(shell_output::in_deviceidle_whitelist(&output, &self.package))
            }
            permissions::SYSTEM_ALERT_WINDOW => match self.app_op("SYSTEM_ALERT_WINDOW")? {
                OpMode::Allowed => Ok(true),
                OpMode::Default => self.dumpsys_granted(permission),
                _ => Ok(false),
            },
            _ => self.dumpsys_granted(permission),
        }
    }
}

impl ConnectivityService for AdbPlatform {
    fn restrict_background_status(&self) -> Result<RestrictBackgroundStatus, QueryError> {
        let status = self.shell("cmd netpolicy get restrict-background")?;
        let whitelist = self.shell("cmd netpolicy list restrict-background-whitelist")?;
        shell_output::restrict_background_status(&status, &whitelist, self.uid)
    }

    fn background_data_setting(&self) -> Result<bool, QueryError> {
        let output = self.shell("settings get secure background_data")?;
        Ok(shell_output::background_data_setting(&output))
    }
}

impl AppOpsService for AdbPlatform {
    fn check_op_no_throw(&self, op: i32, _uid: u32, package: &str) -> Result<OpMode, QueryError> {
        let output = self.shell(&format!("appops get {} {}", package, op))?;
        shell_output::app_op_mode(&output)
    }
}

impl ContentResolver for AdbPlatform {
    fn query_first(&self, uri: &str, selection: &str, selection_args: &[&str]) -> Result<Option<ContentRow>, QueryError> {
        let clause = shell_output::bind_selection(selection, selection_args);
        let output = self.shell(&format!("content query --uri {} --where \"{}\"", uri, clause))?;
        shell_output::first_content_row(&output)
    }
}

impl PlatformQueryContext for AdbPlatform {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn uid(&self) -> u32 {
        self.uid
    }

    fn sdk_int(&self) -> u32 {
        self.sdk
    }

    fn permissions(&self) -> Option<&dyn PermissionService> {
        Some(self)
    }

    fn connectivity(&self) -> Option<&dyn ConnectivityService> {
        Some(self)
    }

    fn app_ops(&self) -> Option<&dyn AppOpsService> {
        Some(self)
    }

    fn content_resolver(&self) -> Option<&dyn ContentResolver> {
        Some(self)
    }
}
