//! ADB (Android Debug Bridge) Client
//!
//! Communicates with devices via ADB.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::device::Device;
use crate::SDK_PROPERTY;

/// ADB errors
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("ADB not found")]
    NotFound,
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
    #[error("Package not installed on device: {0}")]
    PackageNotFound(String),
    #[error("ADB command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// ADB Client
#[derive(Debug, Clone)]
pub struct AdbClient {
    adb: PathBuf,
}

impl AdbClient {
    /// Create a client for the adb inside an SDK's platform-tools
    pub fn new(sdk_path: &Path) -> Self {
        let platform_tools = sdk_path.join("platform-tools");
        let adb = if cfg!(windows) {
            platform_tools.join("adb.exe")
        } else {
            platform_tools.join("adb")
        };
        Self { adb }
    }

    /// Create a client for a specific adb executable
    pub fn from_executable(adb: PathBuf) -> Self {
        Self { adb }
    }

    /// Locate adb in the SDK if given, otherwise on PATH
    pub fn locate(sdk_path: Option<&Path>) -> Result<Self, AdbError> {
        if let Some(sdk) = sdk_path {
            let client = Self::new(sdk);
            if client.is_available() {
                return Ok(client);
            }
            debug!("No adb under {:?}, searching PATH", sdk);
        }

        which::which("adb")
            .map(Self::from_executable)
            .map_err(|_| AdbError::NotFound)
    }

    /// Check if ADB is available
    pub fn is_available(&self) -> bool {
        self.adb.exists()
    }

    /// Run an ADB command
    async fn run(&self, args: &[&str]) -> Result<String, AdbError> {
        if !self.adb.exists() {
            return Err(AdbError::NotFound);
        }

        debug!("adb {:?}", args);

        let output = Command::new(&self.adb)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdbError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run an ADB command for a specific device
    async fn run_for_device(&self, serial: Option<&str>, args: &[&str]) -> Result<String, AdbError> {
        match serial {
            Some(serial) => {
                let mut full_args = vec!["-s", serial];
                full_args.extend(args);
                self.run(&full_args).await
            }
            None => self.run(args).await,
        }
    }

    /// List connected devices
    pub async fn list_devices(&self) -> Result<Vec<Device>, AdbError> {
        let output = self.run(&["devices", "-l"]).await?;
        Ok(output
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(Device::parse_line)
            .collect())
    }

    /// Pick a device: the given serial, or the only usable device
    pub async fn select_device(&self, serial: Option<&str>) -> Result<Device, AdbError> {
        let devices = self.list_devices().await?;

        if let Some(serial) = serial {
            return devices
                .into_iter()
                .find(|d| d.serial == serial && d.is_usable())
                .ok_or_else(|| AdbError::DeviceNotFound(serial.to_string()));
        }

        let mut usable = devices.into_iter().filter(Device::is_usable);
        match (usable.next(), usable.next()) {
            (Some(device), None) => Ok(device),
            (None, _) => Err(AdbError::DeviceNotFound("no online device".into())),
            (Some(_), Some(_)) => Err(AdbError::DeviceNotFound("more than one device, pass a serial".into())),
        }
    }

    /// Run a shell command on device
    pub async fn shell(&self, serial: Option<&str>, command: &str) -> Result<String, AdbError> {
        self.run_for_device(serial, &["shell", command]).await
    }

    /// Get device property, empty when unset
    pub async fn get_prop(&self, serial: Option<&str>, prop: &str) -> Result<String, AdbError> {
        let output = self.shell(serial, &format!("getprop {}", prop)).await?;
        Ok(output.trim().to_string())
    }

    /// Get SDK version
    pub async fn get_sdk_version(&self, serial: Option<&str>) -> Result<u32, AdbError> {
        let version = self.get_prop(serial, SDK_PROPERTY).await?;
        version.parse().map_err(|_| AdbError::CommandFailed("Invalid SDK version".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adb_path_in_sdk() {
        let client = AdbClient::new(Path::new("/opt/android-sdk"));
        assert!(client.adb.starts_with("/opt/android-sdk/platform-tools"));
        assert!(!client.is_available());
    }

    #[tokio::test]
    async fn test_missing_adb() {
        let client = AdbClient::from_executable(PathBuf::from("/nonexistent/adb"));
        assert!(matches!(client.list_devices().await, Err(AdbError::NotFound)));
    }
}
