//! KeepAlive Device Bridge
//!
//! Answers platform queries for a device connected over ADB: firmware
//! properties for version resolution and the services status checkers
//! need, each backed by a shell command on the device.

pub mod adb;
pub mod device;
pub mod shell_output;
pub mod platform;

pub use adb::{AdbClient, AdbError};
pub use device::{Device, DeviceState, DeviceType};
pub use platform::AdbPlatform;

/// Property holding the device manufacturer
pub const MANUFACTURER_PROPERTY: &str = "ro.product.manufacturer";

/// Property holding the platform API level
pub const SDK_PROPERTY: &str = "ro.build.version.sdk";
