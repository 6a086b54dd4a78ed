//! KeepAlive - manufacturer keep-alive settings resolver
//!
//! Finds the background keep-alive settings (battery optimization,
//! autostart, background popup, lock-screen display, background data)
//! that apply to a device and reports whether each one is enabled.
//!
//! ## Architecture
//!
//! KeepAlive is organized into specialized crates:
//!
//! - `keepalive-core`: capability catalog, configuration loading and resolution
//! - `keepalive-status`: capability status checker registry
//! - `keepalive-device-bridge`: platform queries against a device over ADB

#![warn(clippy::all)]

pub mod commands;
pub mod session;

// Re-export main components for library usage
pub use keepalive_core;
pub use keepalive_device_bridge;
pub use keepalive_status;

pub use session::{Presentation, Row, Session};

/// Prelude module for convenient imports
pub mod prelude {
    pub use keepalive_core::{
        resolve, AppConfig, BundledSource, CapabilityId, CapabilityItem, ConfigLoader, DirectorySource,
        DocumentSource, ManufacturerConfig,
    };
    pub use keepalive_status::{CheckerRegistry, PlatformQueryContext};
    pub use keepalive_device_bridge::{AdbClient, AdbPlatform};
    pub use crate::session::{Presentation, Session};
}
