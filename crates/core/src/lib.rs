//! KeepAlive Core - capability catalog and configuration resolution
//!
//! This crate owns the data model describing manufacturer keep-alive
//! settings, loads per-manufacturer configuration documents and resolves
//! them against the firmware version of the current device.

pub mod catalog;
pub mod navigation;
pub mod manufacturer;
pub mod loader;
pub mod resolver;
pub mod config;
pub mod error;

pub use catalog::{CapabilityId, CapabilityItem};
pub use navigation::{ComponentRef, NavigationDescriptor};
pub use manufacturer::{ManufacturerConfig, VersionPattern, VersionRule};
pub use loader::{BundledSource, ConfigLoader, DirectorySource, DocumentSource};
pub use resolver::{resolve, resolve_with_source, ResolutionSource};
pub use config::AppConfig;
pub use error::{ConfigError, Result};

/// KeepAlive version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "KeepAlive";
