//! CLI commands for KeepAlive
//!
//! Provides command-line access to resolution and device inspection for
//! automation and configuration authoring.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use keepalive_core::{AppConfig, ConfigLoader, DirectorySource, DocumentSource, ResolutionSource};
use keepalive_device_bridge::{AdbClient, AdbPlatform, MANUFACTURER_PROPERTY};
use keepalive_status::CheckerRegistry;

use crate::session::{Presentation, Session};

/// Offline resolution for a manufacturer and firmware version
pub struct ResolveCommand {
    pub manufacturer: String,
    pub firmware: Option<String>,
    pub json: bool,
}

impl ResolveCommand {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let source = config.document_source();
        let session = Session::new(source.as_ref(), CheckerRegistry::global());

        let (resolution, items) = session
            .resolve_items(&self.manufacturer, |_| self.firmware.clone())
            .with_context(|| format!("Cannot load configuration for '{}'", self.manufacturer))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }

        println!("{} ({})", self.manufacturer, describe(&resolution));
        if items.is_empty() {
            println!("  {}", crate::session::NO_OPTIMIZATIONS_MESSAGE);
        }
        for item in &items {
            let marker = if item.is_checkable { "[?]" } else { " > " };
            println!("  {} {:<30} {}", marker, item.id, item.title);
        }
        Ok(())
    }
}

/// Load every document of a source and report malformed ones
pub struct ValidateCommand {
    pub dir: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let source: Box<dyn DocumentSource> = match &self.dir {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => config.document_source(),
        };

        let names = source.document_names();
        if names.is_empty() {
            bail!("No configuration documents found");
        }

        let mut failures = 0;
        for name in &names {
            match ConfigLoader::load_document(name, source.as_ref()) {
                Ok(doc) => println!(
                    "ok    {} ({} default items, {} version rules)",
                    name,
                    doc.default_settings.len(),
                    doc.version_specifics.len()
                ),
                Err(e) => {
                    failures += 1;
                    println!("FAIL  {}", e);
                }
            }
        }

        if failures > 0 {
            bail!("{} of {} documents are malformed", failures, names.len());
        }
        Ok(())
    }
}

/// List ADB devices
pub struct DevicesCommand;

impl DevicesCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let client = AdbClient::locate(config.get_sdk_path().as_deref())?;
        let devices = client.list_devices().await?;

        if devices.is_empty() {
            println!("No devices attached");
        }
        for device in devices {
            println!("{:<24} {:<14} {}", device.serial, device.state.as_str(), device.display_name());
        }
        Ok(())
    }
}

/// Resolve and check the capabilities of a package on a device
pub struct InspectCommand {
    pub serial: Option<String>,
    pub package: Option<String>,
    pub json: bool,
}

impl InspectCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let package = self
            .package
            .clone()
            .or_else(|| config.package_name.clone())
            .context("No package given; pass --package or set package_name in the config file")?;

        let client = AdbClient::locate(config.get_sdk_path().as_deref())?;
        let device = client.select_device(self.serial.as_deref()).await?;
        let serial = Some(device.serial.clone());

        let manufacturer = client.get_prop(serial.as_deref(), MANUFACTURER_PROPERTY).await?;
        info!("Inspecting {} on {} ({})", package, device.display_name(), manufacturer);

        let platform = AdbPlatform::connect(client, serial, &package, config.query_timeout()).await?;

        let source = config.document_source();
        let session = Session::new(source.as_ref(), CheckerRegistry::global());
        let presentation = session.present(&manufacturer, |property| platform.system_property(property), &platform);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&presentation)?);
            return Ok(());
        }

        print_presentation(&presentation);
        if matches!(presentation, Presentation::ConfigUnavailable { .. }) {
            bail!("Configuration unavailable for '{}'", manufacturer);
        }
        Ok(())
    }
}

fn print_presentation(presentation: &Presentation) {
    if let Some(message) = presentation.message() {
        println!("{}", message);
        return;
    }

    for row in presentation.rows() {
        let state = match row.enabled {
            Some(true) => "[on] ",
            Some(false) => "[off]",
            None => "  >  ",
        };
        println!("{} {}", state, row.item.title);
        println!("      {}", row.item.description);
    }
}

fn describe(resolution: &ResolutionSource) -> String {
    match resolution {
        ResolutionSource::NoVersionProperty => "defaults, no version property".to_string(),
        ResolutionSource::VersionUnavailable => "defaults, version unknown".to_string(),
        ResolutionSource::NoRuleMatched { version } => format!("defaults, no rule for {}", version),
        ResolutionSource::Rule { index, version } => format!("rule #{} for {}", index, version),
    }
}
