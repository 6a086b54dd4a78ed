//! Presentation Session
//!
//! Wires the loader, the resolver and the checker registry together the
//! way a settings screen consumes them: one call yields either rows to
//! render or the single message to show instead.

use serde::Serialize;
use tracing::{error, info, warn};

use keepalive_core::{resolve_with_source, CapabilityItem, ConfigError, ConfigLoader, DocumentSource, ResolutionSource};
use keepalive_status::{CheckerRegistry, PlatformQueryContext};

/// Shown when the resolved list is legitimately empty
pub const NO_OPTIMIZATIONS_MESSAGE: &str = "No applicable optimizations were found for this device";

/// One rendered capability row
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    #[serde(flatten)]
    pub item: CapabilityItem,

    /// Live state for checkable rows, `None` otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// What the settings screen should show
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    Rows { rows: Vec<Row> },
    NoApplicableOptimizations { message: String },
    ConfigUnavailable { message: String },
}

impl Presentation {
    /// Message to show instead of rows, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Presentation::Rows { .. } => None,
            Presentation::NoApplicableOptimizations { message } | Presentation::ConfigUnavailable { message } => {
                Some(message)
            }
        }
    }

    /// Rows to render, empty when a message is shown instead
    pub fn rows(&self) -> &[Row] {
        match self {
            Presentation::Rows { rows } => rows,
            _ => &[],
        }
    }
}

/// Loader + resolver + registry for one document source
pub struct Session<'a> {
    source: &'a dyn DocumentSource,
    registry: &'a CheckerRegistry,
}

impl<'a> Session<'a> {
    pub fn new(source: &'a dyn DocumentSource, registry: &'a CheckerRegistry) -> Self {
        Self { source, registry }
    }

    /// Load and resolve the capability items for a manufacturer
    pub fn resolve_items<F>(
        &self,
        manufacturer: &str,
        version_lookup: F,
    ) -> Result<(ResolutionSource, Vec<CapabilityItem>), ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let config = ConfigLoader::load(manufacturer, self.source)?;
        Ok(resolve_with_source(manufacturer, &config, version_lookup))
    }

    /// Resolve the items and check every checkable one
    pub fn present<F>(&self, manufacturer: &str, version_lookup: F, ctx: &dyn PlatformQueryContext) -> Presentation
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let items = match self.resolve_items(manufacturer, version_lookup) {
            Ok((source, items)) => {
                info!("Resolved {} items for {} ({:?})", items.len(), manufacturer, source);
                items
            }
            Err(e) => {
                if e.is_missing_personalization() {
                    warn!("Configuration unavailable: {}", e);
                } else {
                    error!("Cannot read configuration: {}", e);
                }
                return Presentation::ConfigUnavailable {
                    message: e.user_message(),
                };
            }
        };

        if items.is_empty() {
            return Presentation::NoApplicableOptimizations {
                message: NO_OPTIMIZATIONS_MESSAGE.to_string(),
            };
        }

        let rows = items
            .into_iter()
            .map(|item| {
                let enabled = item.is_checkable.then(|| self.registry.check(item.id, ctx));
                Row { item, enabled }
            })
            .collect();

        Presentation::Rows { rows }
    }
}
