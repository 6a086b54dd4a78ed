//! Manufacturer Configuration
//!
//! One document per manufacturer: a default capability list plus
//! version rules that override it for specific firmware versions.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::CapabilityItem;
use crate::error::{ConfigError, Result};

/// Version pattern compiled to match the whole firmware version string
///
/// Compiled once when the document is parsed; a pattern that does not
/// compile makes the document malformed.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    source: String,
    regex: Regex,
}

impl VersionPattern {
    pub fn new(source: &str) -> std::result::Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Pattern as written in the document
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, version: &str) -> bool {
        self.regex.is_match(version)
    }
}

impl PartialEq for VersionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for VersionPattern {}

impl fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for VersionPattern {
    type Err = regex::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for VersionPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for VersionPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(|e| de::Error::custom(format!("invalid version pattern '{}': {}", source, e)))
    }
}

/// Firmware version override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRule {
    /// Pattern that must match the whole firmware version string
    #[serde(rename = "version_matches_regex")]
    pub pattern: VersionPattern,

    #[serde(default)]
    pub comment: String,

    /// Items presented when the rule matches
    pub settings: Vec<CapabilityItem>,
}

impl VersionRule {
    /// Check whether the entire version string matches this rule
    pub fn matches(&self, version: &str) -> bool {
        self.pattern.is_match(version)
    }
}

/// One manufacturer's full configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerConfig {
    #[serde(default)]
    pub comment: String,

    /// System property holding the firmware version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version_property: Option<String>,

    /// Items used when no version rule applies
    pub default_settings: Vec<CapabilityItem>,

    /// Version rules, evaluated in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_specifics: Vec<VersionRule>,
}

impl ManufacturerConfig {
    /// Parse and validate a configuration document
    pub fn from_slice(document: &str, bytes: &[u8]) -> Result<Self> {
        let config: ManufacturerConfig = serde_json::from_slice(bytes)
            .map_err(|e| ConfigError::malformed(document, e.to_string()))?;
        config.validate(document)?;
        Ok(config)
    }

    /// Parse and validate a configuration document from text
    pub fn from_json(document: &str, json: &str) -> Result<Self> {
        Self::from_slice(document, json.as_bytes())
    }

    /// Serialize back to a pretty-printed document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The configured version property, if any and non-empty
    pub fn version_property(&self) -> Option<&str> {
        self.os_version_property.as_deref().filter(|p| !p.is_empty())
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self, document: &str) -> Result<()> {
        let rule_items = self.version_specifics.iter().flat_map(|rule| rule.settings.iter());
        for item in self.default_settings.iter().chain(rule_items) {
            if item.navigation.is_empty() {
                return Err(ConfigError::malformed(
                    document,
                    format!("item '{}' has an empty intent", item.id),
                ));
            }
        }

        Ok(())
    }
}
