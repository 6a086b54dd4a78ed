//! Configuration Resolution Engine
//!
//! Picks the capability list for a device: the first version rule whose
//! pattern fully matches the firmware version, otherwise the defaults.
//! Every failure to learn the version degrades to the defaults.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{CapabilityId, CapabilityItem};
use crate::manufacturer::ManufacturerConfig;

/// Which list a resolution came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// No version property is configured
    NoVersionProperty,
    /// The version property could not be read
    VersionUnavailable,
    /// A version was read but no rule matched it
    NoRuleMatched { version: String },
    /// The rule at `index` matched
    Rule { index: usize, version: String },
}

impl ResolutionSource {
    /// Whether the default settings were used
    pub fn is_default(&self) -> bool {
        !matches!(self, ResolutionSource::Rule { .. })
    }
}

/// Resolve the ordered, deduplicated capability items for a device
pub fn resolve<F>(manufacturer_id: &str, config: &ManufacturerConfig, version_lookup: F) -> Vec<CapabilityItem>
where
    F: FnOnce(&str) -> Option<String>,
{
    resolve_with_source(manufacturer_id, config, version_lookup).1
}

/// Resolve and also report which list was selected
pub fn resolve_with_source<F>(
    manufacturer_id: &str,
    config: &ManufacturerConfig,
    version_lookup: F,
) -> (ResolutionSource, Vec<CapabilityItem>)
where
    F: FnOnce(&str) -> Option<String>,
{
    let Some(property) = config.version_property() else {
        return (ResolutionSource::NoVersionProperty, dedup_by_id(&config.default_settings));
    };

    let version = version_lookup(property).filter(|v| !v.is_empty());
    debug!("Finding settings for {}, {} = {:?}", manufacturer_id, property, version);

    let Some(version) = version else {
        return (ResolutionSource::VersionUnavailable, dedup_by_id(&config.default_settings));
    };

    match config
        .version_specifics
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(&version))
    {
        Some((index, rule)) => {
            debug!("Version {} matched rule {} ({})", version, index, rule.comment);
            (ResolutionSource::Rule { index, version }, dedup_by_id(&rule.settings))
        }
        None => (ResolutionSource::NoRuleMatched { version }, dedup_by_id(&config.default_settings)),
    }
}

/// Keep the first item for each id, preserving order
fn dedup_by_id(items: &[CapabilityItem]) -> Vec<CapabilityItem> {
    let mut seen: HashSet<CapabilityId> = HashSet::new();
    items.iter().filter(|item| seen.insert(item.id)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manufacturer::VersionRule;
    use crate::navigation::NavigationDescriptor;

    fn item(id: CapabilityId, title: &str) -> CapabilityItem {
        CapabilityItem::new(id, title, "", NavigationDescriptor::action("android.settings.SETTINGS"))
    }

    fn rule(pattern: &str, settings: Vec<CapabilityItem>) -> VersionRule {
        VersionRule {
            pattern: pattern.parse().unwrap(),
            comment: pattern.to_string(),
            settings,
        }
    }

    fn config(property: Option<&str>, rules: Vec<VersionRule>) -> ManufacturerConfig {
        ManufacturerConfig {
            comment: String::new(),
            os_version_property: property.map(str::to_string),
            default_settings: vec![
                item(CapabilityId::BatteryOptimization, "A"),
                item(CapabilityId::BackgroundData, "B"),
                item(CapabilityId::BatteryOptimization, "C"),
            ],
            version_specifics: rules,
        }
    }

    fn titles(items: &[CapabilityItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_no_property_returns_deduplicated_defaults() {
        let cfg = config(None, vec![rule(".*", vec![item(CapabilityId::AlertWindow, "R")])]);
        let items = resolve("acme", &cfg, |_| panic!("lookup must not be called"));
        assert_eq!(titles(&items), vec!["A", "B"]);

        let cfg = config(Some(""), Vec::new());
        let (source, _) = resolve_with_source("acme", &cfg, |_| panic!("lookup must not be called"));
        assert_eq!(source, ResolutionSource::NoVersionProperty);
    }

    #[test]
    fn test_missing_version_uses_defaults() {
        let cfg = config(Some("ro.acme.version"), vec![rule(".*", vec![item(CapabilityId::AlertWindow, "R")])]);

        let (source, items) = resolve_with_source("acme", &cfg, |_| None);
        assert_eq!(source, ResolutionSource::VersionUnavailable);
        assert_eq!(titles(&items), vec!["A", "B"]);

        let items = resolve("acme", &cfg, |_| Some(String::new()));
        assert_eq!(titles(&items), vec!["A", "B"]);
    }

    #[test]
    fn test_lookup_receives_property_name() {
        let cfg = config(Some("ro.acme.version"), Vec::new());
        resolve("acme", &cfg, |property| {
            assert_eq!(property, "ro.acme.version");
            Some("1.0".to_string())
        });
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let cfg = config(
            Some("ro.acme.version"),
            vec![
                rule(r"12\..*", vec![item(CapabilityId::AlertWindow, "R1")]),
                rule(r"12\.0", vec![item(CapabilityId::BackgroundActivity, "R2")]),
            ],
        );

        let (source, items) = resolve_with_source("acme", &cfg, |_| Some("12.0".to_string()));
        assert_eq!(titles(&items), vec!["R1"]);
        assert_eq!(source, ResolutionSource::Rule { index: 0, version: "12.0".to_string() });
    }

    #[test]
    fn test_substring_match_is_not_enough() {
        let cfg = config(
            Some("ro.acme.version"),
            vec![rule(r"^12\.0$", vec![item(CapabilityId::AlertWindow, "R")])],
        );

        let (source, items) = resolve_with_source("acme", &cfg, |_| Some("12.0.1".to_string()));
        assert!(source.is_default());
        assert_eq!(titles(&items), vec!["A", "B"]);
    }

    #[test]
    fn test_rule_settings_are_deduplicated() {
        let cfg = config(
            Some("ro.acme.version"),
            vec![rule(
                "V14",
                vec![
                    item(CapabilityId::XiaomiLockPopup, "A"),
                    item(CapabilityId::XiaomiBackgroundPopup, "B"),
                    item(CapabilityId::XiaomiLockPopup, "C"),
                ],
            )],
        );

        let items = resolve("acme", &cfg, |_| Some("V14".to_string()));
        assert_eq!(titles(&items), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_rule_is_a_legitimate_result() {
        let cfg = config(Some("ro.acme.version"), vec![rule("V9", Vec::new())]);
        let items = resolve("acme", &cfg, |_| Some("V9".to_string()));
        assert!(items.is_empty());
    }
}
