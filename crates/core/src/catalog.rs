//! Capability Catalog
//!
//! Stable identifiers for every keep-alive capability and the row type
//! presented for each of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::navigation::NavigationDescriptor;

/// Capability identifier
///
/// Every `id` referenced by a configuration document must name one of
/// these variants; an unknown id fails the document load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityId {
    // Platform-wide settings
    BatteryOptimization,
    BackgroundData,
    AlertWindow,

    // Xiaomi
    XiaomiPowerSavingStrategy,
    XiaomiBackgroundPopup,
    XiaomiLockPopup,

    // Honor / Huawei
    BackgroundActivity,

    // Vivo
    VivoBackgroundPopup,
    VivoLockScreen,
}

impl CapabilityId {
    /// All known identifiers
    pub const ALL: [CapabilityId; 9] = [
        CapabilityId::BatteryOptimization,
        CapabilityId::BackgroundData,
        CapabilityId::AlertWindow,
        CapabilityId::XiaomiPowerSavingStrategy,
        CapabilityId::XiaomiBackgroundPopup,
        CapabilityId::XiaomiLockPopup,
        CapabilityId::BackgroundActivity,
        CapabilityId::VivoBackgroundPopup,
        CapabilityId::VivoLockScreen,
    ];

    /// Identifier as written in configuration documents
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityId::BatteryOptimization => "battery_optimization",
            CapabilityId::BackgroundData => "background_data",
            CapabilityId::AlertWindow => "alert_window",
            CapabilityId::XiaomiPowerSavingStrategy => "xiaomi_power_saving_strategy",
            CapabilityId::XiaomiBackgroundPopup => "xiaomi_background_popup",
            CapabilityId::XiaomiLockPopup => "xiaomi_lock_popup",
            CapabilityId::BackgroundActivity => "background_activity",
            CapabilityId::VivoBackgroundPopup => "vivo_background_popup",
            CapabilityId::VivoLockScreen => "vivo_lock_screen",
        }
    }

    /// Look up an identifier by its document spelling
    pub fn from_str_id(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One presentable capability row
///
/// Identity is the [`CapabilityId`]: two items with the same id are
/// duplicates regardless of their other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityItem {
    pub id: CapabilityId,

    /// Row title
    pub title: String,

    /// Row description
    pub description: String,

    /// Whether the row shows a live on/off state
    #[serde(default)]
    pub is_checkable: bool,

    /// How to act on the capability
    #[serde(rename = "intent")]
    pub navigation: NavigationDescriptor,
}

impl CapabilityItem {
    /// Create a new non-checkable item
    pub fn new(id: CapabilityId, title: &str, description: &str, navigation: NavigationDescriptor) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            is_checkable: false,
            navigation,
        }
    }

    /// Mark the item as showing a live state
    pub fn checkable(mut self) -> Self {
        self.is_checkable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_spelling_matches_serde() {
        for id in CapabilityId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            assert_eq!(CapabilityId::from_str_id(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        let result: Result<CapabilityId, _> = serde_json::from_str("\"huawei_magic_toggle\"");
        assert!(result.is_err());
        assert_eq!(CapabilityId::from_str_id("huawei_magic_toggle"), None);
    }

    #[test]
    fn test_item_defaults_to_not_checkable() {
        let item: CapabilityItem = serde_json::from_str(
            r#"{
                "id": "background_activity",
                "title": "App launch",
                "description": "Allow manual management",
                "intent": { "action": "android.settings.SETTINGS" }
            }"#,
        )
        .unwrap();

        assert_eq!(item.id, CapabilityId::BackgroundActivity);
        assert!(!item.is_checkable);
        assert_eq!(item.navigation.action.as_deref(), Some("android.settings.SETTINGS"));
    }
}
