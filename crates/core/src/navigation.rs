//! Navigation Descriptors
//!
//! Describes how a capability row is acted on: an intent action, the
//! platform permission it relates to, and/or an explicit component.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Explicit component reference (`package/Class`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    /// Owning package (e.g., "com.miui.securitycenter")
    pub package: String,

    /// Entry point class, possibly relative (".ui.MainActivity")
    pub class: String,
}

impl ComponentRef {
    /// Create a new component reference
    pub fn new(package: &str, class: &str) -> Self {
        Self {
            package: package.to_string(),
            class: class.to_string(),
        }
    }

    /// Fully qualified class name, expanding a package-relative class
    pub fn class_name(&self) -> String {
        if self.class.starts_with('.') {
            format!("{}{}", self.package, self.class)
        } else {
            self.class.clone()
        }
    }

    /// Flattened `package/Class` form
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package, self.class)
    }
}

impl FromStr for ComponentRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (package, class) = s
            .split_once('/')
            .ok_or_else(|| format!("component '{}' is missing the '/' separator", s))?;

        let package = package.trim();
        let class = class.trim();
        if package.is_empty() || class.is_empty() {
            return Err(format!("component '{}' needs both a package and a class", s));
        }

        Ok(Self::new(package, class))
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

impl Serialize for ComponentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComponentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How to navigate to a capability's settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDescriptor {
    /// Intent action (e.g., "android.settings.REQUEST_IGNORE_BATTERY_OPTIMIZATIONS")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Related platform permission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// Explicit component
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_component"
    )]
    pub component: Option<ComponentRef>,
}

impl NavigationDescriptor {
    /// Descriptor that fires an intent action
    pub fn action(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            ..Default::default()
        }
    }

    /// Descriptor that opens an explicit component
    pub fn component(component: ComponentRef) -> Self {
        Self {
            component: Some(component),
            ..Default::default()
        }
    }

    /// Attach a permission name
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permission = Some(permission.to_string());
        self
    }

    /// True when action, permission and component are all null or empty
    pub fn is_empty(&self) -> bool {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, str::is_empty)
        }

        blank(&self.action) && blank(&self.permission) && self.component.is_none()
    }
}

fn deserialize_component<'de, D>(deserializer: D) -> Result<Option<ComponentRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
