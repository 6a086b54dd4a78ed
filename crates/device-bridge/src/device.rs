//! Device Types and State
//!
//! Represents Android devices (physical and emulated) as listed by ADB.

use serde::{Deserialize, Serialize};

/// Device state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    /// Device is online and ready
    Online,
    /// Device is offline
    Offline,
    /// Device is not authorized (need to accept on device)
    Unauthorized,
    /// Device is in bootloader mode
    Bootloader,
    /// Device is in recovery mode
    Recovery,
    /// Unknown state
    Unknown,
}

impl DeviceState {
    /// Parse the state column of `adb devices`
    pub fn parse(s: &str) -> Self {
        match s {
            "device" => DeviceState::Online,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            "bootloader" => DeviceState::Bootloader,
            "recovery" => DeviceState::Recovery,
            _ => DeviceState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Online => "device",
            DeviceState::Offline => "offline",
            DeviceState::Unauthorized => "unauthorized",
            DeviceState::Bootloader => "bootloader",
            DeviceState::Recovery => "recovery",
            DeviceState::Unknown => "unknown",
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, DeviceState::Online)
    }
}

/// Device type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    /// Physical device connected via USB/WiFi
    Physical,
    /// Android emulator
    Emulator,
}

/// Device information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device serial number
    pub serial: String,
    /// Device state
    pub state: DeviceState,
    /// Device type
    pub device_type: DeviceType,
    /// Device model (e.g., "Pixel 4")
    pub model: Option<String>,
    /// Device product name
    pub product: Option<String>,
}

impl Device {
    /// Parse one line of `adb devices -l`
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return None;
        }

        let serial = parts[0].to_string();
        let mut model = None;
        let mut product = None;

        for part in parts.iter().skip(2) {
            if let Some(value) = part.strip_prefix("model:") {
                model = Some(value.to_string());
            } else if let Some(value) = part.strip_prefix("product:") {
                product = Some(value.to_string());
            }
        }

        let device_type = if serial.starts_with("emulator-") {
            DeviceType::Emulator
        } else {
            DeviceType::Physical
        };

        Some(Device {
            serial,
            state: DeviceState::parse(parts[1]),
            device_type,
            model,
            product,
        })
    }

    /// Check if device is online and usable
    pub fn is_usable(&self) -> bool {
        self.state.is_usable()
    }

    /// Get display name
    pub fn display_name(&self) -> String {
        if let Some(ref model) = self.model {
            format!("{} ({})", model.replace('_', " "), self.serial)
        } else {
            self.serial.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_line() {
        let device = Device::parse_line(
            "8a3f2c1d               device usb:1-1 product:venus model:M2011K2G device:venus transport_id:3",
        )
        .unwrap();

        assert_eq!(device.serial, "8a3f2c1d");
        assert!(device.is_usable());
        assert_eq!(device.device_type, DeviceType::Physical);
        assert_eq!(device.display_name(), "M2011K2G (8a3f2c1d)");

        let emulator = Device::parse_line("emulator-5554 unauthorized").unwrap();
        assert_eq!(emulator.device_type, DeviceType::Emulator);
        assert_eq!(emulator.state, DeviceState::Unauthorized);

        assert!(Device::parse_line("garbage").is_none());
    }
}
