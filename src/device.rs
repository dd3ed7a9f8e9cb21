//! Bus devices as the driver sees them.
//!
//! A [`PlatformDevice`] is the handle the bus layer passes in on a match
//! event. It carries the device's identity and the devicetree `compatible`
//! strings that decide which driver binds to it.
//!
//! ```
//! use phoneodeo_dir::PlatformDevice;
//!
//! let dev = PlatformDevice::new("spdif-in.0").with_compatible("linux,phoneodeo-dir");
//! assert!(dev.is_compatible("linux,phoneodeo-dir"));
//! assert!(!dev.is_compatible("linux,spdif-dir"));
//! ```

use core::fmt;
use std::sync::Arc;

/// Identity of a bus device.
///
/// Cloning is a pointer copy.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DeviceId(Arc<str>);

impl DeviceId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A device on the platform bus.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlatformDevice {
    id: DeviceId,
    compatible: Vec<String>,
}

impl PlatformDevice {
    /// A device with no compatible strings; it matches nothing until one is added.
    pub fn new(id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            compatible: Vec::new(),
        }
    }

    /// Appends a compatible string. Earlier entries are more specific.
    pub fn with_compatible(mut self, compatible: impl Into<String>) -> Self {
        self.compatible.push(compatible.into());
        self
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn compatible(&self) -> &[String] {
        &self.compatible
    }

    /// Exact, case-sensitive comparison against every compatible entry.
    pub fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible.iter().any(|c| c == compatible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_equality_and_display() {
        let a = DeviceId::new("spdif-in.0");
        let b: DeviceId = String::from("spdif-in.0").into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "spdif-in.0");
    }

    #[test]
    fn compatible_match_is_exact() {
        let dev = PlatformDevice::new("dev0")
            .with_compatible("vendor,board-dir")
            .with_compatible("linux,phoneodeo-dir");

        assert!(dev.is_compatible("linux,phoneodeo-dir"));
        assert!(!dev.is_compatible("linux,phoneodeo"));
        assert!(!dev.is_compatible("LINUX,PHONEODEO-DIR"));
        assert_eq!(dev.compatible().len(), 2);
    }

    #[test]
    fn bare_device_matches_nothing() {
        let dev = PlatformDevice::new("dev0");
        assert!(dev.compatible().is_empty());
        assert!(!dev.is_compatible(""));
    }
}
