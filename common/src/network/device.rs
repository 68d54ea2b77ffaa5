//! # Discovered Device Model
//!
//! A [`NetworkDevice`] is created once per responding address and never
//! mutated afterwards. Its classification is derived from the identity string
//! at construction time.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

/// Identity prefixes announced by the supported firmware builds.
///
/// Matching is case-sensitive and anchored at the start of the identity.
pub const DEVICE_SIGNATURES: &[&str] = &["ESP_", "ESP32_", "ESP8266_", "NodeMCU_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The identity carries one of the [`DEVICE_SIGNATURES`].
    KnownDevice,
    Unknown,
}

impl Classification {
    pub fn of(identity: &str) -> Self {
        if DEVICE_SIGNATURES.iter().any(|sig| identity.starts_with(sig)) {
            Self::KnownDevice
        } else {
            Self::Unknown
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::KnownDevice)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KnownDevice => f.write_str("known device"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkDevice {
    address: Ipv4Addr,
    identity: String,
    classification: Classification,
}

impl NetworkDevice {
    pub fn new(address: Ipv4Addr, identity: impl Into<String>) -> Self {
        let identity: String = identity.into();
        let classification = Classification::of(&identity);
        Self {
            address,
            identity,
            classification,
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }
}

/// Label given to a device that could not name itself, e.g. `Device_42`.
pub fn fallback_identity(address: Ipv4Addr) -> String {
    format!("Device_{}", address.octets()[3])
}

/// Keeps the first entry seen for each address, preserving order.
pub fn dedup_by_address(devices: Vec<NetworkDevice>) -> Vec<NetworkDevice> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::with_capacity(devices.len());
    devices
        .into_iter()
        .filter(|device| seen.insert(device.address))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
