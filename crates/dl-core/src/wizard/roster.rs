//! Device roster defaults.
//!
//! The device step always shows four records. When it is visited with fewer,
//! the missing defaults are appended according to the current length:
//!
//! | len | appended |
//! |-----|----------|
//! | 0   | Primary GPS, Secondary GPS, Drive mate Go, Lockbox |
//! | 1   | Secondary GPS, Drive mate Go, Lockbox |
//! | 2   | Drive mate Go, Lockbox |
//! | 3   | Lockbox |
//! | 4+  | nothing |
//!
//! Removing a record below four is therefore undone by the next observation.

use super::model::Device;
use crate::ids::DeviceId;

pub const ROSTER_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTemplate {
    pub device_type: &'static str,
    pub bringing_own_device: bool,
}

impl DeviceTemplate {
    pub fn instantiate(&self, id: DeviceId) -> Device {
        Device {
            id,
            device_type: self.device_type.to_string(),
            serial_number: String::new(),
            bringing_own_device: self.bringing_own_device,
            device_image: None,
        }
    }
}

pub const DEFAULT_ROSTER: [DeviceTemplate; ROSTER_SIZE] = [
    DeviceTemplate {
        device_type: "Primary GPS",
        bringing_own_device: true,
    },
    DeviceTemplate {
        device_type: "Secondary GPS",
        bringing_own_device: true,
    },
    DeviceTemplate {
        device_type: "Drive mate Go",
        bringing_own_device: false,
    },
    DeviceTemplate {
        device_type: "Lockbox",
        bringing_own_device: true,
    },
];

/// Templates still missing for a roster of `len` records.
pub fn missing_templates(len: usize) -> &'static [DeviceTemplate] {
    &DEFAULT_ROSTER[len.min(ROSTER_SIZE)..]
}

/// Build the records that pad `devices` up to [`ROSTER_SIZE`].
pub fn pad_roster(devices: &[Device], mut next_id: impl FnMut() -> DeviceId) -> Vec<Device> {
    missing_templates(devices.len())
        .iter()
        .map(|template| template.instantiate(next_id()))
        .collect()
}

/// Records surfaced for editing. Anything past the fourth stays stored but hidden.
pub fn editable_devices(devices: &[Device]) -> &[Device] {
    &devices[..devices.len().min(ROSTER_SIZE)]
}
