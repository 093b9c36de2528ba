use serde::{Deserialize, Serialize};

use crate::ids::{AddonId, DeviceId};

/// Subscription plan offered to the listing owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionPlan {
    JustMates,
    GoodMates,
    BestMates,
}

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 3] = [
        SubscriptionPlan::JustMates,
        SubscriptionPlan::GoodMates,
        SubscriptionPlan::BestMates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionPlan::JustMates => "just-mates",
            SubscriptionPlan::GoodMates => "good-mates",
            SubscriptionPlan::BestMates => "best-mates",
        }
    }
}

/// Wizard step the view layer reports as active.
///
/// Only used for progress rendering; it never gates navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Subscription,
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub id: AddonId,
    pub name: String,
    pub price: String,
    pub selected: bool,
}

/// Payment card details as typed by the user.
///
/// No format validation happens here; partial objects deserialize with the
/// missing members as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvc: String,
}

/// Single-field edits of [`CardDetails`].
///
/// The store only supports full replacement, so callers merge a patch into the
/// current value before calling `set_card_details`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetailsPatch {
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvc: Option<String>,
}

impl CardDetailsPatch {
    pub fn card_number(value: impl Into<String>) -> Self {
        Self {
            card_number: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn expiry_date(value: impl Into<String>) -> Self {
        Self {
            expiry_date: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn cvc(value: impl Into<String>) -> Self {
        Self {
            cvc: Some(value.into()),
            ..Default::default()
        }
    }

    /// Merge into `current`, starting from empty details when there are none.
    pub fn apply_to(self, current: Option<&CardDetails>) -> CardDetails {
        let mut details = current.cloned().unwrap_or_default();
        if let Some(card_number) = self.card_number {
            details.card_number = card_number;
        }
        if let Some(expiry_date) = self.expiry_date {
            details.expiry_date = expiry_date;
        }
        if let Some(cvc) = self.cvc {
            details.cvc = cvc;
        }
        details
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub bringing_own_device: bool,
    #[serde(default)]
    pub device_image: Option<String>,
}

/// Partial update of a [`Device`]; `None` members are left untouched.
///
/// `device_image: Some(None)` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePatch {
    pub device_type: Option<String>,
    pub serial_number: Option<String>,
    pub bringing_own_device: Option<bool>,
    pub device_image: Option<Option<String>>,
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        self.device_type.is_none()
            && self.serial_number.is_none()
            && self.bringing_own_device.is_none()
            && self.device_image.is_none()
    }

    pub fn apply(&self, device: &mut Device) {
        if let Some(device_type) = &self.device_type {
            device.device_type = device_type.clone();
        }
        if let Some(serial_number) = &self.serial_number {
            device.serial_number = serial_number.clone();
        }
        if let Some(bringing_own_device) = self.bringing_own_device {
            device.bringing_own_device = bringing_own_device;
        }
        if let Some(device_image) = &self.device_image {
            device.device_image = device_image.clone();
        }
    }
}

/// Root wizard state. One instance per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub selected_plan: Option<SubscriptionPlan>,
    pub current_step: WizardStep,
    /// The listing is already live; plan changes are blocked by the caller.
    pub is_frozen: bool,
    /// Fixed identity set; order is display order.
    pub addons: Vec<Addon>,
    pub card_details: Option<CardDetails>,
    /// Insertion order is creation order.
    pub devices: Vec<Device>,
}

impl WizardState {
    pub fn addon(&self, id: &str) -> Option<&Addon> {
        self.addons.iter().find(|addon| addon.id == id)
    }

    pub fn selected_addon(&self) -> Option<&Addon> {
        self.addons.iter().find(|addon| addon.selected)
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| &device.id == id)
    }
}

/// A previously persisted, possibly stale or partial, view of the state.
///
/// `None` means the field was absent from the stored blob. For nullable
/// fields the inner `Option` carries an explicitly stored "none".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub selected_plan: Option<Option<SubscriptionPlan>>,
    pub current_step: Option<WizardStep>,
    pub is_frozen: Option<bool>,
    pub addons: Option<Vec<Addon>>,
    pub card_details: Option<Option<CardDetails>>,
    pub devices: Option<Vec<Device>>,
}

impl From<&WizardState> for WizardSnapshot {
    fn from(state: &WizardState) -> Self {
        Self {
            selected_plan: Some(state.selected_plan),
            current_step: Some(state.current_step),
            is_frozen: Some(state.is_frozen),
            addons: Some(state.addons.clone()),
            card_details: Some(state.card_details.clone()),
            devices: Some(state.devices.clone()),
        }
    }
}
