use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

pub const BYO_SECONDARY_GPS: &str = "byo-secondary-gps";
pub const BYO_LOCKBOX: &str = "byo-lockbox";
pub const BETWEEN_TRIP_INSURANCE: &str = "between-trip-insurance";

/// The closed add-on id set, in canonical display order.
pub const REQUIRED_ADDON_IDS: [&str; 3] = [BYO_SECONDARY_GPS, BYO_LOCKBOX, BETWEEN_TRIP_INSURANCE];

/// Add-on identifier.
///
/// Kept as a string newtype so ids read back from storage can be inspected
/// (and unknown ones dropped) instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddonId(String);

impl AddonId {
    /// Whether this id belongs to the closed add-on set.
    pub fn is_known(&self) -> bool {
        REQUIRED_ADDON_IDS.contains(&self.0.as_str())
    }
}

impl_id!(AddonId);
