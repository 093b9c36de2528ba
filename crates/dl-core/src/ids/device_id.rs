use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Opaque device record identifier.
///
/// Generated once when the record is created and never reused or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl_id!(DeviceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DeviceId::generate();
        let b = DeviceId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_device_id_serializes_as_plain_string() {
        let id = DeviceId::from("dev-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dev-1\"");
    }
}
