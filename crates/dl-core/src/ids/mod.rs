//! ID type wrappers for type safety.

pub mod addon_id;
pub mod device_id;
mod id_macro;

pub use addon_id::AddonId;
pub use device_id::DeviceId;
