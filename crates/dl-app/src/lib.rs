//! Diverlah wizard application layer.
//!
//! Hosts the [`WizardStore`] facade: the only mutation surface the view layer
//! talks to.

pub mod store;

pub use store::{SubscriptionId, WizardStore, WizardStoreOptions, DEFAULT_STORAGE_KEY};
