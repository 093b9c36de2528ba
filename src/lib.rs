//! Diverlah listing wizard.
//!
//! The wizard itself lives in the workspace crates:
//! - `dl-core`: state model, reconciliation and the pure state machine
//! - `dl-infra`: snapshot codec and storage adapters
//! - `dl-app`: the [`WizardStore`] facade
//!
//! This crate only assembles them, see [`bootstrap`].

pub mod bootstrap;

pub use dl_app::{SubscriptionId, WizardStore, WizardStoreOptions, DEFAULT_STORAGE_KEY};
pub use dl_core::wizard;
