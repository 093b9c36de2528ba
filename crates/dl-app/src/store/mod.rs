mod diff;
mod observers;
mod wizard_store;

pub use observers::SubscriptionId;
pub use wizard_store::{WizardStore, WizardStoreOptions, DEFAULT_STORAGE_KEY};
