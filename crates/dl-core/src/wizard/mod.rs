//! Listing wizard domain.
//!
//! The wizard state is the single source of truth for plan and add-on
//! selection, payment details and the device roster. Every mutation is a pure
//! transition over [`WizardState`], see [`WizardStateMachine`].

pub mod catalog;
mod defaults;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod roster;
pub mod selection;
pub mod state_machine;

pub use defaults::canonical_addons;
pub use model::{
    Addon, CardDetails, CardDetailsPatch, Device, DevicePatch, SubscriptionPlan, WizardSnapshot,
    WizardState, WizardStep,
};
pub use reconcile::reconcile;
pub use state_machine::{WizardAction, WizardStateMachine};
