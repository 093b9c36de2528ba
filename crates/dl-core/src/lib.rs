//! # dl-core
//!
//! Core domain models and business logic for the diverlah listing wizard.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod ids;
pub mod ports;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use ids::{AddonId, DeviceId};
pub use wizard::{
    Addon, CardDetails, Device, SubscriptionPlan, WizardAction, WizardSnapshot, WizardState,
    WizardStateMachine, WizardStep,
};
