//! Wizard state machine.
//!
//! Defines a pure state transition function for every store mutation.

use serde::{Deserialize, Serialize};

use super::model::{CardDetails, Device, DevicePatch, SubscriptionPlan, WizardState, WizardStep};
use super::reconcile::reconcile;
use crate::ids::{AddonId, DeviceId};

/// Mutations accepted by the wizard store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardAction {
    /// Set or clear the plan. Not rejected while frozen.
    SetSelectedPlan(Option<SubscriptionPlan>),
    SetIsFrozen(bool),
    /// Radio select: the given add-on becomes the only selected one.
    ToggleAddon(AddonId),
    /// Full replacement of the card details.
    SetCardDetails(CardDetails),
    SetCurrentStep(WizardStep),
    AddDevice(Device),
    /// Append several records in one transition (roster padding).
    AppendDevices(Vec<Device>),
    UpdateDevice { id: DeviceId, patch: DevicePatch },
    RemoveDevice(DeviceId),
    /// Back to the machine's canonical initial state.
    Reset,
}

impl WizardAction {
    /// Short name used in spans and logs.
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::SetSelectedPlan(_) => "set_selected_plan",
            WizardAction::SetIsFrozen(_) => "set_is_frozen",
            WizardAction::ToggleAddon(_) => "toggle_addon",
            WizardAction::SetCardDetails(_) => "set_card_details",
            WizardAction::SetCurrentStep(_) => "set_current_step",
            WizardAction::AddDevice(_) => "add_device",
            WizardAction::AppendDevices(_) => "append_devices",
            WizardAction::UpdateDevice { .. } => "update_device",
            WizardAction::RemoveDevice(_) => "remove_device",
            WizardAction::Reset => "reset",
        }
    }
}

/// Pure wizard state machine: no side effects, no id generation.
///
/// Holds the canonical initial state that `Reset` returns to. The initial
/// state is normalized on construction, so every reachable state carries the
/// three canonical add-ons.
#[derive(Debug, Clone, Default)]
pub struct WizardStateMachine {
    initial: WizardState,
}

impl WizardStateMachine {
    pub fn new(initial: &WizardState) -> Self {
        Self {
            initial: reconcile(None, initial),
        }
    }

    pub fn initial(&self) -> &WizardState {
        &self.initial
    }

    /// Transition with the default initial state as the reset target.
    pub fn transition(state: &WizardState, action: WizardAction) -> WizardState {
        Self::default().apply(state, action)
    }

    pub fn apply(&self, state: &WizardState, action: WizardAction) -> WizardState {
        let mut next = state.clone();

        match action {
            WizardAction::SetSelectedPlan(plan) => next.selected_plan = plan,
            WizardAction::SetIsFrozen(frozen) => next.is_frozen = frozen,
            WizardAction::ToggleAddon(id) => {
                // Unknown id: leave everything as is, including a stale double selection.
                if next.addons.iter().any(|addon| addon.id == id) {
                    for addon in &mut next.addons {
                        addon.selected = addon.id == id;
                    }
                }
            }
            WizardAction::SetCardDetails(details) => next.card_details = Some(details),
            WizardAction::SetCurrentStep(step) => next.current_step = step,
            WizardAction::AddDevice(device) => {
                if next.device(&device.id).is_none() {
                    next.devices.push(device);
                }
            }
            WizardAction::AppendDevices(devices) => {
                for device in devices {
                    if next.device(&device.id).is_none() {
                        next.devices.push(device);
                    }
                }
            }
            WizardAction::UpdateDevice { id, patch } => {
                if let Some(device) = next.devices.iter_mut().find(|device| device.id == id) {
                    patch.apply(device);
                }
            }
            WizardAction::RemoveDevice(id) => next.devices.retain(|device| device.id != id),
            WizardAction::Reset => next = self.initial.clone(),
        }

        next
    }
}
