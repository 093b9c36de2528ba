//! Snapshot reconciliation.
//!
//! Turns a freshly loaded, possibly stale or partial snapshot into a complete
//! [`WizardState`]:
//!
//! 1. no snapshot: canonical default, unchanged
//! 2. otherwise start from the canonical default and overlay every field the
//!    snapshot carries (shallow, snapshot wins)
//! 3. rebuild `addons` from the closed id set in canonical order, taking the
//!    stored entry for an id verbatim when there is one and the default entry
//!    when there is not; unknown ids are dropped
//!
//! An entry missing from both the snapshot and the initial state falls back to
//! the canonical entry, so the result always carries all three add-ons.
//!
//! Reconciliation never writes back to storage, and it does not repair a
//! snapshot with more than one selected add-on. That is left to the next
//! `ToggleAddon` transition.

use tracing::debug;

use super::defaults::canonical_addons;
use super::model::{Addon, WizardSnapshot, WizardState};
use crate::ids::addon_id::REQUIRED_ADDON_IDS;

pub fn reconcile(snapshot: Option<WizardSnapshot>, initial: &WizardState) -> WizardState {
    let Some(snapshot) = snapshot else {
        let mut state = initial.clone();
        state.addons = merge_addons(None, &initial.addons);
        return state;
    };

    let mut state = initial.clone();

    if let Some(selected_plan) = snapshot.selected_plan {
        state.selected_plan = selected_plan;
    }
    if let Some(current_step) = snapshot.current_step {
        state.current_step = current_step;
    }
    if let Some(is_frozen) = snapshot.is_frozen {
        state.is_frozen = is_frozen;
    }
    if let Some(card_details) = snapshot.card_details {
        state.card_details = card_details;
    }
    if let Some(devices) = snapshot.devices {
        state.devices = devices;
    }

    state.addons = merge_addons(snapshot.addons.as_deref(), &initial.addons);
    state
}

fn merge_addons(stored: Option<&[Addon]>, defaults: &[Addon]) -> Vec<Addon> {
    let stored = stored.unwrap_or_default();

    let dropped = stored.iter().filter(|addon| !addon.id.is_known()).count();
    if dropped > 0 {
        debug!(dropped, "Dropping unknown add-on entries from snapshot");
    }

    let canonical = canonical_addons();
    REQUIRED_ADDON_IDS
        .iter()
        .zip(canonical)
        .map(|(id, fallback)| {
            stored
                .iter()
                .chain(defaults)
                .find(|addon| addon.id == *id)
                .cloned()
                .unwrap_or(fallback)
        })
        .collect()
}
