use super::model::*;
use crate::ids::addon_id::{BETWEEN_TRIP_INSURANCE, BYO_LOCKBOX, BYO_SECONDARY_GPS};
use crate::ids::AddonId;

/// The three add-ons every state carries, in canonical order, none selected.
pub fn canonical_addons() -> Vec<Addon> {
    vec![
        addon(BYO_SECONDARY_GPS, "BYO secondary GPS", "$5/month"),
        addon(BYO_LOCKBOX, "BYO lockbox", "$10/month"),
        addon(BETWEEN_TRIP_INSURANCE, "Between trip insurance", "Coming soon"),
    ]
}

fn addon(id: &str, name: &str, price: &str) -> Addon {
    Addon {
        id: AddonId::from(id),
        name: name.to_string(),
        price: price.to_string(),
        selected: false,
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Subscription
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            selected_plan: None,
            current_step: WizardStep::default(),
            is_frozen: false,
            addons: canonical_addons(),
            card_details: None,
            devices: Vec::new(),
        }
    }
}
