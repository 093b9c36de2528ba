//! Derived selection rules.
//!
//! None of these are stored; the view layer evaluates them against the
//! current state.

use super::model::{Addon, SubscriptionPlan};
use crate::ids::addon_id::{BETWEEN_TRIP_INSURANCE, BYO_LOCKBOX};
use crate::ids::AddonId;

/// Whether the user may move past the subscription step.
pub fn can_advance(selected_plan: Option<SubscriptionPlan>, is_frozen: bool) -> bool {
    selected_plan.is_some() && !is_frozen
}

/// Add-ons offered for the given plan, in display order.
pub fn visible_addons(plan: Option<SubscriptionPlan>, addons: &[Addon]) -> Vec<&Addon> {
    match plan {
        None => Vec::new(),
        Some(SubscriptionPlan::JustMates) => addons
            .iter()
            .filter(|addon| addon.id == BYO_LOCKBOX)
            .collect(),
        Some(SubscriptionPlan::GoodMates | SubscriptionPlan::BestMates) => addons
            .iter()
            .filter(|addon| addon.id != BETWEEN_TRIP_INSURANCE)
            .collect(),
    }
}

/// Rendered but never selectable from the UI. The store does not enforce this.
pub fn addon_is_disabled(id: &AddonId) -> bool {
    *id == BETWEEN_TRIP_INSURANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::addon_id::BYO_SECONDARY_GPS;
    use crate::wizard::canonical_addons;

    fn ids(addons: Vec<&Addon>) -> Vec<&str> {
        addons.into_iter().map(|addon| addon.id.as_str()).collect()
    }

    #[test]
    fn test_can_advance() {
        assert!(!can_advance(None, false));
        assert!(can_advance(Some(SubscriptionPlan::GoodMates), false));
        for plan in SubscriptionPlan::ALL {
            assert!(!can_advance(Some(plan), true));
        }
        assert!(!can_advance(None, true));
    }

    #[test]
    fn test_just_mates_offers_lockbox_only() {
        let addons = canonical_addons();
        assert_eq!(
            ids(visible_addons(Some(SubscriptionPlan::JustMates), &addons)),
            vec![BYO_LOCKBOX]
        );
    }

    #[test]
    fn test_paid_plans_hide_insurance() {
        let addons = canonical_addons();
        for plan in [SubscriptionPlan::GoodMates, SubscriptionPlan::BestMates] {
            assert_eq!(
                ids(visible_addons(Some(plan), &addons)),
                vec![BYO_SECONDARY_GPS, BYO_LOCKBOX]
            );
        }
    }

    #[test]
    fn test_no_plan_offers_nothing() {
        assert!(visible_addons(None, &canonical_addons()).is_empty());
    }

    #[test]
    fn test_insurance_is_disabled() {
        assert!(addon_is_disabled(&AddonId::from(BETWEEN_TRIP_INSURANCE)));
        assert!(!addon_is_disabled(&AddonId::from(BYO_LOCKBOX)));
    }
}
