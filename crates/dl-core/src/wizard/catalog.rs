//! Plan catalog shown on the subscription step.

use serde::Serialize;

use super::model::{Addon, SubscriptionPlan};
use crate::ids::addon_id::BYO_SECONDARY_GPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureIcon {
    Info,
    Check,
    Lock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanFeature {
    pub label: &'static str,
    pub icon: FeatureIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub plan: SubscriptionPlan,
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [PlanFeature],
}

const fn feature(label: &'static str, icon: FeatureIcon) -> PlanFeature {
    PlanFeature { label, icon }
}

static PLANS: [PlanInfo; 3] = [
    PlanInfo {
        plan: SubscriptionPlan::JustMates,
        name: "Just mates",
        price: "Free",
        features: &[
            feature("Bring your own GPS", FeatureIcon::Info),
            feature("Mileage reporting to be done by you", FeatureIcon::Info),
            feature("In-person key handover to guests", FeatureIcon::Lock),
        ],
    },
    PlanInfo {
        plan: SubscriptionPlan::GoodMates,
        name: "Good mates",
        price: "$10/month",
        features: &[
            feature("Primary GPS included", FeatureIcon::Check),
            feature("Automated mileage calculations", FeatureIcon::Check),
            feature("In-person key handover to guests", FeatureIcon::Lock),
        ],
    },
    PlanInfo {
        plan: SubscriptionPlan::BestMates,
        name: "Best mates",
        price: "$30/month",
        features: &[
            feature("Keyless access technology", FeatureIcon::Check),
            feature("Automated mileage calculations", FeatureIcon::Check),
            feature("Remote handover to guests", FeatureIcon::Lock),
        ],
    },
];

pub struct PlanCatalog;

impl PlanCatalog {
    pub fn all() -> &'static [PlanInfo] {
        &PLANS
    }

    pub fn get(plan: SubscriptionPlan) -> &'static PlanInfo {
        match plan {
            SubscriptionPlan::JustMates => &PLANS[0],
            SubscriptionPlan::GoodMates => &PLANS[1],
            SubscriptionPlan::BestMates => &PLANS[2],
        }
    }

    /// Plans selectable on the subscription step. Live listings only see the
    /// two lower tiers.
    pub fn available_plans(frozen: bool) -> Vec<&'static PlanInfo> {
        PLANS
            .iter()
            .filter(|info| !frozen || info.plan != SubscriptionPlan::BestMates)
            .collect()
    }

    /// Label for an add-on under the given plan.
    pub fn addon_display_name(plan: Option<SubscriptionPlan>, addon: &Addon) -> &str {
        if plan == Some(SubscriptionPlan::BestMates) && addon.id == BYO_SECONDARY_GPS {
            "Between trip insurance"
        } else {
            &addon.name
        }
    }
}
