//! Sidebar progress for the full listing flow.
//!
//! Only the subscription and device steps are driven by this wizard; the rest
//! of the flow is rendered around them.

use serde::Serialize;

use super::model::WizardStep;

pub const WIZARD_STEPS: [&str; 11] = [
    "Location",
    "About",
    "Features",
    "Rules",
    "Pricing",
    "Promotion",
    "Pictures",
    "Insurance",
    "Subscription",
    "Device",
    "Easy Access",
];

impl WizardStep {
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Subscription => "Subscription",
            WizardStep::Device => "Device",
        }
    }

    /// Position in [`WIZARD_STEPS`].
    pub fn sidebar_index(self) -> usize {
        match self {
            WizardStep::Subscription => 8,
            WizardStep::Device => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Active,
    /// The step right after the active one; reachable but not yet visited.
    Upcoming,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub label: &'static str,
    pub status: StepStatus,
}

pub fn sidebar_progress(current: WizardStep) -> Vec<StepProgress> {
    let current_index = current.sidebar_index();

    WIZARD_STEPS
        .iter()
        .enumerate()
        .map(|(index, &label)| {
            let status = if index < current_index {
                StepStatus::Completed
            } else if index == current_index {
                StepStatus::Active
            } else if index == current_index + 1 {
                StepStatus::Upcoming
            } else {
                StepStatus::Disabled
            };
            StepProgress { label, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_index_matches_labels() {
        for step in [WizardStep::Subscription, WizardStep::Device] {
            assert_eq!(WIZARD_STEPS[step.sidebar_index()], step.label());
        }
    }

    #[test]
    fn test_subscription_progress() {
        let progress = sidebar_progress(WizardStep::Subscription);

        assert_eq!(progress.len(), WIZARD_STEPS.len());
        assert!(progress[..8]
            .iter()
            .all(|step| step.status == StepStatus::Completed));
        assert_eq!(progress[8].status, StepStatus::Active);
        assert_eq!(progress[9].status, StepStatus::Upcoming);
        assert_eq!(progress[10].status, StepStatus::Disabled);
    }

    #[test]
    fn test_device_progress() {
        let progress = sidebar_progress(WizardStep::Device);

        assert_eq!(progress[8].status, StepStatus::Completed);
        assert_eq!(progress[9].status, StepStatus::Active);
        assert_eq!(progress[10].label, "Easy Access");
        assert_eq!(progress[10].status, StepStatus::Upcoming);
    }
}
