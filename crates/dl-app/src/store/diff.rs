use dl_core::wizard::WizardState;

/// Top-level fields that differ between two states, for logging.
pub(crate) struct StateDiff {
    fields: Vec<&'static str>,
}

impl StateDiff {
    pub(crate) fn diff(old: &WizardState, new: &WizardState) -> Self {
        let mut fields = Vec::new();

        if old.selected_plan != new.selected_plan {
            fields.push("selected_plan");
        }
        if old.current_step != new.current_step {
            fields.push("current_step");
        }
        if old.is_frozen != new.is_frozen {
            fields.push("is_frozen");
        }
        if old.addons != new.addons {
            fields.push("addons");
        }
        if old.card_details != new.card_details {
            fields.push("card_details");
        }
        if old.devices != new.devices {
            fields.push("devices");
        }

        Self { fields }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn to_log_string(&self) -> String {
        if self.fields.is_empty() {
            "(no changes)".to_string()
        } else {
            self.fields.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::wizard::{CardDetails, SubscriptionPlan};

    #[test]
    fn test_diff_empty_when_no_changes() {
        let state = WizardState::default();
        let diff = StateDiff::diff(&state, &state);

        assert!(diff.is_empty());
        assert_eq!(diff.to_log_string(), "(no changes)");
    }

    #[test]
    fn test_diff_lists_changed_fields() {
        let old = WizardState::default();
        let mut new = old.clone();
        new.selected_plan = Some(SubscriptionPlan::JustMates);
        new.card_details = Some(CardDetails::default());
        new.addons[2].selected = true;

        let diff = StateDiff::diff(&old, &new);

        assert!(!diff.is_empty());
        assert_eq!(diff.to_log_string(), "selected_plan, addons, card_details");
    }
}
