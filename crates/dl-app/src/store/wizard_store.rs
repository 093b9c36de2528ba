//! Wizard store facade.
//!
//! ## Behavior / 行为
//! - Loads and reconciles the persisted snapshot once, at construction
//! - Applies every mutation through its [`WizardStateMachine`]
//! - Writes the new state through to storage after each change
//! - Notifies subscribers in commit order; uncontended, before the operation returns
//!
//! Storage failures are logged and swallowed: the in-memory state stays
//! authoritative and the next change simply writes again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dl_core::ids::{AddonId, DeviceId};
use dl_core::ports::{BlobStoragePort, SnapshotCodecPort};
use dl_core::wizard::catalog::{PlanCatalog, PlanInfo};
use dl_core::wizard::progress::{sidebar_progress, StepProgress};
use dl_core::wizard::{
    reconcile, roster, selection, Addon, CardDetails, Device, DevicePatch, SubscriptionPlan,
    WizardAction, WizardState, WizardStateMachine, WizardStep,
};
use tracing::{debug, info, info_span, warn};

use super::diff::StateDiff;
use super::observers::{Observers, SubscriptionId};

/// Storage key the wizard state lives under.
pub const DEFAULT_STORAGE_KEY: &str = "diverlah-storage";

#[derive(Debug, Clone)]
pub struct WizardStoreOptions {
    pub storage_key: String,
    /// Canonical default: the reconciliation base and the `reset` target.
    /// Missing required add-ons are filled in from the canonical catalog.
    pub initial_state: WizardState,
}

impl Default for WizardStoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            initial_state: WizardState::default(),
        }
    }
}

pub struct WizardStore {
    storage: Arc<dyn BlobStoragePort>,
    codec: Arc<dyn SnapshotCodecPort>,
    storage_key: String,
    machine: WizardStateMachine,
    state: Mutex<Arc<WizardState>>,
    /// Bumped under the state lock on every committed change.
    revision: AtomicU64,
    observers: Observers,
}

impl WizardStore {
    /// Build the store and restore whatever was persisted under the storage key.
    ///
    /// A missing, unreadable or malformed blob is treated as a fresh install.
    /// Restoring does not write anything back.
    pub fn open(
        storage: Arc<dyn BlobStoragePort>,
        codec: Arc<dyn SnapshotCodecPort>,
        options: WizardStoreOptions,
    ) -> Self {
        let span = info_span!("store.open", key = %options.storage_key);
        let _guard = span.enter();

        let blob = match storage.get(&options.storage_key) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted wizard state, starting fresh");
                None
            }
        };
        let snapshot = codec.decode(blob.as_deref());
        let restored = snapshot.is_some();
        let machine = WizardStateMachine::new(&options.initial_state);
        let state = reconcile(snapshot, machine.initial());

        info!(
            restored,
            plan = ?state.selected_plan,
            step = ?state.current_step,
            devices = state.devices.len(),
            "Wizard state ready"
        );

        Self {
            storage,
            codec,
            storage_key: options.storage_key,
            machine,
            state: Mutex::new(Arc::new(state)),
            revision: AtomicU64::new(0),
            observers: Observers::default(),
        }
    }

    fn cell(&self) -> MutexGuard<'_, Arc<WizardState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ----- reads -----

    /// Current state. The returned value never changes; later mutations
    /// replace the store's cell instead.
    pub fn state(&self) -> Arc<WizardState> {
        self.cell().clone()
    }

    pub fn selected_plan(&self) -> Option<SubscriptionPlan> {
        self.cell().selected_plan
    }

    pub fn current_step(&self) -> WizardStep {
        self.cell().current_step
    }

    pub fn is_frozen(&self) -> bool {
        self.cell().is_frozen
    }

    pub fn addons(&self) -> Vec<Addon> {
        self.cell().addons.clone()
    }

    pub fn card_details(&self) -> Option<CardDetails> {
        self.cell().card_details.clone()
    }

    pub fn devices(&self) -> Vec<Device> {
        self.cell().devices.clone()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // ----- derived reads -----

    /// Whether the subscription step may be left.
    ///
    /// `route_frozen` forces frozen semantics for the frozen route even when
    /// the stored flag is off.
    pub fn can_advance(&self, route_frozen: bool) -> bool {
        let state = self.state();
        selection::can_advance(state.selected_plan, state.is_frozen || route_frozen)
    }

    pub fn visible_addons(&self) -> Vec<Addon> {
        let state = self.state();
        selection::visible_addons(state.selected_plan, &state.addons)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn available_plans(&self, route_frozen: bool) -> Vec<&'static PlanInfo> {
        PlanCatalog::available_plans(self.is_frozen() || route_frozen)
    }

    pub fn editable_devices(&self) -> Vec<Device> {
        roster::editable_devices(&self.state().devices).to_vec()
    }

    pub fn sidebar_progress(&self) -> Vec<StepProgress> {
        sidebar_progress(self.current_step())
    }

    // ----- subscriptions -----

    pub fn subscribe(
        &self,
        listener: impl Fn(&WizardState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.add(Arc::new(listener))
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    // ----- mutations -----

    /// Does not check `is_frozen`; callers gate plan changes themselves.
    pub fn set_selected_plan(&self, plan: Option<SubscriptionPlan>) {
        self.dispatch(WizardAction::SetSelectedPlan(plan));
    }

    pub fn set_is_frozen(&self, frozen: bool) {
        self.dispatch(WizardAction::SetIsFrozen(frozen));
    }

    pub fn toggle_addon(&self, id: impl Into<AddonId>) {
        self.dispatch(WizardAction::ToggleAddon(id.into()));
    }

    pub fn set_card_details(&self, details: CardDetails) {
        self.dispatch(WizardAction::SetCardDetails(details));
    }

    pub fn set_current_step(&self, step: WizardStep) {
        self.dispatch(WizardAction::SetCurrentStep(step));
    }

    /// A record whose id is already in the roster is ignored.
    pub fn add_device(&self, device: Device) {
        self.apply(|state| {
            if state.device(&device.id).is_some() {
                warn!(device_id = %device.id, "Device id already in roster, ignoring add");
                return None;
            }
            Some(WizardAction::AddDevice(device))
        });
    }

    pub fn update_device(&self, id: &DeviceId, patch: DevicePatch) {
        if patch.is_empty() {
            return;
        }
        self.dispatch(WizardAction::UpdateDevice {
            id: id.clone(),
            patch,
        });
    }

    pub fn remove_device(&self, id: &DeviceId) {
        self.dispatch(WizardAction::RemoveDevice(id.clone()));
    }

    /// Roster observation for the device step: pads the roster to four
    /// default records in one change. Returns how many were appended.
    pub fn ensure_default_devices(&self) -> usize {
        let mut appended = 0;
        self.apply(|state| {
            let devices = roster::pad_roster(&state.devices, DeviceId::generate);
            appended = devices.len();
            (!devices.is_empty()).then_some(WizardAction::AppendDevices(devices))
        });
        appended
    }

    /// Restore the initial state and persist it, replacing any stored overrides.
    pub fn reset(&self) {
        self.dispatch(WizardAction::Reset);
    }

    fn dispatch(&self, action: WizardAction) {
        self.apply(|_| Some(action));
    }

    /// Build the action from the current state and apply it under the same lock.
    fn apply(&self, build: impl FnOnce(&WizardState) -> Option<WizardAction>) {
        let (revision, changed) = {
            let mut cell = self.cell();
            let current = Arc::clone(&cell);
            let Some(action) = build(&current) else {
                return;
            };

            let span = info_span!("store.dispatch", action = action.name());
            let _guard = span.enter();

            let next = self.machine.apply(&current, action);
            let diff = StateDiff::diff(&current, &next);
            if diff.is_empty() {
                debug!("No state change");
                return;
            }

            debug!(changed_fields = %diff.to_log_string(), "Wizard state updated");
            let next = Arc::new(next);
            *cell = next.clone();
            // Persist under the lock so writes land in mutation order.
            self.persist(&next);
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            (revision, next)
        };

        self.observers.notify(revision, changed);
    }

    fn persist(&self, state: &WizardState) {
        let blob = match self.codec.encode(state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to encode wizard state, skipping write");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.storage_key, &blob) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist wizard state");
        }
    }
}
