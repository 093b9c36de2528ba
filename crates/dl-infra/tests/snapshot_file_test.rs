//! Snapshot codec over file storage, including older on-disk layouts.

use dl_core::ports::{BlobStoragePort, SnapshotCodecPort, SnapshotMigrationPort};
use dl_core::ids::addon_id::REQUIRED_ADDON_IDS;
use dl_core::ids::DeviceId;
use dl_core::wizard::{
    reconcile, CardDetails, Device, SubscriptionPlan, WizardAction, WizardState,
    WizardStateMachine, WizardStep,
};
use dl_infra::codec::SnapshotMigrator;
use dl_infra::{FileBlobStorage, JsonSnapshotCodec};
use proptest::prelude::*;
use serde_json::{Map, Value};
use tempfile::tempdir;

const KEY: &str = "diverlah-storage";

/// Hypothetical v1 layout change: `plan` became `selectedPlan`.
struct RenamePlanField;

impl SnapshotMigrationPort for RenamePlanField {
    fn from_version(&self) -> u32 {
        0
    }

    fn to_version(&self) -> u32 {
        1
    }

    fn migrate(&self, mut state: Map<String, Value>) -> Map<String, Value> {
        if let Some(plan) = state.remove("plan") {
            state.insert("selectedPlan".to_string(), plan);
        }
        state
    }
}

#[test]
fn test_saved_state_reloads_from_disk() {
    let temp_dir = tempdir().unwrap();
    let storage = FileBlobStorage::new(temp_dir.path());
    let codec = JsonSnapshotCodec::new();

    let state = WizardState {
        selected_plan: Some(SubscriptionPlan::JustMates),
        current_step: WizardStep::Device,
        ..Default::default()
    };
    storage.set(KEY, &codec.encode(&state).unwrap()).unwrap();

    let blob = storage.get(KEY).unwrap();
    let restored = reconcile(codec.decode(blob.as_deref()), &WizardState::default());
    assert_eq!(restored, state);
}

#[test]
fn test_bare_state_file_from_older_build_is_read() {
    let temp_dir = tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("diverlah-storage.json"),
        r#"{"selectedPlan":"best-mates","isFrozen":true}"#,
    )
    .unwrap();

    let storage = FileBlobStorage::new(temp_dir.path());
    let blob = storage.get(KEY).unwrap();
    let restored = reconcile(
        JsonSnapshotCodec::new().decode(blob.as_deref()),
        &WizardState::default(),
    );

    assert_eq!(restored.selected_plan, Some(SubscriptionPlan::BestMates));
    assert!(restored.is_frozen);
    assert_eq!(restored.addons, WizardState::default().addons);
}

#[test]
fn test_registered_migration_runs_before_decoding() {
    let codec = JsonSnapshotCodec::with_migrator(SnapshotMigrator::with_migrations(
        vec![Box::new(RenamePlanField)],
        1,
    ));

    let blob = br#"{"state":{"plan":"good-mates"},"version":0}"#;
    let snapshot = codec.decode(Some(&blob[..])).unwrap();
    assert_eq!(snapshot.selected_plan, Some(Some(SubscriptionPlan::GoodMates)));

    // Already at the target version: nothing to rename, so the old key is ignored.
    let current = br#"{"state":{"plan":"good-mates"},"version":1}"#;
    let snapshot = codec.decode(Some(&current[..])).unwrap();
    assert_eq!(snapshot.selected_plan, None);
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        prop_oneof![
            Just("best-mates".to_string()),
            Just("device".to_string()),
            Just(REQUIRED_ADDON_IDS[1].to_string()),
            "[a-z-]{0,10}",
        ]
        .prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("selectedPlan".to_string()),
                    Just("currentStep".to_string()),
                    Just("isFrozen".to_string()),
                    Just("addons".to_string()),
                    Just("cardDetails".to_string()),
                    Just("devices".to_string()),
                    Just("id".to_string()),
                    Just("selected".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..5,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// States reachable through the wizard's own transitions.
fn reachable_state() -> impl Strategy<Value = WizardState> {
    let action = prop_oneof![
        prop::sample::select(REQUIRED_ADDON_IDS.to_vec())
            .prop_map(|id| WizardAction::ToggleAddon(id.into())),
        prop_oneof![
            Just(None),
            Just(Some(SubscriptionPlan::JustMates)),
            Just(Some(SubscriptionPlan::GoodMates)),
            Just(Some(SubscriptionPlan::BestMates)),
        ]
        .prop_map(WizardAction::SetSelectedPlan),
        any::<bool>().prop_map(WizardAction::SetIsFrozen),
        prop_oneof![Just(WizardStep::Subscription), Just(WizardStep::Device)]
            .prop_map(WizardAction::SetCurrentStep),
        ("[0-9 ]{0,19}", "[0-9/]{0,5}", "[0-9]{0,4}").prop_map(|(card_number, expiry_date, cvc)| {
            WizardAction::SetCardDetails(CardDetails {
                card_number,
                expiry_date,
                cvc,
            })
        }),
        (0u8..6, "[A-Za-z ]{0,12}", "[A-Z0-9-]{0,8}", any::<bool>(), prop::option::of("[a-z/.]{1,12}"))
            .prop_map(|(n, device_type, serial_number, bringing_own_device, device_image)| {
                WizardAction::AddDevice(Device {
                    id: DeviceId::from(format!("dev-{n}")),
                    device_type,
                    serial_number,
                    bringing_own_device,
                    device_image,
                })
            }),
    ];

    prop::collection::vec(action, 0..20).prop_map(|actions| {
        actions
            .into_iter()
            .fold(WizardState::default(), |state, action| {
                WizardStateMachine::transition(&state, action)
            })
    })
}

proptest! {
    #[test]
    fn saved_state_round_trips_through_disk(state in reachable_state()) {
        let temp_dir = tempdir().unwrap();
        let storage = FileBlobStorage::new(temp_dir.path());
        let codec = JsonSnapshotCodec::new();

        storage.set(KEY, &codec.encode(&state).unwrap()).unwrap();
        let blob = storage.get(KEY).unwrap();
        let restored = reconcile(codec.decode(blob.as_deref()), &WizardState::default());

        prop_assert_eq!(restored, state);
    }

    #[test]
    fn arbitrary_json_restores_complete_addons(value in json_value(), enveloped in any::<bool>()) {
        let blob = if enveloped {
            serde_json::to_vec(&serde_json::json!({"state": value, "version": 0})).unwrap()
        } else {
            serde_json::to_vec(&value).unwrap()
        };

        let restored = reconcile(
            JsonSnapshotCodec::new().decode(Some(blob.as_slice())),
            &WizardState::default(),
        );
        let ids: Vec<&str> = restored.addons.iter().map(|addon| addon.id.as_str()).collect();
        prop_assert_eq!(ids, REQUIRED_ADDON_IDS.to_vec());
    }

    #[test]
    fn distinct_keys_never_share_a_file(a in ".{0,16}", b in ".{0,16}") {
        prop_assume!(a != b);
        let storage = FileBlobStorage::new("/var/lib/diverlah");
        prop_assert_ne!(storage.path_for(&a), storage.path_for(&b));
    }
}
