//! Wizard snapshot codec.
//!
//! The persisted blob is a JSON envelope:
//!
//! ```json
//! { "state": { "selectedPlan": "good-mates", ... }, "version": 0 }
//! ```
//!
//! Decoding never fails. An absent, empty, unparsable or non-object blob
//! reads as "no snapshot", and each known field is decoded on its own so a
//! single malformed field only costs that field.

use anyhow::{Context, Result};
use dl_core::ids::AddonId;
use dl_core::wizard::{canonical_addons, Addon, Device, WizardSnapshot, WizardState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::migration::SnapshotMigrator;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 0;

const STATE_KEY: &str = "state";
const VERSION_KEY: &str = "version";

#[derive(Serialize)]
struct SnapshotEnvelope<'a> {
    state: &'a WizardState,
    version: u32,
}

/// Serialize the full state into a storage blob.
pub fn encode(state: &WizardState) -> Result<Vec<u8>> {
    serde_json::to_vec(&SnapshotEnvelope {
        state,
        version: CURRENT_SNAPSHOT_VERSION,
    })
    .context("serialize wizard snapshot failed")
}

/// Read a storage blob back into a snapshot, using the default migration chain.
pub fn decode(blob: Option<&[u8]>) -> Option<WizardSnapshot> {
    decode_with(blob, &SnapshotMigrator::new())
}

pub fn decode_with(blob: Option<&[u8]>, migrator: &SnapshotMigrator) -> Option<WizardSnapshot> {
    let blob = blob?;
    if blob.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    let root = match serde_json::from_slice::<Value>(blob) {
        Ok(Value::Object(root)) => root,
        Ok(_) => {
            warn!("Stored wizard snapshot is not an object, ignoring it");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Stored wizard snapshot is not valid JSON, ignoring it");
            return None;
        }
    };

    let (version, state) = split_envelope(root)?;
    let state = migrator.migrate_to_latest(version, state);

    Some(snapshot_from_fields(state))
}

/// Accepts both the versioned envelope and a bare state object.
fn split_envelope(mut root: Map<String, Value>) -> Option<(u32, Map<String, Value>)> {
    match root.remove(STATE_KEY) {
        Some(Value::Object(state)) => {
            let version = root
                .get(VERSION_KEY)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0);
            Some((version, state))
        }
        Some(_) => {
            warn!("Stored wizard snapshot envelope has no state object, ignoring it");
            None
        }
        None => {
            debug!("Stored wizard snapshot has no envelope, reading it as a bare state");
            Some((0, root))
        }
    }
}

fn snapshot_from_fields(mut fields: Map<String, Value>) -> WizardSnapshot {
    WizardSnapshot {
        selected_plan: field(&mut fields, "selectedPlan"),
        current_step: field(&mut fields, "currentStep"),
        is_frozen: field(&mut fields, "isFrozen"),
        addons: entries(&mut fields, "addons", addon_entry),
        card_details: field(&mut fields, "cardDetails"),
        devices: entries(&mut fields, "devices", device_entry),
    }
}

fn field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.remove(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(field = key, error = %e, "Ignoring malformed snapshot field");
            None
        }
    }
}

fn entries<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    decode_entry: fn(Value) -> Option<T>,
) -> Option<Vec<T>> {
    match fields.remove(key)? {
        Value::Array(items) => {
            let total = items.len();
            let decoded: Vec<T> = items.into_iter().filter_map(decode_entry).collect();
            if decoded.len() < total {
                warn!(
                    field = key,
                    dropped = total - decoded.len(),
                    "Dropping malformed snapshot entries"
                );
            }
            Some(decoded)
        }
        _ => {
            warn!(field = key, "Ignoring snapshot field that is not a list");
            None
        }
    }
}

/// Entries need a string `id`; missing members of a known add-on come from
/// its canonical entry. Unknown ids are kept here and dropped by the reconciler.
fn addon_entry(value: Value) -> Option<Addon> {
    let Value::Object(entry) = value else {
        return None;
    };
    let id = AddonId::from(entry.get("id")?.as_str()?);
    let fallback = canonical_addons().into_iter().find(|addon| addon.id == id);

    let text = |key: &str, default: Option<&String>| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| default.cloned())
            .unwrap_or_default()
    };

    Some(Addon {
        name: text("name", fallback.as_ref().map(|a| &a.name)),
        price: text("price", fallback.as_ref().map(|a| &a.price)),
        selected: entry
            .get("selected")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        id,
    })
}

fn device_entry(value: Value) -> Option<Device> {
    serde_json::from_value(value).ok()
}
