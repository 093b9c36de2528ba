use serde_json::{Map, Value};

/// One step of the persisted snapshot schema migration chain.
///
/// Migrations operate on the raw state object before it is decoded, so they
/// can rename or reshape fields the current model no longer understands.
pub trait SnapshotMigrationPort: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, state: Map<String, Value>) -> Map<String, Value>;
}
