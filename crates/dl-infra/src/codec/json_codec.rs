use dl_core::ports::SnapshotCodecPort;
use dl_core::wizard::{WizardSnapshot, WizardState};

use super::migration::SnapshotMigrator;
use super::wizard_snapshot;

/// JSON envelope codec backed by [`wizard_snapshot`].
#[derive(Default)]
pub struct JsonSnapshotCodec {
    migrator: SnapshotMigrator,
}

impl JsonSnapshotCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_migrator(migrator: SnapshotMigrator) -> Self {
        Self { migrator }
    }
}

impl SnapshotCodecPort for JsonSnapshotCodec {
    fn encode(&self, state: &WizardState) -> anyhow::Result<Vec<u8>> {
        wizard_snapshot::encode(state)
    }

    fn decode(&self, blob: Option<&[u8]>) -> Option<WizardSnapshot> {
        wizard_snapshot::decode_with(blob, &self.migrator)
    }
}
