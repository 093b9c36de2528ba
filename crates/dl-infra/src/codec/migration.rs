use dl_core::ports::SnapshotMigrationPort;
use serde_json::{Map, Value};
use tracing::warn;

use super::wizard_snapshot::CURRENT_SNAPSHOT_VERSION;

pub struct SnapshotMigrator {
    migrations: Vec<Box<dyn SnapshotMigrationPort>>,
    target_version: u32,
}

impl Default for SnapshotMigrator {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotMigrator {
    pub fn new() -> Self {
        Self {
            migrations: vec![
                // Box::new(MigrationV0ToV1),
            ],
            target_version: CURRENT_SNAPSHOT_VERSION,
        }
    }

    pub fn with_migrations(
        migrations: Vec<Box<dyn SnapshotMigrationPort>>,
        target_version: u32,
    ) -> Self {
        Self {
            migrations,
            target_version,
        }
    }

    pub fn target_version(&self) -> u32 {
        self.target_version
    }

    /// Walk the migration chain from `version` up to the target version.
    ///
    /// A gap in the chain is not fatal: the state is handed on as it is and
    /// the reconciler fills whatever it cannot read from defaults.
    pub fn migrate_to_latest(
        &self,
        mut version: u32,
        mut state: Map<String, Value>,
    ) -> Map<String, Value> {
        while version < self.target_version {
            let Some(migration) = self
                .migrations
                .iter()
                .find(|m| m.from_version() == version && m.to_version() > version)
            else {
                warn!(
                    from_version = version,
                    target_version = self.target_version,
                    "No snapshot migration registered, reading fields as-is"
                );
                break;
            };

            state = migration.migrate(state);
            version = migration.to_version();
        }

        state
    }
}
