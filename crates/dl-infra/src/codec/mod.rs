mod json_codec;
pub mod migration;
pub mod wizard_snapshot;

pub use json_codec::JsonSnapshotCodec;
pub use migration::SnapshotMigrator;
