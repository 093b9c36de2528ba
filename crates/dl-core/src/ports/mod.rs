//! Port interfaces for the application layer
//!
//! Ports define the contract between the wizard store and infrastructure
//! implementations, keeping the domain independent of where and how the
//! state is persisted.

pub mod blob_storage;
pub mod errors;
pub mod snapshot_codec;
pub mod snapshot_migration;

pub use blob_storage::BlobStoragePort;
pub use errors::BlobStorageError;
pub use snapshot_codec::SnapshotCodecPort;
pub use snapshot_migration::SnapshotMigrationPort;
