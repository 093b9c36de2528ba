pub mod codec;
pub mod storage;

pub use codec::JsonSnapshotCodec;
pub use codec::wizard_snapshot::CURRENT_SNAPSHOT_VERSION;
pub use storage::{BackgroundFlushStorage, FileBlobStorage, InMemoryBlobStorage};
