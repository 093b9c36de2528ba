//! Blob storage adapters.

mod background;
mod file;
mod memory;

pub use background::BackgroundFlushStorage;
pub use file::FileBlobStorage;
pub use memory::InMemoryBlobStorage;
