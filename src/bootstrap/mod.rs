pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_storage_dir, AppConfig};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{build_store, WiredStore, WiringError};
