use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStorageError {
    #[error("storage io error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage writer is no longer running")]
    ChannelClosed,

    #[error("storage error: {0}")]
    Backend(String),
}

impl BlobStorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}
