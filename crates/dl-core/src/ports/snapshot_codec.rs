use crate::wizard::{WizardSnapshot, WizardState};

/// Converts the wizard state to and from the durable blob format.
pub trait SnapshotCodecPort: Send + Sync {
    /// Serialize every field of `state`. Must be lossless.
    fn encode(&self, state: &WizardState) -> anyhow::Result<Vec<u8>>;

    /// Read a stored blob.
    ///
    /// Must not fail: an absent, unparsable or non-object blob is `None`,
    /// which callers treat exactly like a fresh install.
    fn decode(&self, blob: Option<&[u8]>) -> Option<WizardSnapshot>;
}
