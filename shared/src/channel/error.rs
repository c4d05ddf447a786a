use replistream_serde::SerdeErr;
use thiserror::Error;

/// Errors a ReplicaChannel raises while (de)serializing its payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaChannelError {
    /// The payload could not be read off the stream
    #[error("Channel payload could not be read: {0}")]
    Serde(#[from] SerdeErr),

    /// The channel refused to write its payload
    #[error("Channel refused to write its payload: {reason}")]
    WriteRejected { reason: String },

    /// The payload was read but holds a value the channel can't accept
    #[error("Channel payload holds an invalid value: {reason}")]
    InvalidValue { reason: String },
}
