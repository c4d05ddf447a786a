use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// Create context registered twice
    #[error("Create context {name} is already registered with the Protocol")]
    DuplicateCreateContext { name: String },

    /// Replica type registered twice
    #[error("Replica type {name} is already registered with the Protocol")]
    DuplicateReplicaType { name: String },

    /// Emplace context registered twice
    #[error("Emplace context {name} is already registered with the Protocol")]
    DuplicateEmplaceContext { name: String },

    /// Channel type registered twice
    #[error("Channel type {name} is already registered with the Protocol")]
    DuplicateChannelType { name: String },
}
