use replistream_serde::SerdeErr;
use thiserror::Error;

use crate::{
    channel::error::ReplicaChannelError,
    replica::replica_id::{EmplaceId, ReplicaId},
    replicator::link::LinkError,
    stream::mode::ReplicaStreamMode,
};

/// Errors raised while writing a replica message. Every variant except
/// `Channel` and `Link` means the caller broke a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaWriteError {
    /// The create context has no id in this connection's cacher
    #[error("Create context {name} is not mapped in the Replicator. Map it before writing replicas that use it")]
    UnmappedCreateContext { name: String },

    /// The replica type has no id in this connection's cacher
    #[error("Replica type {name} is not mapped in the Replicator. Map it before writing replicas of this type")]
    UnmappedReplicaType { name: String },

    /// The emplace context has no id in this connection's cacher
    #[error("Emplace context {name} is not mapped in the Replicator. Map it before cloning replicas emplaced in it")]
    UnmappedEmplaceContext { name: String },

    /// Spawn messages can't describe an emplaced replica, use Clone instead
    #[error("Replica {replica_id} is emplaced and can't be written in a Spawn message, use Clone instead")]
    EmplacedSpawn { replica_id: ReplicaId },

    /// Reverse channel message for a replica that doesn't use them
    #[error("Replica {replica_id} does not use reverse replica channels")]
    ReverseChannelsNotDeclared { replica_id: ReplicaId },

    /// A channel failed to serialize its payload
    #[error("Channel {channel} failed to serialize: {source}")]
    Channel {
        channel: String,
        source: ReplicaChannelError,
    },

    /// The link failed to open message channels
    #[error("Replicator link failed: {0}")]
    Link(#[from] LinkError),
}

/// Errors raised while reading a replica message. All of them come from the
/// peer's bytes; none of them mean a local bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaReadError {
    /// The stream ran out or held an invalid encoding
    #[error("Replica message could not be read: {0}")]
    Serde(#[from] SerdeErr),

    /// The message header announced creation info the mode doesn't allow
    #[error("Creation info presence does not match a {mode:?} message")]
    CreationInfoMismatch { mode: ReplicaStreamMode },

    /// The peer wrote the reserved zero replica id
    #[error("Replica id 0 is reserved and can't identify a replica")]
    ZeroReplicaId,

    /// The peer wrote the reserved zero emplace id
    #[error("Emplace id 0 is reserved, received for replica {replica_id}")]
    ZeroEmplaceId { replica_id: ReplicaId },

    /// Create context id not known to this connection
    #[error("Create context id {id} is not mapped in the Replicator")]
    UnknownCreateContextId { id: u16 },

    /// Replica type id not known to this connection
    #[error("Replica type id {id} is not mapped in the Replicator")]
    UnknownReplicaTypeId { id: u16 },

    /// Emplace context id not known to this connection
    #[error("Emplace context id {id} is not mapped in the Replicator, received for replica {replica_id}")]
    UnknownEmplaceContextId { replica_id: ReplicaId, id: u16 },

    /// Reverse channel message for a replica that doesn't use them
    #[error("Received reverse replica channels for replica {replica_id}, which does not use them")]
    ReverseChannelsNotDeclared { replica_id: ReplicaId },

    /// A channel failed to deserialize its payload
    #[error("Channel {channel} failed to deserialize: {source}")]
    Channel {
        channel: String,
        source: ReplicaChannelError,
    },

    /// The link failed to read message channels
    #[error("Replicator link failed: {0}")]
    Link(#[from] LinkError),

    /// Message addressed a replica that isn't alive
    #[error("{mode:?} message for replica {replica_id}, which is not registered")]
    UnknownReplica {
        replica_id: ReplicaId,
        mode: ReplicaStreamMode,
    },

    /// Spawn or Clone for a replica that is already alive
    #[error("Replica {replica_id} is already registered")]
    DuplicateReplica { replica_id: ReplicaId },

    /// No local object matched the emplacement of a cloned replica
    #[error("No local object for replica {replica_id} in emplace context {context} with emplace id {emplace_id}")]
    EmplaceTargetMissing {
        replica_id: ReplicaId,
        context: String,
        emplace_id: EmplaceId,
    },

    /// The factory refused to build the replica
    #[error("Replica factory refused to create replica {replica_id} of type {replica_type}")]
    FactoryRejected {
        replica_id: ReplicaId,
        replica_type: String,
    },
}
