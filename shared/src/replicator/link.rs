use replistream_serde::{BitReader, BitWrite, SerdeErr};
use thiserror::Error;

use crate::replica::{replica::Replica, replica_id::ReplicaId};

/// Errors raised by a ReplicatorLink while opening or reading message channels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The message channel record could not be read off the stream
    #[error("Message channel record could not be read: {0}")]
    Serde(#[from] SerdeErr),

    /// The peer announced more message channels than this link accepts
    #[error("Replica {replica_id} announced {announced} message channels, at most {limit} are accepted")]
    ChannelLimitExceeded {
        replica_id: ReplicaId,
        announced: usize,
        limit: usize,
    },

    /// The link refused to open channels for a replica
    #[error("Message channels for replica {replica_id} could not be opened: {reason}")]
    OpenRejected {
        replica_id: ReplicaId,
        reason: String,
    },
}

/// Per-peer connection that opens the transport level message channels a
/// replica needs besides its property channels.
///
/// Forward channels carry state in the default authority direction and are
/// opened when a replica is spawned or cloned. Reverse channels carry state
/// owned by the non authoritative peer.
///
/// Channel records are kept until `forget_replica`, which the message layer
/// calls once a replica is forgotten or destroyed, and for a replica whose
/// Spawn or Clone message was rejected.
pub trait ReplicatorLink {
    fn open_and_serialize_forward_replica_channels(
        &mut self,
        writer: &mut dyn BitWrite,
        replica: &Replica,
    ) -> Result<(), LinkError>;

    fn deserialize_and_set_forward_replica_channels(
        &mut self,
        reader: &mut BitReader,
        replica: &mut Replica,
    ) -> Result<(), LinkError>;

    fn open_and_serialize_reverse_replica_channels(
        &mut self,
        writer: &mut dyn BitWrite,
        replica: &Replica,
    ) -> Result<(), LinkError>;

    fn deserialize_and_set_reverse_replica_channels(
        &mut self,
        reader: &mut BitReader,
        replica: &mut Replica,
    ) -> Result<(), LinkError>;

    /// Drops every channel recorded for the replica
    fn forget_replica(&mut self, replica_id: &ReplicaId);
}
