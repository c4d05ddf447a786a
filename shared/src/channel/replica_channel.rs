use std::{any::Any, sync::Arc};

use replistream_serde::{BitReader, BitWrite};

use crate::{
    channel::{channel_type::ReplicaChannelType, error::ReplicaChannelError},
    types::Tick,
};

/// Which half of a replica's lifetime a message belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SerializationPhase {
    /// Spawn and Clone messages
    Initialization,
    /// Forget and Destroy messages
    Uninitialization,
}

/// A named group of replicated properties attached to one Replica
pub trait ReplicaChannel: Any + Send + Sync + 'static {
    fn channel_type(&self) -> &Arc<ReplicaChannelType>;

    /// Writes the channel payload for one message
    fn serialize(
        &self,
        writer: &mut dyn BitWrite,
        phase: SerializationPhase,
        timestamp: Tick,
    ) -> Result<(), ReplicaChannelError>;

    /// Reads the channel payload written by `serialize` on the peer
    fn deserialize(
        &mut self,
        reader: &mut BitReader,
        phase: SerializationPhase,
        timestamp: Tick,
    ) -> Result<(), ReplicaChannelError>;

    /// Copy used as scratch space while a message is decoded, so a failed
    /// read never leaves the replica half updated
    fn copy_to_box(&self) -> Box<dyn ReplicaChannel>;

    fn to_any(&self) -> &dyn Any;
    fn to_any_mut(&mut self) -> &mut dyn Any;
}
