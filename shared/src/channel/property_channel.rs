use std::{any::Any, sync::Arc};

use replistream_serde::{BitReader, BitWrite, Serde};

use crate::{
    channel::{
        channel_type::ReplicaChannelType,
        error::ReplicaChannelError,
        replica_channel::{ReplicaChannel, SerializationPhase},
    },
    types::Tick,
};

/// Channel replicating a single value
#[derive(Clone)]
pub struct PropertyChannel<T: Serde + Send + Sync + 'static> {
    channel_type: Arc<ReplicaChannelType>,
    value: T,
    last_received: Option<(SerializationPhase, Tick)>,
}

impl<T: Serde + Send + Sync + 'static> PropertyChannel<T> {
    pub fn new(channel_type: Arc<ReplicaChannelType>, value: T) -> Self {
        Self {
            channel_type,
            value,
            last_received: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Phase and timestamp of the last message this channel was read from
    pub fn last_received(&self) -> Option<(SerializationPhase, Tick)> {
        self.last_received
    }
}

impl<T: Serde + Send + Sync + 'static> ReplicaChannel for PropertyChannel<T> {
    fn channel_type(&self) -> &Arc<ReplicaChannelType> {
        &self.channel_type
    }

    fn serialize(
        &self,
        writer: &mut dyn BitWrite,
        _phase: SerializationPhase,
        _timestamp: Tick,
    ) -> Result<(), ReplicaChannelError> {
        self.value.ser(writer);
        Ok(())
    }

    fn deserialize(
        &mut self,
        reader: &mut BitReader,
        phase: SerializationPhase,
        timestamp: Tick,
    ) -> Result<(), ReplicaChannelError> {
        self.value = T::de(reader)?;
        self.last_received = Some((phase, timestamp));
        Ok(())
    }

    fn copy_to_box(&self) -> Box<dyn ReplicaChannel> {
        Box::new(self.clone())
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
