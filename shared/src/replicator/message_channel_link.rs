use std::{collections::HashMap, fmt};

use log::trace;
use replistream_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{
    protocol::Protocol,
    replica::{replica::Replica, replica_id::ReplicaId},
    replicator::link::{LinkError, ReplicatorLink},
};

type WireChannelId = UnsignedVariableInteger<7>;
type ChannelCount = UnsignedVariableInteger<3>;

/// Transport level message channel opened for a replica
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageChannelId(u16);

impl MessageChannelId {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for MessageChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for MessageChannelId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        WireChannelId::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value: u16 = WireChannelId::de(reader)?.try_to().ok_or(SerdeErr)?;
        Ok(Self(value))
    }
}

/// Link handing out a fixed number of forward and reverse message channels
/// per replica. The record on the wire is the count followed by each
/// channel id.
pub struct MessageChannelLink {
    forward_channel_count: u8,
    reverse_channel_count: u8,
    next_channel_id: u16,
    forward_channels: HashMap<ReplicaId, Vec<MessageChannelId>>,
    reverse_channels: HashMap<ReplicaId, Vec<MessageChannelId>>,
}

impl MessageChannelLink {
    pub fn new(forward_channel_count: u8, reverse_channel_count: u8) -> Self {
        Self {
            forward_channel_count,
            reverse_channel_count,
            next_channel_id: 0,
            forward_channels: HashMap::new(),
            reverse_channels: HashMap::new(),
        }
    }

    pub fn from_protocol(protocol: &Protocol) -> Self {
        Self::new(
            protocol.forward_message_channels,
            protocol.reverse_message_channels,
        )
    }

    pub fn forward_channels(&self, replica_id: &ReplicaId) -> Option<&[MessageChannelId]> {
        self.forward_channels.get(replica_id).map(Vec::as_slice)
    }

    pub fn reverse_channels(&self, replica_id: &ReplicaId) -> Option<&[MessageChannelId]> {
        self.reverse_channels.get(replica_id).map(Vec::as_slice)
    }

    fn open_channels(
        channels: &mut HashMap<ReplicaId, Vec<MessageChannelId>>,
        next_channel_id: &mut u16,
        replica_id: ReplicaId,
        count: u8,
    ) -> Result<Vec<MessageChannelId>, LinkError> {
        if let Some(opened) = channels.get(&replica_id) {
            return Ok(opened.clone());
        }

        let mut opened = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let Some(following_id) = next_channel_id.checked_add(1) else {
                return Err(LinkError::OpenRejected {
                    replica_id,
                    reason: "message channel ids exhausted".to_string(),
                });
            };
            opened.push(MessageChannelId::new(*next_channel_id));
            *next_channel_id = following_id;
        }

        channels.insert(replica_id, opened.clone());
        Ok(opened)
    }

    fn write_channel_record(writer: &mut dyn BitWrite, channels: &[MessageChannelId]) {
        ChannelCount::new(channels.len() as u64).ser(writer);
        for channel in channels {
            channel.ser(writer);
        }
    }

    fn read_channel_record(
        reader: &mut BitReader,
        replica_id: ReplicaId,
        limit: u8,
    ) -> Result<Vec<MessageChannelId>, LinkError> {
        let announced: usize = ChannelCount::de(reader)?.try_to().ok_or(SerdeErr)?;
        if announced > limit as usize {
            return Err(LinkError::ChannelLimitExceeded {
                replica_id,
                announced,
                limit: limit as usize,
            });
        }

        let mut channels = Vec::with_capacity(announced);
        for _ in 0..announced {
            channels.push(MessageChannelId::de(reader)?);
        }
        Ok(channels)
    }
}

impl ReplicatorLink for MessageChannelLink {
    fn open_and_serialize_forward_replica_channels(
        &mut self,
        writer: &mut dyn BitWrite,
        replica: &Replica,
    ) -> Result<(), LinkError> {
        let opened = Self::open_channels(
            &mut self.forward_channels,
            &mut self.next_channel_id,
            replica.id(),
            self.forward_channel_count,
        )?;
        trace!("opened forward channels {:?} for replica {}", opened, replica.id());
        Self::write_channel_record(writer, &opened);
        Ok(())
    }

    fn deserialize_and_set_forward_replica_channels(
        &mut self,
        reader: &mut BitReader,
        replica: &mut Replica,
    ) -> Result<(), LinkError> {
        let channels = Self::read_channel_record(reader, replica.id(), self.forward_channel_count)?;
        self.forward_channels.insert(replica.id(), channels);
        Ok(())
    }

    fn open_and_serialize_reverse_replica_channels(
        &mut self,
        writer: &mut dyn BitWrite,
        replica: &Replica,
    ) -> Result<(), LinkError> {
        let opened = Self::open_channels(
            &mut self.reverse_channels,
            &mut self.next_channel_id,
            replica.id(),
            self.reverse_channel_count,
        )?;
        trace!("opened reverse channels {:?} for replica {}", opened, replica.id());
        Self::write_channel_record(writer, &opened);
        Ok(())
    }

    fn deserialize_and_set_reverse_replica_channels(
        &mut self,
        reader: &mut BitReader,
        replica: &mut Replica,
    ) -> Result<(), LinkError> {
        let channels = Self::read_channel_record(reader, replica.id(), self.reverse_channel_count)?;
        self.reverse_channels.insert(replica.id(), channels);
        Ok(())
    }

    fn forget_replica(&mut self, replica_id: &ReplicaId) {
        let had_forward = self.forward_channels.remove(replica_id).is_some();
        let had_reverse = self.reverse_channels.remove(replica_id).is_some();
        if had_forward || had_reverse {
            trace!("forgot message channels of replica {}", replica_id);
        }
    }
}
