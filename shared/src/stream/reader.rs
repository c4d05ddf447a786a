use log::{trace, warn};
use replistream_serde::{BitReader, Serde};

use crate::{
    cacher::{
        cacher_id::CacherId,
        keys::{CreateContext, ReplicaType},
    },
    channel::replica_channel::{ReplicaChannel, SerializationPhase},
    replica::{
        identity::{Emplacement, ReplicaIdentity},
        replica::Replica,
        replica_id::{EmplaceId, ReplicaId},
    },
    replicator::{link::ReplicatorLink, replicator::Replicator},
    stream::{error::ReplicaReadError, mode::ReplicaStreamMode},
    types::Tick,
};

/// Read half of a replica stream. Every method here consumes untrusted
/// bytes, so failures are returned and never panic.
pub struct ReplicaStreamReader<'s, 'b> {
    replicator: &'s Replicator,
    link: &'s mut dyn ReplicatorLink,
    reader: &'s mut BitReader<'b>,
    mode: ReplicaStreamMode,
    timestamp: Tick,
}

impl<'s, 'b> ReplicaStreamReader<'s, 'b> {
    pub fn new(
        replicator: &'s Replicator,
        link: &'s mut dyn ReplicatorLink,
        reader: &'s mut BitReader<'b>,
        mode: ReplicaStreamMode,
        timestamp: Tick,
    ) -> Self {
        Self {
            replicator,
            link,
            reader,
            mode,
            timestamp,
        }
    }

    pub fn mode(&self) -> ReplicaStreamMode {
        self.mode
    }

    pub fn timestamp(&self) -> Tick {
        self.timestamp
    }

    pub fn read_creation_info(&mut self) -> Result<(CreateContext, ReplicaType), ReplicaReadError> {
        let create_context_id = CacherId::de(self.reader)?;
        let replica_type_id = CacherId::de(self.reader)?;

        let Some(create_context) = self
            .replicator
            .create_context_cacher()
            .mapped_id_item(create_context_id)
        else {
            warn!("received unmapped create context id {}", create_context_id);
            return Err(ReplicaReadError::UnknownCreateContextId {
                id: create_context_id.value(),
            });
        };
        let Some(replica_type) = self
            .replicator
            .replica_type_cacher()
            .mapped_id_item(replica_type_id)
        else {
            warn!("received unmapped replica type id {}", replica_type_id);
            return Err(ReplicaReadError::UnknownReplicaTypeId {
                id: replica_type_id.value(),
            });
        };

        Ok((create_context.clone(), replica_type.clone()))
    }

    /// `Ok(None)` when the peer wrote the absent marker
    pub fn read_identification_info(&mut self) -> Result<Option<ReplicaIdentity>, ReplicaReadError> {
        let is_absent = bool::de(self.reader)?;
        if is_absent {
            return Ok(None);
        }

        let replica_id = ReplicaId::de(self.reader)?.ok_or(ReplicaReadError::ZeroReplicaId)?;

        let mut emplacement = None;
        if self.mode.transmits_emplacement_flag() {
            let is_emplaced = bool::de(self.reader)?;
            if is_emplaced {
                emplacement = Some(self.read_emplacement(replica_id)?);
            }
        }

        Ok(Some(ReplicaIdentity {
            replica_id,
            is_cloned: self.mode.is_cloned(),
            emplacement,
        }))
    }

    fn read_emplacement(&mut self, replica_id: ReplicaId) -> Result<Emplacement, ReplicaReadError> {
        let context_id = CacherId::de(self.reader)?;
        let emplace_id =
            EmplaceId::de(self.reader)?.ok_or(ReplicaReadError::ZeroEmplaceId { replica_id })?;

        let Some(context) = self
            .replicator
            .emplace_context_cacher()
            .mapped_id_item(context_id)
        else {
            warn!("received unmapped emplace context id {}", context_id);
            return Err(ReplicaReadError::UnknownEmplaceContextId {
                replica_id,
                id: context_id.value(),
            });
        };

        Ok(Emplacement::new(context.clone(), emplace_id))
    }

    /// Reads the message channels and channel payloads written by the peer's
    /// `write_channel_data`.
    ///
    /// Channel payloads are decoded into copies first and only swapped into
    /// `replica` once every one of them succeeded. The message channel
    /// record is handed to the link before the payloads are read, so a
    /// caller rejecting the replica afterwards must call
    /// `ReplicatorLink::forget_replica`, as `read_replica_message` does.
    pub fn read_channel_data(&mut self, replica: &mut Replica) -> Result<(), ReplicaReadError> {
        let Some(phase) = self.mode.phase() else {
            if !replica.uses_reverse_replica_channels() {
                warn!(
                    "received reverse replica channels for replica {}, which does not use them",
                    replica.id()
                );
                return Err(ReplicaReadError::ReverseChannelsNotDeclared {
                    replica_id: replica.id(),
                });
            }
            self.link
                .deserialize_and_set_reverse_replica_channels(self.reader, replica)?;
            return Ok(());
        };

        if self.mode.carries_construction_data() {
            self.link
                .deserialize_and_set_forward_replica_channels(self.reader, replica)?;
        }

        let staged = self.stage_channels(replica, phase)?;
        for (index, channel) in staged {
            replica.replace_channel(index, channel);
        }

        Ok(())
    }

    fn stage_channels(
        &mut self,
        replica: &Replica,
        phase: SerializationPhase,
    ) -> Result<Vec<(usize, Box<dyn ReplicaChannel>)>, ReplicaReadError> {
        let is_emplaced = replica.is_emplaced();
        let mut staged = Vec::new();

        for index in 0..replica.channel_count() {
            let channel = replica.channel_at(index);
            let channel_type = channel.channel_type();
            if !channel_type.participates_in(self.mode, is_emplaced) {
                trace!(
                    "skipping channel {} of replica {} in {:?}",
                    channel_type.name(),
                    replica.id(),
                    self.mode
                );
                continue;
            }

            let mut copy = channel.copy_to_box();
            copy.deserialize(self.reader, phase, self.timestamp)
                .map_err(|source| ReplicaReadError::Channel {
                    channel: channel_type.name().to_string(),
                    source,
                })?;
            staged.push((index, copy));
        }

        Ok(staged)
    }
}
