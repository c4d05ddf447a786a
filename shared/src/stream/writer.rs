use log::trace;
use replistream_serde::{BitWrite, Serde};

use crate::{
    cacher::keys::{CreateContext, ReplicaType},
    replica::replica::Replica,
    replicator::{link::ReplicatorLink, replicator::Replicator},
    stream::{error::ReplicaWriteError, mode::ReplicaStreamMode},
    types::Tick,
};

/// Write half of a replica stream, alive for the length of one message.
///
/// The Replicator is only borrowed immutably: if a key isn't mapped yet the
/// write fails instead of assigning an id the peer has never heard of.
pub struct ReplicaStreamWriter<'s> {
    replicator: &'s Replicator,
    link: &'s mut dyn ReplicatorLink,
    writer: &'s mut dyn BitWrite,
    mode: ReplicaStreamMode,
    timestamp: Tick,
}

impl<'s> ReplicaStreamWriter<'s> {
    pub fn new(
        replicator: &'s Replicator,
        link: &'s mut dyn ReplicatorLink,
        writer: &'s mut dyn BitWrite,
        mode: ReplicaStreamMode,
        timestamp: Tick,
    ) -> Self {
        Self {
            replicator,
            link,
            writer,
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

    /// Writes the create context id followed by the replica type id.
    ///
    /// # Panics
    ///
    /// Panics if either key is not mapped in the Replicator.
    /// Consider using `try_write_creation_info` for non-panicking error handling.
    pub fn write_creation_info(&mut self, create_context: &CreateContext, replica_type: &ReplicaType) {
        if let Err(error) = self.try_write_creation_info(create_context, replica_type) {
            panic!("{}", error);
        }
    }

    /// Nothing is written unless both keys resolve.
    pub fn try_write_creation_info(
        &mut self,
        create_context: &CreateContext,
        replica_type: &ReplicaType,
    ) -> Result<(), ReplicaWriteError> {
        let create_context_id = self
            .replicator
            .create_context_cacher()
            .mapped_item_id(create_context)
            .ok_or_else(|| ReplicaWriteError::UnmappedCreateContext {
                name: create_context.to_string(),
            })?;
        let replica_type_id = self
            .replicator
            .replica_type_cacher()
            .mapped_item_id(replica_type)
            .ok_or_else(|| ReplicaWriteError::UnmappedReplicaType {
                name: replica_type.to_string(),
            })?;

        create_context_id.ser(self.writer);
        replica_type_id.ser(self.writer);
        Ok(())
    }

    /// Writes the identification record of `replica`, or the absent marker
    /// for `None`.
    ///
    /// # Panics
    ///
    /// Panics if a Spawn message is given an emplaced replica, or if a
    /// Clone message is given a replica whose emplace context is unmapped.
    /// Consider using `try_write_identification_info` for non-panicking error handling.
    pub fn write_identification_info(&mut self, replica: Option<&Replica>) {
        if let Err(error) = self.try_write_identification_info(replica) {
            panic!("{}", error);
        }
    }

    pub fn try_write_identification_info(
        &mut self,
        replica: Option<&Replica>,
    ) -> Result<(), ReplicaWriteError> {
        let Some(replica) = replica else {
            // is_absent
            true.ser(self.writer);
            return Ok(());
        };

        if self.mode == ReplicaStreamMode::Spawn && replica.is_emplaced() {
            return Err(ReplicaWriteError::EmplacedSpawn {
                replica_id: replica.id(),
            });
        }

        // resolve before writing so a failure leaves no partial record
        let mut emplacement_ids = None;
        if self.mode.transmits_emplacement_flag() {
            if let Some(emplacement) = replica.emplacement() {
                let context_id = self
                    .replicator
                    .emplace_context_cacher()
                    .mapped_item_id(&emplacement.context)
                    .ok_or_else(|| ReplicaWriteError::UnmappedEmplaceContext {
                        name: emplacement.context.to_string(),
                    })?;
                emplacement_ids = Some((context_id, emplacement.id));
            }
        }

        false.ser(self.writer);
        replica.id().ser(self.writer);

        if self.mode.transmits_emplacement_flag() {
            emplacement_ids.is_some().ser(self.writer);
            if let Some((context_id, emplace_id)) = emplacement_ids {
                context_id.ser(self.writer);
                emplace_id.ser(self.writer);
            }
        }

        Ok(())
    }

    /// Writes the link's message channels and the payload of every channel
    /// taking part in this mode.
    ///
    /// # Panics
    ///
    /// Panics if a channel or the link fails, or if reverse channels are
    /// written for a replica that doesn't use them.
    /// Consider using `try_write_channel_data` for non-panicking error handling.
    pub fn write_channel_data(&mut self, replica: &Replica) {
        if let Err(error) = self.try_write_channel_data(replica) {
            panic!("{}", error);
        }
    }

    /// Stops at the first channel that fails.
    pub fn try_write_channel_data(&mut self, replica: &Replica) -> Result<(), ReplicaWriteError> {
        let Some(phase) = self.mode.phase() else {
            if !replica.uses_reverse_replica_channels() {
                return Err(ReplicaWriteError::ReverseChannelsNotDeclared {
                    replica_id: replica.id(),
                });
            }
            self.link
                .open_and_serialize_reverse_replica_channels(self.writer, replica)?;
            return Ok(());
        };

        if self.mode.carries_construction_data() {
            self.link
                .open_and_serialize_forward_replica_channels(self.writer, replica)?;
        }

        let is_emplaced = replica.is_emplaced();
        for channel in replica.channels() {
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

            channel
                .serialize(self.writer, phase, self.timestamp)
                .map_err(|source| ReplicaWriteError::Channel {
                    channel: channel_type.name().to_string(),
                    source,
                })?;
        }

        Ok(())
    }
}
