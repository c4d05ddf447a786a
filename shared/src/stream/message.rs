use log::{debug, warn};
use replistream_serde::{BitReader, BitWrite, Serde};

use crate::{
    replica::{
        factory::ReplicaFactory, registry::ReplicaRegistry, replica::Replica,
        replica_id::ReplicaId,
    },
    replicator::{link::ReplicatorLink, replicator::Replicator},
    stream::{
        error::{ReplicaReadError, ReplicaWriteError},
        mode::ReplicaStreamMode,
        reader::ReplicaStreamReader,
        writer::ReplicaStreamWriter,
    },
    types::Tick,
};

/// What a successfully read replica message did to the registry
#[derive(Debug)]
pub enum ReplicaMessageEvent {
    /// The message named no replica
    Absent,
    Spawned(ReplicaId),
    /// Cloned into a freshly created replica
    Cloned(ReplicaId),
    /// Cloned onto an object that already existed locally
    Emplaced(ReplicaId),
    /// Removed from the registry, handed back with its final channel state
    Forgotten(Replica),
    Destroyed(Replica),
    ReverseChannelsUpdated(ReplicaId),
}

/// Writes a complete replica message: the mode, a flag telling whether
/// creation info follows, the creation info itself, the identification
/// record and, when a replica is given, its channel data.
///
/// On error the bits already written are not rolled back and the message
/// must be discarded. After a successful Forget or Destroy the link drops
/// the replica's message channels.
pub fn write_replica_message(
    writer: &mut dyn BitWrite,
    replicator: &Replicator,
    link: &mut dyn ReplicatorLink,
    mode: ReplicaStreamMode,
    timestamp: Tick,
    replica: Option<&Replica>,
) -> Result<(), ReplicaWriteError> {
    let has_creation_info = mode.carries_creation_info() && replica.is_some();

    mode.ser(writer);
    has_creation_info.ser(writer);

    let mut stream = ReplicaStreamWriter::new(replicator, link, writer, mode, timestamp);

    if let Some(replica) = replica {
        if has_creation_info {
            stream.try_write_creation_info(replica.create_context(), replica.replica_type())?;
        }
    }

    stream.try_write_identification_info(replica)?;

    if let Some(replica) = replica {
        stream.try_write_channel_data(replica)?;
        if mode.ends_replica() {
            link.forget_replica(&replica.id());
        }
    }

    Ok(())
}

/// Reads one message written by `write_replica_message` and applies it to
/// `registry`.
///
/// Nothing changes in the registry unless the whole message decoded: new
/// replicas are inserted last and Forget/Destroy only remove a replica
/// once its final channel data has been read. A Spawn or Clone that fails
/// after the factory produced its replica hands that replica back through
/// `ReplicaFactory::release` and drops any message channels the link
/// recorded for it.
pub fn read_replica_message(
    reader: &mut BitReader,
    replicator: &Replicator,
    link: &mut dyn ReplicatorLink,
    timestamp: Tick,
    registry: &mut ReplicaRegistry,
    factory: &mut dyn ReplicaFactory,
) -> Result<ReplicaMessageEvent, ReplicaReadError> {
    let result = read_message(reader, replicator, link, timestamp, registry, factory);
    if let Err(error) = &result {
        warn!("dropping replica message: {}", error);
    }
    result
}

fn read_message(
    reader: &mut BitReader,
    replicator: &Replicator,
    link: &mut dyn ReplicatorLink,
    timestamp: Tick,
    registry: &mut ReplicaRegistry,
    factory: &mut dyn ReplicaFactory,
) -> Result<ReplicaMessageEvent, ReplicaReadError> {
    let mode = ReplicaStreamMode::de(reader)?;
    let has_creation_info = bool::de(reader)?;
    if has_creation_info && !mode.carries_creation_info() {
        return Err(ReplicaReadError::CreationInfoMismatch { mode });
    }

    let mut stream = ReplicaStreamReader::new(replicator, link, reader, mode, timestamp);

    let creation_info = if has_creation_info {
        Some(stream.read_creation_info()?)
    } else {
        None
    };

    let Some(identity) = stream.read_identification_info()? else {
        if creation_info.is_some() {
            return Err(ReplicaReadError::CreationInfoMismatch { mode });
        }
        return Ok(ReplicaMessageEvent::Absent);
    };
    let replica_id = identity.replica_id;

    match mode {
        ReplicaStreamMode::Spawn | ReplicaStreamMode::Clone => {
            let Some((create_context, replica_type)) = creation_info else {
                return Err(ReplicaReadError::CreationInfoMismatch { mode });
            };
            if registry.contains(&replica_id) {
                return Err(ReplicaReadError::DuplicateReplica { replica_id });
            }

            let mut replica = match &identity.emplacement {
                None => factory
                    .create(&create_context, &replica_type, &identity)
                    .ok_or_else(|| ReplicaReadError::FactoryRejected {
                        replica_id,
                        replica_type: replica_type.to_string(),
                    })?,
                Some(emplacement) => factory
                    .emplace(&create_context, &replica_type, &identity, emplacement)
                    .ok_or_else(|| ReplicaReadError::EmplaceTargetMissing {
                        replica_id,
                        context: emplacement.context.to_string(),
                        emplace_id: emplacement.id,
                    })?,
            };
            let local_identity = replica.identity();
            replica.apply_identity(&identity);

            if let Err(error) = stream.read_channel_data(&mut replica) {
                link.forget_replica(&replica_id);
                replica.apply_identity(&local_identity);
                factory.release(&identity, replica);
                return Err(error);
            }
            registry.insert(replica);

            let event = match (mode, identity.is_emplaced()) {
                (ReplicaStreamMode::Spawn, _) => ReplicaMessageEvent::Spawned(replica_id),
                (_, true) => ReplicaMessageEvent::Emplaced(replica_id),
                (_, false) => ReplicaMessageEvent::Cloned(replica_id),
            };
            debug!("replica {} of type {} read as {:?}", replica_id, replica_type, event);
            Ok(event)
        }
        ReplicaStreamMode::Forget | ReplicaStreamMode::Destroy => {
            let Some(replica) = registry.get_mut(&replica_id) else {
                return Err(ReplicaReadError::UnknownReplica { replica_id, mode });
            };
            stream.read_channel_data(replica)?;

            let Some(replica) = registry.remove(&replica_id) else {
                return Err(ReplicaReadError::UnknownReplica { replica_id, mode });
            };
            link.forget_replica(&replica_id);
            debug!("replica {} removed by {:?}", replica_id, mode);
            if mode == ReplicaStreamMode::Forget {
                Ok(ReplicaMessageEvent::Forgotten(replica))
            } else {
                Ok(ReplicaMessageEvent::Destroyed(replica))
            }
        }
        ReplicaStreamMode::ReverseReplicaChannels => {
            let Some(replica) = registry.get_mut(&replica_id) else {
                return Err(ReplicaReadError::UnknownReplica { replica_id, mode });
            };
            stream.read_channel_data(replica)?;
            Ok(ReplicaMessageEvent::ReverseChannelsUpdated(replica_id))
        }
    }
}
