//! # Replistream Shared
//! The replica stream: writes and reads the messages that create, clone,
//! forget and destroy networked objects, and carry their channel state.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use replistream_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
    SerdeIntegerConversion, SignedInteger, SignedVariableInteger, UnsignedInteger,
    UnsignedVariableInteger,
};

mod cacher;
mod channel;
mod protocol;
mod replica;
mod replicator;
mod stream;
mod types;

pub use cacher::{
    cacher_id::CacherId,
    error::CacherError,
    item_cacher::ItemCacher,
    keys::{CreateContext, EmplaceContext, ReplicaType},
    CreateContextCacher, EmplaceContextCacher, ReplicaTypeCacher,
};
pub use channel::{
    channel_type::ReplicaChannelType,
    error::ReplicaChannelError,
    property_channel::PropertyChannel,
    replica_channel::{ReplicaChannel, SerializationPhase},
    serialization_flags::{SerializationFlag, SerializationFlags},
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use replica::{
    factory::ReplicaFactory,
    identity::{Emplacement, ReplicaIdentity},
    registry::ReplicaRegistry,
    replica::Replica,
    replica_id::{EmplaceId, ReplicaId},
};
pub use replicator::{
    link::{LinkError, ReplicatorLink},
    message_channel_link::{MessageChannelId, MessageChannelLink},
    replicator::Replicator,
};
pub use stream::{
    error::{ReplicaReadError, ReplicaWriteError},
    message::{read_replica_message, write_replica_message, ReplicaMessageEvent},
    mode::ReplicaStreamMode,
    reader::ReplicaStreamReader,
    writer::ReplicaStreamWriter,
};
pub use types::Tick;
