use replistream_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::channel::{replica_channel::SerializationPhase, serialization_flags::SerializationFlag};

/// The five kinds of replica message. Each one fixes which identification
/// fields are on the wire and which channels are serialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReplicaStreamMode {
    /// Create a fresh replica on the peer
    Spawn,
    /// Bring a late joining peer up to date with a replica that may already
    /// exist on its side
    Clone,
    /// The peer should stop tracking the replica
    Forget,
    /// The replica is gone for good
    Destroy,
    /// Updates flowing against the default authority direction
    ReverseReplicaChannels,
}

impl ReplicaStreamMode {
    pub const ALL: [ReplicaStreamMode; 5] = [
        ReplicaStreamMode::Spawn,
        ReplicaStreamMode::Clone,
        ReplicaStreamMode::Forget,
        ReplicaStreamMode::Destroy,
        ReplicaStreamMode::ReverseReplicaChannels,
    ];

    /// Spawn and Clone messages start with the creation info record
    pub fn carries_creation_info(&self) -> bool {
        matches!(self, ReplicaStreamMode::Spawn | ReplicaStreamMode::Clone)
    }

    /// Whether identification continues past the replica id. Every other
    /// mode addresses an object both sides already know.
    pub fn carries_construction_data(&self) -> bool {
        matches!(self, ReplicaStreamMode::Spawn | ReplicaStreamMode::Clone)
    }

    /// Only Clone transmits the emplaced flag; in Spawn it is implicitly false
    pub fn transmits_emplacement_flag(&self) -> bool {
        matches!(self, ReplicaStreamMode::Clone)
    }

    /// Forget and Destroy end the replica's life on this connection
    pub fn ends_replica(&self) -> bool {
        matches!(self, ReplicaStreamMode::Forget | ReplicaStreamMode::Destroy)
    }

    pub fn is_cloned(&self) -> bool {
        matches!(self, ReplicaStreamMode::Clone)
    }

    /// `None` for reverse channel messages, which skip the per channel pass
    pub fn phase(&self) -> Option<SerializationPhase> {
        match self {
            ReplicaStreamMode::Spawn | ReplicaStreamMode::Clone => {
                Some(SerializationPhase::Initialization)
            }
            ReplicaStreamMode::Forget | ReplicaStreamMode::Destroy => {
                Some(SerializationPhase::Uninitialization)
            }
            ReplicaStreamMode::ReverseReplicaChannels => None,
        }
    }

    /// The flag a channel type must carry to be serialized in this mode
    pub fn required_flag(&self, is_emplaced: bool) -> Option<SerializationFlag> {
        match self {
            ReplicaStreamMode::Spawn => Some(SerializationFlag::OnSpawn),
            ReplicaStreamMode::Clone => {
                if is_emplaced {
                    Some(SerializationFlag::OnCloneEmplace)
                } else {
                    Some(SerializationFlag::OnCloneSpawn)
                }
            }
            ReplicaStreamMode::Forget => Some(SerializationFlag::OnForget),
            ReplicaStreamMode::Destroy => Some(SerializationFlag::OnDestroy),
            ReplicaStreamMode::ReverseReplicaChannels => None,
        }
    }

    fn index(&self) -> u8 {
        match self {
            ReplicaStreamMode::Spawn => 0,
            ReplicaStreamMode::Clone => 1,
            ReplicaStreamMode::Forget => 2,
            ReplicaStreamMode::Destroy => 3,
            ReplicaStreamMode::ReverseReplicaChannels => 4,
        }
    }
}

type ModeIndex = UnsignedInteger<3>;

impl Serde for ReplicaStreamMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ModeIndex::new(self.index()).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match ModeIndex::de(reader)?.get() {
            0 => Ok(ReplicaStreamMode::Spawn),
            1 => Ok(ReplicaStreamMode::Clone),
            2 => Ok(ReplicaStreamMode::Forget),
            3 => Ok(ReplicaStreamMode::Destroy),
            4 => Ok(ReplicaStreamMode::ReverseReplicaChannels),
            // a peer can put any 3 bit value here
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for ReplicaStreamMode {
    fn const_bit_length() -> u32 {
        <ModeIndex as ConstBitLength>::const_bit_length()
    }
}
