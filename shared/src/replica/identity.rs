use crate::{cacher::keys::EmplaceContext, replica::replica_id::{EmplaceId, ReplicaId}};

/// Where an emplaced replica's pre-existing local object is found
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Emplacement {
    pub context: EmplaceContext,
    pub id: EmplaceId,
}

impl Emplacement {
    pub fn new(context: impl Into<EmplaceContext>, id: EmplaceId) -> Self {
        Self {
            context: context.into(),
            id,
        }
    }
}

/// Identification record of one replica as it was decoded off the wire
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaIdentity {
    pub replica_id: ReplicaId,
    /// Set from the stream mode, never transmitted
    pub is_cloned: bool,
    pub emplacement: Option<Emplacement>,
}

impl ReplicaIdentity {
    pub fn is_emplaced(&self) -> bool {
        self.emplacement.is_some()
    }
}
