use crate::{
    cacher::keys::{CreateContext, ReplicaType},
    replica::{
        identity::{Emplacement, ReplicaIdentity},
        replica::Replica,
    },
};

/// Application hook that turns a decoded identification record into a live
/// Replica with its channels attached.
///
/// The identity is applied to whatever replica is returned, and its
/// channels are then filled from the rest of the message. A replica only
/// reaches the registry once that has succeeded; otherwise it is handed
/// back through `release` with the identity it had when it left the
/// factory.
pub trait ReplicaFactory {
    /// Builds a fresh replica. `None` rejects the message.
    fn create(
        &mut self,
        create_context: &CreateContext,
        replica_type: &ReplicaType,
        identity: &ReplicaIdentity,
    ) -> Option<Replica>;

    /// Binds the identity to the local object found through `emplacement`.
    /// `None` means no such object exists.
    fn emplace(
        &mut self,
        create_context: &CreateContext,
        replica_type: &ReplicaType,
        identity: &ReplicaIdentity,
        emplacement: &Emplacement,
    ) -> Option<Replica>;

    /// Takes back a replica whose message was rejected after `create` or
    /// `emplace` returned it. `identity` is the decoded record the replica
    /// was requested with, so an emplaced object can be put back under
    /// `identity.emplacement`. Fresh replicas are simply dropped by default.
    fn release(&mut self, _identity: &ReplicaIdentity, _replica: Replica) {}
}
