use std::fmt;

use crate::{
    cacher::keys::{CreateContext, ReplicaType},
    channel::replica_channel::ReplicaChannel,
    replica::{
        identity::{Emplacement, ReplicaIdentity},
        replica_id::ReplicaId,
    },
};

/// One networked object instance: its identity on the wire plus the channels
/// holding its replicated state.
///
/// A replica is either emplaced (bound to an object that already existed
/// locally) or freshly spawned, never both, which is why the emplacement is
/// a single `Option`. Channels are owned exclusively by their replica and
/// are found by channel type name; their order only decides the order they
/// appear in on the wire.
pub struct Replica {
    id: ReplicaId,
    create_context: CreateContext,
    replica_type: ReplicaType,
    is_cloned: bool,
    emplacement: Option<Emplacement>,
    uses_reverse_replica_channels: bool,
    channels: Vec<Box<dyn ReplicaChannel>>,
}

impl Replica {
    pub fn new(
        id: ReplicaId,
        create_context: impl Into<CreateContext>,
        replica_type: impl Into<ReplicaType>,
    ) -> Self {
        Self {
            id,
            create_context: create_context.into(),
            replica_type: replica_type.into(),
            is_cloned: false,
            emplacement: None,
            uses_reverse_replica_channels: false,
            channels: Vec::new(),
        }
    }

    /// Builds the local counterpart of a replica that was identified on the
    /// wire, taking id, clone state and emplacement from the identity
    pub fn from_identity(
        identity: &ReplicaIdentity,
        create_context: impl Into<CreateContext>,
        replica_type: impl Into<ReplicaType>,
    ) -> Self {
        let mut replica = Self::new(identity.replica_id, create_context, replica_type);
        replica.apply_identity(identity);
        replica
    }

    pub fn with_emplacement(mut self, emplacement: Emplacement) -> Self {
        self.emplacement = Some(emplacement);
        self
    }

    pub fn with_reverse_replica_channels(mut self) -> Self {
        self.uses_reverse_replica_channels = true;
        self
    }

    pub fn with_channel<C: ReplicaChannel>(mut self, channel: C) -> Self {
        self.add_channel(Box::new(channel));
        self
    }

    pub fn add_channel(&mut self, channel: Box<dyn ReplicaChannel>) {
        self.channels.push(channel);
    }

    /// The identification state this replica currently carries
    pub fn identity(&self) -> ReplicaIdentity {
        ReplicaIdentity {
            replica_id: self.id,
            is_cloned: self.is_cloned,
            emplacement: self.emplacement.clone(),
        }
    }

    pub(crate) fn apply_identity(&mut self, identity: &ReplicaIdentity) {
        self.id = identity.replica_id;
        self.is_cloned = identity.is_cloned;
        self.emplacement = identity.emplacement.clone();
    }

    pub(crate) fn replace_channel(&mut self, index: usize, channel: Box<dyn ReplicaChannel>) {
        self.channels[index] = channel;
    }

    // Accessors

    pub fn id(&self) -> ReplicaId {
        self.id
    }

    pub fn create_context(&self) -> &CreateContext {
        &self.create_context
    }

    pub fn replica_type(&self) -> &ReplicaType {
        &self.replica_type
    }

    /// True if this replica's state arrived in a Clone message
    pub fn is_cloned(&self) -> bool {
        self.is_cloned
    }

    pub fn is_emplaced(&self) -> bool {
        self.emplacement.is_some()
    }

    pub fn emplacement(&self) -> Option<&Emplacement> {
        self.emplacement.as_ref()
    }

    pub fn uses_reverse_replica_channels(&self) -> bool {
        self.uses_reverse_replica_channels
    }

    pub fn channels(&self) -> impl Iterator<Item = &dyn ReplicaChannel> {
        self.channels.iter().map(|channel| channel.as_ref())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn channel_at(&self, index: usize) -> &dyn ReplicaChannel {
        self.channels[index].as_ref()
    }

    pub fn channel(&self, name: &str) -> Option<&dyn ReplicaChannel> {
        self.channels()
            .find(|channel| channel.channel_type().name() == name)
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut dyn ReplicaChannel> {
        for channel in self.channels.iter_mut() {
            if channel.channel_type().name() == name {
                return Some(channel.as_mut());
            }
        }
        None
    }

    /// Looks up a channel by name and downcasts it to its concrete type
    pub fn channel_as<C: ReplicaChannel>(&self, name: &str) -> Option<&C> {
        self.channel(name)?.to_any().downcast_ref::<C>()
    }

    pub fn channel_as_mut<C: ReplicaChannel>(&mut self, name: &str) -> Option<&mut C> {
        self.channel_mut(name)?.to_any_mut().downcast_mut::<C>()
    }
}

impl fmt::Debug for Replica {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replica")
            .field("id", &self.id)
            .field("create_context", &self.create_context)
            .field("replica_type", &self.replica_type)
            .field("is_cloned", &self.is_cloned)
            .field("emplacement", &self.emplacement)
            .field(
                "channels",
                &self
                    .channels()
                    .map(|channel| channel.channel_type().name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
