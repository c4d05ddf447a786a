use log::debug;

use crate::{
    cacher::{CreateContextCacher, EmplaceContextCacher, ReplicaTypeCacher},
    protocol::Protocol,
};

/// Per-connection replication state: the three id cachers that compress
/// keys on the wire. One Replicator exists per peer connection.
pub struct Replicator {
    create_context_cacher: CreateContextCacher,
    replica_type_cacher: ReplicaTypeCacher,
    emplace_context_cacher: EmplaceContextCacher,
}

impl Replicator {
    pub fn new() -> Self {
        Self {
            create_context_cacher: CreateContextCacher::new(),
            replica_type_cacher: ReplicaTypeCacher::new(),
            emplace_context_cacher: EmplaceContextCacher::new(),
        }
    }

    /// Seeds every cacher with the keys registered in `protocol`, in
    /// registration order. Two peers built from the same protocol end up
    /// with identical tables.
    pub fn from_protocol(protocol: &Protocol) -> Self {
        let mut replicator = Self::new();
        for create_context in &protocol.create_contexts {
            replicator.create_context_cacher.map_item(create_context.clone());
        }
        for replica_type in &protocol.replica_types {
            replicator.replica_type_cacher.map_item(replica_type.clone());
        }
        for emplace_context in &protocol.emplace_contexts {
            replicator.emplace_context_cacher.map_item(emplace_context.clone());
        }
        debug!(
            "Replicator seeded with {} create contexts, {} replica types, {} emplace contexts",
            replicator.create_context_cacher.len(),
            replicator.replica_type_cacher.len(),
            replicator.emplace_context_cacher.len(),
        );
        replicator
    }

    pub fn create_context_cacher(&self) -> &CreateContextCacher {
        &self.create_context_cacher
    }

    pub fn replica_type_cacher(&self) -> &ReplicaTypeCacher {
        &self.replica_type_cacher
    }

    pub fn emplace_context_cacher(&self) -> &EmplaceContextCacher {
        &self.emplace_context_cacher
    }

    // Mutable access is for the id negotiation only, ReplicaStream borrows
    // the Replicator immutably.

    pub fn create_context_cacher_mut(&mut self) -> &mut CreateContextCacher {
        &mut self.create_context_cacher
    }

    pub fn replica_type_cacher_mut(&mut self) -> &mut ReplicaTypeCacher {
        &mut self.replica_type_cacher
    }

    pub fn emplace_context_cacher_mut(&mut self) -> &mut EmplaceContextCacher {
        &mut self.emplace_context_cacher
    }
}

impl Default for Replicator {
    fn default() -> Self {
        Self::new()
    }
}
