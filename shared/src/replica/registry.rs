use std::collections::HashMap;

use crate::replica::{replica::Replica, replica_id::ReplicaId};

/// Receive side store of the replicas a peer currently has alive
#[derive(Default)]
pub struct ReplicaRegistry {
    replicas: HashMap<ReplicaId, Replica>,
}

impl ReplicaRegistry {
    pub fn new() -> Self {
        Self {
            replicas: HashMap::new(),
        }
    }

    pub fn contains(&self, replica_id: &ReplicaId) -> bool {
        self.replicas.contains_key(replica_id)
    }

    pub fn get(&self, replica_id: &ReplicaId) -> Option<&Replica> {
        self.replicas.get(replica_id)
    }

    pub fn get_mut(&mut self, replica_id: &ReplicaId) -> Option<&mut Replica> {
        self.replicas.get_mut(replica_id)
    }

    /// Stores the replica under its own id, returning whatever was stored
    /// there before
    pub fn insert(&mut self, replica: Replica) -> Option<Replica> {
        self.replicas.insert(replica.id(), replica)
    }

    pub fn remove(&mut self, replica_id: &ReplicaId) -> Option<Replica> {
        self.replicas.remove(replica_id)
    }

    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ReplicaId> {
        self.replicas.keys()
    }
}
