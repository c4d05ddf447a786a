use std::{collections::HashMap, fmt::Debug, hash::Hash};

use crate::cacher::{cacher_id::CacherId, error::CacherError};

/// Bidirectional key <-> id table scoped to one connection.
///
/// Ids start at 1 and are never handed to a second key, there is no way to
/// unmap an entry. The stream engine only ever reads a cacher; entries are
/// added by whichever negotiation runs before a message depending on them is
/// decoded.
pub struct ItemCacher<K: Clone + Eq + Hash + Debug> {
    item_to_id: HashMap<K, CacherId>,
    id_to_item: HashMap<CacherId, K>,
    next_id: u32,
}

impl<K: Clone + Eq + Hash + Debug> ItemCacher<K> {
    pub fn new() -> Self {
        Self {
            item_to_id: HashMap::new(),
            id_to_item: HashMap::new(),
            next_id: 1,
        }
    }

    // Reading

    pub fn is_item_mapped(&self, item: &K) -> bool {
        self.item_to_id.contains_key(item)
    }

    pub fn mapped_item_id(&self, item: &K) -> Option<CacherId> {
        self.item_to_id.get(item).copied()
    }

    pub fn is_id_mapped(&self, id: CacherId) -> bool {
        self.id_to_item.contains_key(&id)
    }

    pub fn mapped_id_item(&self, id: CacherId) -> Option<&K> {
        self.id_to_item.get(&id)
    }

    pub fn len(&self) -> usize {
        self.item_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_to_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CacherId, &K)> {
        self.id_to_item.iter().map(|(id, item)| (*id, item))
    }

    // Growing

    /// Assigns the next free id to `item`, or returns the id it already has.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    /// Consider using `try_map_item` for non-panicking error handling.
    pub fn map_item(&mut self, item: K) -> CacherId {
        self.try_map_item(item)
            .expect("map_item called on exhausted ItemCacher")
    }

    pub fn try_map_item(&mut self, item: K) -> Result<CacherId, CacherError> {
        if let Some(id) = self.mapped_item_id(&item) {
            return Ok(id);
        }

        // skip ids the peer announced through `insert_mapping`
        loop {
            let Ok(raw_id) = u16::try_from(self.next_id) else {
                return Err(CacherError::IdSpaceExhausted {
                    item: format!("{:?}", item),
                });
            };
            self.next_id += 1;

            let id = CacherId::new(raw_id);
            if !self.id_to_item.contains_key(&id) {
                self.insert_unchecked(id, item);
                return Ok(id);
            }
        }
    }

    /// Records a mapping chosen by the peer.
    ///
    /// # Panics
    ///
    /// Panics if the id is zero or conflicts with an existing mapping.
    /// Consider using `try_insert_mapping` for non-panicking error handling.
    pub fn insert_mapping(&mut self, id: CacherId, item: K) {
        if let Err(error) = self.try_insert_mapping(id, item) {
            panic!("{}", error);
        }
    }

    /// Records a mapping chosen by the peer. Re-announcing an identical
    /// mapping is accepted.
    pub fn try_insert_mapping(&mut self, id: CacherId, item: K) -> Result<(), CacherError> {
        if id.is_unmapped() {
            return Err(CacherError::ZeroId {
                item: format!("{:?}", item),
            });
        }

        if let Some(existing) = self.id_to_item.get(&id) {
            if *existing == item {
                return Ok(());
            }
            return Err(CacherError::IdAlreadyMapped {
                id: id.value(),
                existing: format!("{:?}", existing),
                item: format!("{:?}", item),
            });
        }

        if let Some(existing_id) = self.item_to_id.get(&item) {
            return Err(CacherError::ItemAlreadyMapped {
                item: format!("{:?}", item),
                existing_id: existing_id.value(),
                id: id.value(),
            });
        }

        self.insert_unchecked(id, item);
        Ok(())
    }

    fn insert_unchecked(&mut self, id: CacherId, item: K) {
        self.item_to_id.insert(item.clone(), id);
        self.id_to_item.insert(id, item);
    }
}

impl<K: Clone + Eq + Hash + Debug> Default for ItemCacher<K> {
    fn default() -> Self {
        Self::new()
    }
}
