use thiserror::Error;

/// Errors raised while growing an ItemCacher. These come from the id
/// negotiation between peers, never from ReplicaStream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacherError {
    /// Id 0 is the unmapped sentinel
    #[error("Cacher id 0 is reserved as the unmapped sentinel and can't be assigned to {item}")]
    ZeroId { item: String },

    /// The id already refers to another item
    #[error("Cacher id {id} is already mapped to {existing}, can't remap it to {item}")]
    IdAlreadyMapped {
        id: u16,
        existing: String,
        item: String,
    },

    /// The item already has another id
    #[error("Item {item} is already mapped to cacher id {existing_id}, can't map it to {id}")]
    ItemAlreadyMapped {
        item: String,
        existing_id: u16,
        id: u16,
    },

    /// Every non-zero id is taken
    #[error("Cacher id space exhausted, can't map {item}")]
    IdSpaceExhausted { item: String },
}
