pub mod cacher_id;
pub mod error;
pub mod item_cacher;
pub mod keys;

pub type CreateContextCacher = item_cacher::ItemCacher<keys::CreateContext>;
pub type ReplicaTypeCacher = item_cacher::ItemCacher<keys::ReplicaType>;
pub type EmplaceContextCacher = item_cacher::ItemCacher<keys::EmplaceContext>;
