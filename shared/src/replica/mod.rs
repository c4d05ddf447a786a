pub mod factory;
pub mod identity;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod replica;
pub mod replica_id;
