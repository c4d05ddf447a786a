pub mod link;
pub mod message_channel_link;
#[allow(clippy::module_inception)]
pub mod replicator;
