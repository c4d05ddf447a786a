pub mod channel_type;
pub mod error;
pub mod property_channel;
pub mod replica_channel;
pub mod serialization_flags;
