/// Timestamp attached to a replica message, forwarded untouched to every
/// channel that is serialized in it
pub type Tick = u16;
