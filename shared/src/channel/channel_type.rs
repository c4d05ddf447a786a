use std::borrow::Cow;

use crate::{channel::serialization_flags::SerializationFlags, stream::mode::ReplicaStreamMode};

/// Policy shared by every channel of one kind. Immutable once built, shared
/// between replicas through `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaChannelType {
    name: Cow<'static, str>,
    serialization_flags: SerializationFlags,
}

impl ReplicaChannelType {
    pub fn new(name: impl Into<Cow<'static, str>>, serialization_flags: SerializationFlags) -> Self {
        Self {
            name: name.into(),
            serialization_flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serialization_flags(&self) -> SerializationFlags {
        self.serialization_flags
    }

    pub fn participates_in(&self, mode: ReplicaStreamMode, is_emplaced: bool) -> bool {
        self.serialization_flags.participates_in(mode, is_emplaced)
    }
}
