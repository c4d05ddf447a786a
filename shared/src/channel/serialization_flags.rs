use std::fmt;

use crate::stream::mode::ReplicaStreamMode;

/// One message kind a channel type can opt into
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SerializationFlag {
    OnSpawn,
    OnCloneSpawn,
    OnCloneEmplace,
    OnForget,
    OnDestroy,
}

impl SerializationFlag {
    pub const ALL: [SerializationFlag; 5] = [
        SerializationFlag::OnSpawn,
        SerializationFlag::OnCloneSpawn,
        SerializationFlag::OnCloneEmplace,
        SerializationFlag::OnForget,
        SerializationFlag::OnDestroy,
    ];

    fn bit(self) -> u8 {
        match self {
            SerializationFlag::OnSpawn => 1 << 0,
            SerializationFlag::OnCloneSpawn => 1 << 1,
            SerializationFlag::OnCloneEmplace => 1 << 2,
            SerializationFlag::OnForget => 1 << 3,
            SerializationFlag::OnDestroy => 1 << 4,
        }
    }
}

/// Set of SerializationFlag, declaring which messages a channel type takes
/// part in
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SerializationFlags {
    bits: u8,
}

impl SerializationFlags {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        SerializationFlag::ALL.into_iter().collect()
    }

    pub fn with(mut self, flag: SerializationFlag) -> Self {
        self.insert(flag);
        self
    }

    pub fn insert(&mut self, flag: SerializationFlag) {
        self.bits |= flag.bit();
    }

    pub fn remove(&mut self, flag: SerializationFlag) {
        self.bits &= !flag.bit();
    }

    pub fn contains(&self, flag: SerializationFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SerializationFlag> + '_ {
        SerializationFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }

    pub fn on_spawn(&self) -> bool {
        self.contains(SerializationFlag::OnSpawn)
    }

    pub fn on_clone_spawn(&self) -> bool {
        self.contains(SerializationFlag::OnCloneSpawn)
    }

    pub fn on_clone_emplace(&self) -> bool {
        self.contains(SerializationFlag::OnCloneEmplace)
    }

    pub fn on_forget(&self) -> bool {
        self.contains(SerializationFlag::OnForget)
    }

    pub fn on_destroy(&self) -> bool {
        self.contains(SerializationFlag::OnDestroy)
    }

    /// Whether a channel with these flags is written in a message of the
    /// given mode. Clone picks between the two clone flags depending on
    /// whether the replica is emplaced; reverse channel messages never carry
    /// per-channel data.
    pub fn participates_in(&self, mode: ReplicaStreamMode, is_emplaced: bool) -> bool {
        match mode.required_flag(is_emplaced) {
            Some(flag) => self.contains(flag),
            None => false,
        }
    }
}

impl FromIterator<SerializationFlag> for SerializationFlags {
    fn from_iter<I: IntoIterator<Item = SerializationFlag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl fmt::Debug for SerializationFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
