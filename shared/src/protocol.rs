use std::{borrow::Cow, sync::Arc};

use crate::{
    cacher::keys::{CreateContext, EmplaceContext, ReplicaType},
    channel::{channel_type::ReplicaChannelType, serialization_flags::SerializationFlags},
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

/// Everything two peers must agree on before they exchange replica messages.
///
/// Registration order matters: `Replicator::from_protocol` assigns cacher ids
/// in the order keys were added, so both peers must build the protocol the
/// same way.
pub struct Protocol {
    pub create_contexts: Vec<CreateContext>,
    pub replica_types: Vec<ReplicaType>,
    pub emplace_contexts: Vec<EmplaceContext>,
    channel_types: Vec<Arc<ReplicaChannelType>>,
    /// Message channels opened per replica when it is spawned or cloned
    pub forward_message_channels: u8,
    /// Message channels opened per replica for updates flowing back to the
    /// authority
    pub reverse_message_channels: u8,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            create_contexts: Vec::new(),
            replica_types: Vec::new(),
            emplace_contexts: Vec::new(),
            channel_types: Vec::new(),
            forward_message_channels: 1,
            reverse_message_channels: 1,
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    pub fn add_create_context(&mut self, create_context: impl Into<CreateContext>) -> &mut Self {
        if let Err(error) = self.try_add_create_context(create_context) {
            panic!("{}", error);
        }
        self
    }

    pub fn add_replica_type(&mut self, replica_type: impl Into<ReplicaType>) -> &mut Self {
        if let Err(error) = self.try_add_replica_type(replica_type) {
            panic!("{}", error);
        }
        self
    }

    pub fn add_emplace_context(&mut self, emplace_context: impl Into<EmplaceContext>) -> &mut Self {
        if let Err(error) = self.try_add_emplace_context(emplace_context) {
            panic!("{}", error);
        }
        self
    }

    pub fn add_channel_type(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        flags: SerializationFlags,
    ) -> &mut Self {
        if let Err(error) = self.try_add_channel_type(name, flags) {
            panic!("{}", error);
        }
        self
    }

    pub fn forward_message_channels(&mut self, count: u8) -> &mut Self {
        self.check_lock();
        self.forward_message_channels = count;
        self
    }

    pub fn reverse_message_channels(&mut self, count: u8) -> &mut Self {
        self.check_lock();
        self.reverse_message_channels = count;
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_add_create_context(
        &mut self,
        create_context: impl Into<CreateContext>,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        let create_context = create_context.into();
        if self.create_contexts.contains(&create_context) {
            return Err(ProtocolError::DuplicateCreateContext {
                name: create_context.to_string(),
            });
        }
        self.create_contexts.push(create_context);
        Ok(self)
    }

    pub fn try_add_replica_type(
        &mut self,
        replica_type: impl Into<ReplicaType>,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        let replica_type = replica_type.into();
        if self.replica_types.contains(&replica_type) {
            return Err(ProtocolError::DuplicateReplicaType {
                name: replica_type.to_string(),
            });
        }
        self.replica_types.push(replica_type);
        Ok(self)
    }

    pub fn try_add_emplace_context(
        &mut self,
        emplace_context: impl Into<EmplaceContext>,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        let emplace_context = emplace_context.into();
        if self.emplace_contexts.contains(&emplace_context) {
            return Err(ProtocolError::DuplicateEmplaceContext {
                name: emplace_context.to_string(),
            });
        }
        self.emplace_contexts.push(emplace_context);
        Ok(self)
    }

    pub fn try_add_channel_type(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        flags: SerializationFlags,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        let channel_type = ReplicaChannelType::new(name, flags);
        if self.channel_type(channel_type.name()).is_some() {
            return Err(ProtocolError::DuplicateChannelType {
                name: channel_type.name().to_string(),
            });
        }
        self.channel_types.push(Arc::new(channel_type));
        Ok(self)
    }

    pub fn try_forward_message_channels(&mut self, count: u8) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.forward_message_channels = count;
        Ok(self)
    }

    pub fn try_reverse_message_channels(&mut self, count: u8) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.reverse_message_channels = count;
        Ok(self)
    }

    // Lookup

    pub fn channel_type(&self, name: &str) -> Option<Arc<ReplicaChannelType>> {
        self.channel_types
            .iter()
            .find(|channel_type| channel_type.name() == name)
            .cloned()
    }

    pub fn channel_types(&self) -> impl Iterator<Item = &Arc<ReplicaChannelType>> {
        self.channel_types.iter()
    }

    // Locking

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
