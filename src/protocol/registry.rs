//! Message registry and dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::{Error, Frame, Message, MessageDef, Result};

/// Read-only table of message definitions, keyed by id
///
/// Built once from the schema, then shared (typically behind an `Arc`) by
/// every encoder and decoder. Lookups take no locks.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_id: HashMap<u32, Arc<MessageDef>>,
    by_name: HashMap<String, u32>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a set of definitions
    pub fn from_defs(defs: impl IntoIterator<Item = MessageDef>) -> Result<Self> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Add a definition
    ///
    /// # Errors
    ///
    /// Rejects a second definition for an id or name already present.
    pub fn register(&mut self, def: MessageDef) -> Result<()> {
        let id = def.id();
        if self.by_id.contains_key(&id) {
            return Err(Error::DuplicateMessage { id });
        }
        if self.by_name.contains_key(def.name()) {
            return Err(Error::InvalidDefinition {
                message: def.name().to_owned(),
                reason: "name already registered".into(),
            });
        }
        self.by_name.insert(def.name().to_owned(), id);
        self.by_id.insert(id, Arc::new(def));
        Ok(())
    }

    /// Merge another registry into this one (e.g. a dialect that includes another)
    pub fn extend(&mut self, other: &Self) -> Result<()> {
        let mut defs: Vec<_> = other.by_id.values().collect();
        defs.sort_by_key(|def| def.id());
        for def in defs {
            self.register(MessageDef::clone(def))?;
        }
        Ok(())
    }

    /// Definition for an id
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Arc<MessageDef>> {
        self.by_id.get(&id)
    }

    /// Definition by message name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<MessageDef>> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    /// CRC extra byte for an id
    #[must_use]
    pub fn crc_extra(&self, id: u32) -> Option<u8> {
        self.by_id.get(&id).map(|def| def.crc_extra())
    }

    /// Full (MAVLink 2, untrimmed) payload length for an id
    #[must_use]
    pub fn payload_length(&self, id: u32) -> Option<usize> {
        self.by_id.get(&id).map(|def| def.wire_length())
    }

    /// Base-field (MAVLink 1) payload length for an id
    #[must_use]
    pub fn min_payload_length(&self, id: u32) -> Option<usize> {
        self.by_id.get(&id).map(|def| def.base_wire_length())
    }

    /// Create a default-valued message by name
    pub fn message(&self, name: &str) -> Result<Message> {
        self.by_name(name)
            .map(|def| Message::new(Arc::clone(def)))
            .ok_or_else(|| Error::InvalidDefinition {
                message: name.to_owned(),
                reason: "no such message registered".into(),
            })
    }

    /// Select the definition for a frame's id and unpack its payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMessageId`] for ids outside this registry.
    /// These are routine on buses that carry several dialects.
    pub fn dispatch(&self, frame: &Frame) -> Result<Message> {
        let def = self.by_id.get(&frame.message_id()).ok_or(Error::UnknownMessageId {
            id: frame.message_id(),
        })?;
        Message::unpack(Arc::clone(def), frame)
    }

    /// Number of registered messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registered ids in ascending order
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
