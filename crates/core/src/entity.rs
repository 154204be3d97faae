//! Entity identity: assigned once at construction, fixed for the entity's lifetime.

use uuid::Uuid;

use crate::error::DomainResult;
use crate::id::{EntityId, IdGenerator, RandomIdGenerator};

/// Identity embedded in every domain entity.
///
/// There is no setter: once an `Identity` exists its id never changes.
/// Construction either yields a valid identity or an error, never a
/// half-built value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    id: EntityId,
}

impl Identity {
    /// Fresh identity from a random (v4) UUID.
    pub fn generate() -> Self {
        Self::generate_with(&RandomIdGenerator)
    }

    /// Fresh identity from an injected generator.
    pub fn generate_with<G>(generator: &G) -> Self
    where
        G: IdGenerator + ?Sized,
    {
        let id = generator.next_id();
        tracing::debug!(%id, "generated entity identity");
        Self { id }
    }

    /// Identity from an explicit id, e.g. when reconstructing from storage.
    ///
    /// Fails with `InvalidArgument` when `uuid` is `None` or nil.
    pub fn try_from_uuid(uuid: Option<Uuid>) -> DomainResult<Self> {
        let id = EntityId::from_option(uuid)?;
        Ok(Self { id })
    }

    /// Identity from the textual form of an id.
    ///
    /// Fails with `InvalidArgument` when `s` is empty, blank, malformed or nil.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let id = s.parse::<EntityId>()?;
        Ok(Self { id })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

impl From<EntityId> for Identity {
    fn from(id: EntityId) -> Self {
        Self { id }
    }
}

/// Capability of carrying an entity identity.
///
/// Implementors delegate to an embedded [`Identity`].
pub trait Identified {
    fn identity(&self) -> &Identity;

    /// Returns the entity identifier.
    fn id(&self) -> EntityId {
        self.identity().id()
    }

    /// Whether `other` is the same entity, regardless of mutable state.
    fn same_entity<O>(&self, other: &O) -> bool
    where
        O: Identified + ?Sized,
    {
        self.id() == other.id()
    }
}

impl Identified for Identity {
    fn identity(&self) -> &Identity {
        self
    }
}
