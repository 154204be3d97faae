//! Validated entity identifiers and the generators that mint them.

use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// A 128-bit identifier that is never the absence-of-value sentinel.
///
/// The nil UUID is treated as "no id", same as `None` or an empty string.
/// No version check is made beyond that.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Uuid", into = "Uuid")]
pub struct EntityId(Uuid);

impl EntityId {
    /// Adopt `uuid` as an identifier, rejecting the nil UUID.
    pub fn try_new(uuid: Uuid) -> DomainResult<Self> {
        if uuid.is_nil() {
            tracing::warn!("rejected nil entity id");
            return Err(DomainError::invalid_argument("entity id must not be nil"));
        }
        Ok(Self(uuid))
    }

    /// Adopt an optional explicit id. `None` is rejected.
    pub fn from_option(uuid: Option<Uuid>) -> DomainResult<Self> {
        match uuid {
            Some(uuid) => Self::try_new(uuid),
            None => {
                tracing::warn!("rejected missing entity id");
                Err(DomainError::invalid_argument("entity id must not be null"))
            }
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Uuid> for EntityId {
    type Error = DomainError;

    fn try_from(value: Uuid) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<EntityId> for Uuid {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            tracing::warn!("rejected empty entity id");
            return Err(DomainError::invalid_argument("entity id must not be empty"));
        }
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_argument(format!("entity id: {e}")))?;
        Self::try_new(uuid)
    }
}

/// Source of fresh identifiers.
///
/// Uniqueness is probabilistic for the UUID-based generators: nothing checks
/// a new id against ids already in use.
pub trait IdGenerator: Send + Sync {
    /// Mint a new identifier. Never returns the nil UUID.
    fn next_id(&self) -> EntityId;
}

impl<G> IdGenerator for &G
where
    G: IdGenerator + ?Sized,
{
    fn next_id(&self) -> EntityId {
        (**self).next_id()
    }
}

impl<G> IdGenerator for Box<G>
where
    G: IdGenerator + ?Sized,
{
    fn next_id(&self) -> EntityId {
        (**self).next_id()
    }
}

/// Random (UUIDv4) identifiers. The default.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> EntityId {
        // v4 sets version bits, so the result is never nil.
        EntityId(Uuid::new_v4())
    }
}

/// Time-ordered (UUIDv7) identifiers; sort roughly by creation time.
#[derive(Debug, Default, Copy, Clone)]
pub struct TimeOrderedIdGenerator;

impl IdGenerator for TimeOrderedIdGenerator {
    fn next_id(&self) -> EntityId {
        EntityId(Uuid::now_v7())
    }
}

/// Deterministic counter-backed identifiers for tests and replays.
///
/// Ids are `prefix` in the high 64 bits and a counter starting at 1 in the
/// low 64 bits.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: u64,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: u64) -> Self {
        Self {
            prefix,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EntityId {
        // Wrapping past u64::MAX would only yield nil with a zero prefix; skip it.
        let mut n = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if n == 0 && self.prefix == 0 {
            n = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        }
        EntityId(Uuid::from_u64_pair(self.prefix, n))
    }
}

/// Which generator new entities draw their ids from.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdScheme {
    #[default]
    Random,
    TimeOrdered,
}

impl IdScheme {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdScheme::Random => Box::new(RandomIdGenerator),
            IdScheme::TimeOrdered => Box::new(TimeOrderedIdGenerator),
        }
    }
}

impl FromStr for IdScheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(IdScheme::Random),
            "time-ordered" => Ok(IdScheme::TimeOrdered),
            other => Err(DomainError::invalid_argument(format!(
                "unknown id scheme: {other}"
            ))),
        }
    }
}
