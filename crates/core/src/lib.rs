//! `timeclock-core` — identity and error primitives for TimeClock entities.
//!
//! This crate contains **pure domain** primitives (no storage or UI concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Identified, Identity};
pub use error::{DomainError, DomainResult};
pub use id::{
    EntityId, IdGenerator, IdScheme, RandomIdGenerator, SequentialIdGenerator,
    TimeOrderedIdGenerator,
};
