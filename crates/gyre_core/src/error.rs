//! # Storage Error Types
//!
//! All recoverable errors raised by the storage engine.
//!
//! Capacity exhaustion is not an error: type storages grow silently.
//! A query for a type combination nobody owns yields an empty result.

use thiserror::Error;

use crate::ecs::{ComponentTypeId, EntityId};

/// Errors that can occur while manipulating a world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The handle was removed, recycled or never issued by this world.
    #[error("stale entity handle: index {index}, generation {generation}")]
    StaleEntity {
        /// Slot index of the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
    },

    /// The same component type appears twice in a bundle or query.
    #[error("component type {0:?} listed more than once")]
    DuplicateComponent(ComponentTypeId),

    /// A component type was used before any storage existed for it.
    #[error("component type `{0}` is not registered")]
    UnregisteredComponent(&'static str),

    /// The entity does not carry the requested component type.
    #[error("entity does not have component `{0}`")]
    MissingComponent(&'static str),

    /// Two component groups of one archetype disagree on their size.
    #[error("group size mismatch inside one archetype: {expected} vs {found}")]
    GroupSizeMismatch {
        /// Size of the first queried type's group.
        expected: usize,
        /// Size found in another queried type's group.
        found: usize,
    },

    /// The component type cannot be handed out mutably.
    ///
    /// Entity ids are read back to repair positions after compaction, so
    /// they are only ever exposed read-only.
    #[error("component `{0}` is read-only")]
    ReadOnlyComponent(&'static str),

    /// Every id of a 32-bit id space has been issued.
    #[error("{0} id space exhausted")]
    IdSpaceExhausted(&'static str),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    /// Builds a [`EcsError::StaleEntity`] from a handle.
    #[inline]
    #[must_use]
    pub fn stale(id: EntityId) -> Self {
        Self::StaleEntity {
            index: id.index(),
            generation: id.generation(),
        }
    }
}

/// Result type for storage operations.
pub type EcsResult<T> = Result<T, EcsError>;
