//! # Entity Component System
//!
//! Archetype storage built from cyclic groups.
//!
//! ## Design Philosophy
//!
//! - One arena per component type, partitioned into one group per archetype
//! - Groups stay packed in archetype order; mutations only move later groups
//! - Entity handles are indices with generation counters
//! - Removal can be immediate or batched into a single flush per tick

mod archetype;
mod bundle;
mod component;
mod entity;
mod group;
mod identity;
mod query;
mod storage;
mod system;
mod world;

pub use archetype::{ArchetypeId, ArchetypeMask, ArchetypeTable};
pub use bundle::Bundle;
pub use component::{Component, ComponentRegistry, ComponentTypeId};
pub use entity::{
    EntityId, EntityLocation, EntityRegistry, PendingRemovals, MAX_ENTITIES,
};
pub use group::{Compaction, Group, GroupView};
pub use identity::PositionUpdate;
pub use query::Query;
pub use storage::{ComponentIter, ErasedStorage, TypeStorage};
pub use system::{Schedule, System};
pub use world::World;
