//! # GYRE Core Engine
//!
//! Archetype storage engine for an Entity Component System:
//! - Component records packed per archetype in cyclic groups
//! - Inserts and removals move at most one block per neighbouring group
//! - Batched removal compacts each storage in a single pass
//! - Queries hand systems contiguous, equally sized slices
//!
//! ## Architecture Rules
//!
//! 1. **One arena per component type** - archetypes are sub-ranges of it
//! 2. **Archetype order is layout order** - groups never interleave
//! 3. **Positions, not pointers** - growth reallocates; only group
//!    positions survive structural operations
//!
//! ## Example
//!
//! ```rust
//! use bytemuck::{Pod, Zeroable};
//! use gyre_core::{Component, World};
//!
//! #[derive(Clone, Copy, Default, Pod, Zeroable)]
//! #[repr(C)]
//! struct Position { x: f32, y: f32 }
//! impl Component for Position {}
//!
//! #[derive(Clone, Copy, Default, Pod, Zeroable)]
//! #[repr(C)]
//! struct Velocity { dx: f32, dy: f32 }
//! impl Component for Velocity {}
//!
//! let mut world = World::new();
//! world.create_entity((Position::default(), Velocity { dx: 1.0, dy: 0.5 })).unwrap();
//!
//! world.for_each_chunk::<(Position, Velocity), _>(|size, (positions, velocities)| {
//!     for i in 0..size {
//!         positions[i].x += velocities[i].dx;
//!         positions[i].y += velocities[i].dy;
//!     }
//! }).unwrap();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod math;
pub mod memory;
pub mod sync;

pub use config::WorldConfig;
pub use ecs::{
    ArchetypeMask, Bundle, Component, ComponentTypeId, EntityId, Group, GroupView, Query,
    Schedule, System, TypeStorage, World,
};
pub use error::{EcsError, EcsResult};
pub use memory::ComponentArena;
pub use sync::RemovalQueue;
