//! # Systems
//!
//! A system is per-chunk update logic bound to one [`Query`]. The world
//! feeds it `(delta_time, size, slices...)` once per contiguous chunk of
//! every matching archetype.

use tracing::trace;

use super::query::Query;
use super::world::World;
use crate::error::EcsResult;

/// Update logic over one query.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use gyre_core::ecs::{Component, System};
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position(f32);
/// impl Component for Position {}
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Velocity(f32);
/// impl Component for Velocity {}
///
/// struct Movement;
///
/// impl System for Movement {
///     type Query = (Position, Velocity);
///
///     fn update(&mut self, delta_time: f64, size: usize, (positions, velocities): (&mut [Position], &mut [Velocity])) {
///         for i in 0..size {
///             positions[i].0 += velocities[i].0 * delta_time as f32;
///         }
///     }
/// }
/// ```
pub trait System: Send {
    /// Component types the system reads and writes.
    type Query: Query;

    /// Processes one chunk of `size` records per queried type.
    fn update(&mut self, delta_time: f64, size: usize, chunk: <Self::Query as Query>::Chunk<'_>);
}

/// Object-safe form of [`System`], used by [`Schedule`].
trait ScheduledSystem: Send {
    fn run(&mut self, world: &mut World, delta_time: f64) -> EcsResult<()>;

    fn name(&self) -> &'static str;
}

impl<S: System> ScheduledSystem for S {
    fn run(&mut self, world: &mut World, delta_time: f64) -> EcsResult<()> {
        world.run_system(self, delta_time)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

/// Ordered list of systems run once per tick.
#[derive(Default)]
pub struct Schedule {
    systems: Vec<Box<dyn ScheduledSystem>>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system; systems run in insertion order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Number of systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Checks if the schedule has no systems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Runs every system once.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first system error.
    pub fn run(&mut self, world: &mut World, delta_time: f64) -> EcsResult<()> {
        for system in &mut self.systems {
            trace!(system = system.name(), "Running system");
            system.run(world, delta_time)?;
        }
        Ok(())
    }
}
