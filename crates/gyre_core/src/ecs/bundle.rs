//! # Component Bundles
//!
//! A bundle is the set of initial component values of a new entity,
//! written as a tuple: `(Position::new(..), Velocity::default())`.

use std::any::type_name;

use super::archetype::ArchetypeMask;
use super::component::{Component, ComponentTypeId};
use super::world::World;
use crate::error::{EcsError, EcsResult};

/// A tuple of up to eight components that can spawn an entity.
pub trait Bundle: Sized + Send + Sync + 'static {
    /// Registers every member type and returns their ids in tuple order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IdSpaceExhausted`] if a new type cannot be
    /// issued an id.
    fn component_ids(world: &mut World) -> EcsResult<Vec<ComponentTypeId>>;

    /// Appends one entity's records to the groups of `mask`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if a member type has no
    /// storage in `world`.
    fn insert(self, world: &mut World, mask: &ArchetypeMask) -> EcsResult<()>;

    /// Appends a batch, one `add_components` call per member type.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    fn insert_batch(batch: &[Self], world: &mut World, mask: &ArchetypeMask) -> EcsResult<()>;
}

fn push<T: Component>(world: &mut World, mask: &ArchetypeMask, records: &[T]) -> EcsResult<()> {
    let storage = world
        .storage_mut::<T>()
        .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))?;
    storage.add_components(mask, records);
    Ok(())
}

impl Bundle for () {
    fn component_ids(_world: &mut World) -> EcsResult<Vec<ComponentTypeId>> {
        Ok(Vec::new())
    }

    fn insert(self, _world: &mut World, _mask: &ArchetypeMask) -> EcsResult<()> {
        Ok(())
    }

    fn insert_batch(_batch: &[Self], _world: &mut World, _mask: &ArchetypeMask) -> EcsResult<()> {
        Ok(())
    }
}

macro_rules! impl_bundle {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            fn component_ids(world: &mut World) -> EcsResult<Vec<ComponentTypeId>> {
                Ok(vec![$(world.register::<$name>()?),+])
            }

            fn insert(self, world: &mut World, mask: &ArchetypeMask) -> EcsResult<()> {
                $(push::<$name>(world, mask, &[self.$idx])?;)+
                Ok(())
            }

            fn insert_batch(batch: &[Self], world: &mut World, mask: &ArchetypeMask) -> EcsResult<()> {
                $(
                    let column: Vec<$name> = batch.iter().map(|bundle| bundle.$idx).collect();
                    push::<$name>(world, mask, &column)?;
                )+
                Ok(())
            }
        }
    };
}

impl_bundle!(A: 0);
impl_bundle!(A: 0, B: 1);
impl_bundle!(A: 0, B: 1, C: 2);
impl_bundle!(A: 0, B: 1, C: 2, D: 3);
impl_bundle!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_bundle!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_bundle!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_bundle!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
