//! # ECS World
//!
//! The owning context for one independent entity population: component
//! registry, archetype table, one type storage per component type and the
//! entity registry. Several worlds can coexist; nothing is global.
//!
//! ## Structural operations
//!
//! | Operation                  | Storage mutation        | Handle         |
//! |----------------------------|-------------------------|----------------|
//! | `create_entity`            | append to every group   | issued         |
//! | `remove_entity`            | immediate compaction    | invalidated    |
//! | `late_remove_entity`       | none until flush        | invalidated    |
//! | `flush_entity_operations`  | one batched compaction  | slots recycled |
//!
//! Queries read groups as they are: records of late-removed entities stay
//! visible until the next flush.
//!
//! Stored entity ids are what position repair reads back, so they are
//! handed out read-only: [`World::get_mut`] and queries reject
//! [`EntityId`] with [`EcsError::ReadOnlyComponent`], and
//! [`World::for_each_chunk_with_entities`] passes them as `&[EntityId]`.

use std::any::{type_name, Any};
use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::archetype::{ArchetypeId, ArchetypeMask, ArchetypeTable};
use super::bundle::Bundle;
use super::component::{Component, ComponentRegistry, ComponentTypeId};
use super::entity::{EntityId, EntityRegistry};
use super::identity::PositionUpdate;
use super::query::Query;
use super::storage::{ErasedStorage, TypeStorage};
use super::system::System;
use crate::config::WorldConfig;
use crate::error::{EcsError, EcsResult};
use crate::sync::RemovalQueue;

/// Container for all entities and their components.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use gyre_core::ecs::{Component, World};
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut world = World::new();
/// let id = world.create_entity((Health(10),)).unwrap();
/// assert_eq!(world.get::<Health>(id), Ok(&Health(10)));
///
/// world.late_remove_entity(id).unwrap();
/// world.flush_entity_operations();
/// assert!(!world.is_alive(id));
/// ```
pub struct World {
    config: WorldConfig,
    components: ComponentRegistry,
    archetypes: ArchetypeTable,
    /// Storage of the identity component; present in every archetype.
    identities: TypeStorage<EntityId>,
    /// `storages[i]` holds component type `i + 1`.
    storages: Vec<Box<dyn ErasedStorage>>,
    entities: EntityRegistry,
    removals: RemovalQueue,
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a world with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(config: WorldConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let identities = TypeStorage::new(
            ComponentTypeId::IDENTITY,
            config.initial_capacity,
            config.growth_factor,
        );
        Self {
            config,
            components: ComponentRegistry::new(),
            archetypes: ArchetypeTable::new(),
            identities,
            storages: Vec::new(),
            entities: EntityRegistry::new(),
            removals: RemovalQueue::new(),
        }
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Registry of component types known to this world.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Checks if no entity is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of distinct archetypes seen so far.
    #[inline]
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Deferred removals waiting for the next flush.
    #[inline]
    #[must_use]
    pub fn pending_removals(&self) -> usize {
        self.entities.pending_len()
    }

    /// Registers `T` and creates its storage.
    ///
    /// Happens implicitly the first time `T` is spawned; calling it up
    /// front only fixes the id order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IdSpaceExhausted`] if no id is left for `T`.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let id = self.components.register::<T>()?;
        if id != ComponentTypeId::IDENTITY && id.index() > self.storages.len() {
            self.storages.push(Box::new(TypeStorage::<T>::new(
                id,
                self.config.initial_capacity,
                self.config.growth_factor,
            )));
            debug!(component = type_name::<T>(), id = id.index(), "Registered component type");
        }
        Ok(id)
    }

    /// Id of `T`, if registered.
    #[inline]
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.components.id_of::<T>()
    }

    /// Storage of `T`, if registered.
    #[must_use]
    pub fn storage<T: Component>(&self) -> Option<&TypeStorage<T>> {
        let id = self.components.id_of::<T>()?;
        column(&self.identities, &self.storages, id)
    }

    pub(crate) fn storage_mut<T: Component>(&mut self) -> Option<&mut TypeStorage<T>> {
        let id = self.components.id_of::<T>()?;
        column_mut(&mut self.storages, id)
    }

    /// Creates an entity from a tuple of initial component values.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateComponent`] if a type appears twice in the
    ///   bundle (the entity id counts as a member)
    /// - [`EcsError::IdSpaceExhausted`] if no entity, archetype or component
    ///   id is left
    pub fn create_entity<B: Bundle>(&mut self, bundle: B) -> EcsResult<EntityId> {
        let (archetype, mask) = self.archetype_for::<B>()?;
        let id = self.entities.allocate(archetype)?;
        let position = self.identities.add_components(&mask, &[id]);
        bundle.insert(self, &mask)?;
        self.entities.set_position(id, position);
        trace!(index = id.index(), position, "Created entity");
        Ok(id)
    }

    /// Creates an entity with default-valued components.
    ///
    /// # Errors
    ///
    /// Same as [`create_entity`](Self::create_entity).
    pub fn create_entity_default<B: Bundle + Default>(&mut self) -> EcsResult<EntityId> {
        self.create_entity(B::default())
    }

    /// Creates many entities of one archetype.
    ///
    /// Each type storage receives the whole batch in a single append, so
    /// later groups are rolled once instead of once per entity.
    ///
    /// # Errors
    ///
    /// Same as [`create_entity`](Self::create_entity).
    pub fn create_entities<B, I>(&mut self, bundles: I) -> EcsResult<Vec<EntityId>>
    where
        B: Bundle,
        I: IntoIterator<Item = B>,
    {
        let (archetype, mask) = self.archetype_for::<B>()?;
        let bundles: Vec<B> = bundles.into_iter().collect();
        if bundles.is_empty() {
            return Ok(Vec::new());
        }

        let ids = bundles
            .iter()
            .map(|_| self.entities.allocate(archetype))
            .collect::<EcsResult<Vec<EntityId>>>()?;
        let first = self.identities.add_components(&mask, &ids);
        B::insert_batch(&bundles, self, &mask)?;
        for (offset, &id) in ids.iter().enumerate() {
            self.entities.set_position(id, first + offset);
        }
        debug!(count = ids.len(), archetype = ?mask.types(), "Created entity batch");
        Ok(ids)
    }

    /// Removes an entity and compacts its groups right away.
    ///
    /// Entities of the same archetype stored after it move down one
    /// position; their recorded positions are repaired before returning.
    /// The slot is recycled at the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn remove_entity(&mut self, id: EntityId) -> EcsResult<()> {
        let location = self.entities.release(id)?;
        let Some(mask) = self.archetypes.mask(location.archetype) else {
            return Err(EcsError::stale(id));
        };

        for &component in mask.types() {
            if let Some(storage) = erased_mut(&mut self.storages, component) {
                storage.remove_component(location.position, mask);
            }
        }
        let updates = self.identities.remove_tracked(location.position, mask);
        apply_updates(&mut self.entities, &updates);

        debug!(
            index = id.index(),
            position = location.position,
            repaired = updates.len(),
            "Removed entity"
        );
        Ok(())
    }

    /// Invalidates an entity now and removes its records at the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live,
    /// including when it is already queued.
    pub fn late_remove_entity(&mut self, id: EntityId) -> EcsResult<()> {
        self.entities.defer_release(id)
    }

    /// Applies every deferred removal in one batched pass.
    ///
    /// Drains the [`RemovalQueue`] first, skipping handles that are no
    /// longer live. Each touched type storage compacts once; freed slots
    /// become reusable afterwards. Calling it again with nothing queued
    /// does nothing.
    ///
    /// Returns the number of entities removed.
    pub fn flush_entity_operations(&mut self) -> usize {
        for id in self.removals.drain() {
            if let Err(err) = self.entities.defer_release(id) {
                trace!(%err, "Skipping queued removal");
            }
        }

        let pending = self.entities.take_pending(&self.archetypes);
        if !pending.is_empty() {
            for component in pending.touched() {
                if let Some(storage) = erased_mut(&mut self.storages, component) {
                    let freed = storage.remove_components(&pending);
                    trace!(
                        component = storage.type_name(),
                        freed,
                        remaining = storage.len(),
                        "Compacted type storage"
                    );
                }
            }
            let updates = self.identities.remove_tracked_batch(&pending);
            apply_updates(&mut self.entities, &updates);

            debug!(
                removed = pending.len(),
                repaired = updates.len(),
                "Flushed entity operations"
            );
        }
        self.entities.recycle_retired();
        pending.len()
    }

    /// Handle other threads can use to request deferred removals.
    #[must_use]
    pub fn removal_queue(&self) -> RemovalQueue {
        self.removals.clone()
    }

    /// Checks if `id` is a live handle.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    /// Component types of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn archetype_of(&self, id: EntityId) -> EcsResult<&ArchetypeMask> {
        let location = self.entities.location(id)?;
        self.archetypes
            .mask(location.archetype)
            .ok_or_else(|| EcsError::stale(id))
    }

    /// Current group position of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn position_of(&self, id: EntityId) -> EcsResult<usize> {
        self.entities.location(id).map(|location| location.position)
    }

    /// Checks if a live entity carries `T`.
    #[must_use]
    pub fn contains<T: Component>(&self, id: EntityId) -> bool {
        match (self.archetype_of(id), self.components.id_of::<T>()) {
            (Ok(mask), Some(component)) => mask.contains(component),
            _ => false,
        }
    }

    /// Reads one component of a live entity.
    ///
    /// # Errors
    ///
    /// - [`EcsError::StaleEntity`] if the handle is not live
    /// - [`EcsError::UnregisteredComponent`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity does not carry `T`
    pub fn get<T: Component>(&self, id: EntityId) -> EcsResult<&T> {
        let location = self.entities.location(id)?;
        let mask = self
            .archetypes
            .mask(location.archetype)
            .ok_or_else(|| EcsError::stale(id))?;
        let storage = self
            .storage::<T>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))?;
        storage
            .get(mask, location.position)
            .ok_or(EcsError::MissingComponent(type_name::<T>()))
    }

    /// Mutable access to one component of a live entity.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus [`EcsError::ReadOnlyComponent`]
    /// when `T` is [`EntityId`].
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> EcsResult<&mut T> {
        let location = self.entities.location(id)?;
        let mask = self
            .archetypes
            .mask(location.archetype)
            .ok_or_else(|| EcsError::stale(id))?;
        let component = self
            .components
            .id_of::<T>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))?;
        if component == ComponentTypeId::IDENTITY {
            return Err(EcsError::ReadOnlyComponent(type_name::<T>()));
        }
        column_mut::<T>(&mut self.storages, component)
            .and_then(|storage| storage.get_mut(mask, location.position))
            .ok_or(EcsError::MissingComponent(type_name::<T>()))
    }

    /// Walks every chunk of every archetype containing all types of `Q`.
    ///
    /// `f` receives the chunk length and one mutable slice per queried
    /// type. Types that were never registered match nothing.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ReadOnlyComponent`] if `Q` lists [`EntityId`]
    /// - [`EcsError::DuplicateComponent`] if `Q` lists a type twice
    /// - [`EcsError::GroupSizeMismatch`] if storages disagree on a group
    pub fn for_each_chunk<Q, F>(&mut self, mut f: F) -> EcsResult<()>
    where
        Q: Query,
        F: for<'a> FnMut(usize, Q::Chunk<'a>),
    {
        self.for_each_chunk_with_entities::<Q, _>(|size, _, chunk| f(size, chunk))
    }

    /// Like [`for_each_chunk`](Self::for_each_chunk), with the ids of the
    /// chunk's entities as a read-only slice.
    ///
    /// # Errors
    ///
    /// Same as [`for_each_chunk`](Self::for_each_chunk).
    pub fn for_each_chunk_with_entities<Q, F>(&mut self, f: F) -> EcsResult<()>
    where
        Q: Query,
        F: for<'a> FnMut(usize, &'a [EntityId], Q::Chunk<'a>),
    {
        let Some(ids) = Q::component_ids(&self.components) else {
            return Ok(());
        };
        if ids.contains(&ComponentTypeId::IDENTITY) {
            return Err(EcsError::ReadOnlyComponent(type_name::<EntityId>()));
        }
        if let Some(duplicate) = first_duplicate(&ids) {
            return Err(EcsError::DuplicateComponent(duplicate));
        }
        let combination = ArchetypeMask::new(ids.iter().copied());
        let max_chunk = self.config.effective_chunk_size();
        let columns = claim_columns(&mut self.storages, &ids);
        Q::for_each_chunk(columns, &self.identities, &combination, max_chunk, f)
    }

    /// Runs one system over its query.
    ///
    /// # Errors
    ///
    /// Same as [`for_each_chunk`](Self::for_each_chunk).
    pub fn run_system<S: System>(&mut self, system: &mut S, delta_time: f64) -> EcsResult<()> {
        self.for_each_chunk::<S::Query, _>(|size, chunk| system.update(delta_time, size, chunk))
    }

    /// Resolves (and interns) the archetype of bundle type `B`.
    fn archetype_for<B: Bundle>(&mut self) -> EcsResult<(ArchetypeId, ArchetypeMask)> {
        let mut ids = B::component_ids(self)?;
        ids.push(ComponentTypeId::IDENTITY);
        if let Some(duplicate) = first_duplicate(&ids) {
            return Err(EcsError::DuplicateComponent(duplicate));
        }
        let mask = ArchetypeMask::new(ids);
        let (archetype, created) = self.archetypes.intern(mask.clone())?;
        if created {
            debug!(archetype = ?mask.types(), "Registered archetype");
        }
        Ok((archetype, mask))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn first_duplicate(ids: &[ComponentTypeId]) -> Option<ComponentTypeId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().find(|&id| !seen.insert(id))
}

fn apply_updates(entities: &mut EntityRegistry, updates: &[PositionUpdate]) {
    for update in updates {
        entities.relocate(update.entity.index(), update.position);
    }
}

fn erased_mut(
    storages: &mut [Box<dyn ErasedStorage>],
    component: ComponentTypeId,
) -> Option<&mut Box<dyn ErasedStorage>> {
    let storage = storages.get_mut(component.index().checked_sub(1)?)?;
    debug_assert_eq!(storage.component(), component);
    Some(storage)
}

/// Hands out one disjoint mutable storage per requested id, in order.
///
/// The identity storage is never handed out.
fn claim_columns<'s>(
    storages: &'s mut [Box<dyn ErasedStorage>],
    ids: &[ComponentTypeId],
) -> Vec<Option<&'s mut dyn Any>> {
    let mut columns: Vec<Option<&'s mut dyn Any>> = ids.iter().map(|_| None).collect();
    for (index, storage) in storages.iter_mut().enumerate() {
        if let Some(slot) = ids.iter().position(|id| id.index() == index + 1) {
            columns[slot] = Some(storage.as_any_mut());
        }
    }
    columns
}

fn column<'s, T: Component>(
    identities: &'s TypeStorage<EntityId>,
    storages: &'s [Box<dyn ErasedStorage>],
    component: ComponentTypeId,
) -> Option<&'s TypeStorage<T>> {
    let column: &dyn Any = match component.index().checked_sub(1) {
        None => identities,
        Some(index) => storages.get(index)?.as_any(),
    };
    column.downcast_ref()
}

fn column_mut<T: Component>(
    storages: &mut [Box<dyn ErasedStorage>],
    component: ComponentTypeId,
) -> Option<&mut TypeStorage<T>> {
    storages
        .get_mut(component.index().checked_sub(1)?)?
        .as_any_mut()
        .downcast_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    impl Component for Velocity {}

    fn pos(x: f32) -> Position {
        Position { x, y: 0.0 }
    }

    #[test]
    fn test_create_and_get() {
        let mut world = World::new();
        let id = world.create_entity((pos(1.0), Velocity { dx: 2.0, dy: 0.0 })).unwrap();

        assert_eq!(world.len(), 1);
        assert_eq!(world.get::<Position>(id), Ok(&pos(1.0)));
        assert_eq!(world.get::<Velocity>(id).unwrap().dx, 2.0);
        assert_eq!(world.get::<EntityId>(id), Ok(&id));
        assert!(world.contains::<Velocity>(id));
    }

    #[test]
    fn test_get_errors() {
        let mut world = World::new();
        let id = world.create_entity((pos(1.0),)).unwrap();

        assert!(matches!(
            world.get::<Velocity>(id),
            Err(EcsError::UnregisteredComponent(_))
        ));
        world.register::<Velocity>().unwrap();
        assert!(matches!(world.get::<Velocity>(id), Err(EcsError::MissingComponent(_))));
        assert!(!world.contains::<Velocity>(id));
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut world = World::new();
        let id = world.create_entity((pos(1.0),)).unwrap();
        world.get_mut::<Position>(id).unwrap().x = 9.0;
        assert_eq!(world.get::<Position>(id).unwrap().x, 9.0);
    }

    #[test]
    fn test_duplicate_bundle_rejected() {
        let mut world = World::new();
        let err = world.create_entity((pos(1.0), pos(2.0))).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent(_)));

        let err = world.create_entity((EntityId::NULL,)).unwrap_err();
        assert_eq!(err, EcsError::DuplicateComponent(ComponentTypeId::IDENTITY));
    }

    #[test]
    fn test_remove_entity_repairs_positions() {
        let mut world = World::new();
        let ids: Vec<_> = (0..4).map(|i| world.create_entity((pos(i as f32),)).unwrap()).collect();

        world.remove_entity(ids[1]).unwrap();
        assert!(!world.is_alive(ids[1]));
        assert_eq!(world.remove_entity(ids[1]), Err(EcsError::stale(ids[1])));

        for (expected, &id) in [0, 2, 3].iter().zip([ids[0], ids[2], ids[3]].iter()) {
            assert_eq!(world.get::<Position>(id).unwrap().x, *expected as f32);
        }
        assert_eq!(world.position_of(ids[3]), Ok(2));
    }

    #[test]
    fn test_late_remove_waits_for_flush() {
        let mut world = World::new();
        let ids: Vec<_> = (0..3).map(|i| world.create_entity((pos(i as f32),)).unwrap()).collect();

        world.late_remove_entity(ids[0]).unwrap();
        assert!(!world.is_alive(ids[0]));
        assert_eq!(world.pending_removals(), 1);
        assert_eq!(world.storage::<Position>().unwrap().len(), 3);

        assert_eq!(world.flush_entity_operations(), 1);
        assert_eq!(world.storage::<Position>().unwrap().len(), 2);
        assert_eq!(world.get::<Position>(ids[2]).unwrap().x, 2.0);
        assert_eq!(world.flush_entity_operations(), 0);
    }

    #[test]
    fn test_slot_recycled_after_flush() {
        let mut world = World::new();
        let a = world.create_entity((pos(0.0),)).unwrap();
        world.remove_entity(a).unwrap();

        let b = world.create_entity((pos(1.0),)).unwrap();
        assert_ne!(a.index(), b.index());

        world.flush_entity_operations();
        let c = world.create_entity((pos(2.0),)).unwrap();
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
        assert!(world.get::<Position>(a).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WorldConfig {
            growth_factor: 0.5,
            ..WorldConfig::default()
        };
        assert!(World::with_config(config).is_err());
    }

    #[test]
    fn test_query_with_entity_ids() {
        let mut world = World::new();
        let ids = world
            .create_entities((0..3).map(|i| (pos(i as f32), Velocity::default())))
            .unwrap();
        world.create_entity((pos(9.0),)).unwrap();

        let mut seen = Vec::new();
        world
            .for_each_chunk_with_entities::<(Position, Velocity), _>(|size, entities, (positions, _)| {
                assert_eq!(entities.len(), size);
                seen.extend(entities.iter().zip(positions.iter()).map(|(e, p)| (*e, p.x)));
            })
            .unwrap();
        assert_eq!(seen, vec![(ids[0], 0.0), (ids[1], 1.0), (ids[2], 2.0)]);
    }

    #[test]
    fn test_entity_ids_are_read_only() {
        let mut world = World::new();
        let ids: Vec<_> = (0..3).map(|i| world.create_entity((pos(i as f32),)).unwrap()).collect();

        assert_eq!(
            world.get_mut::<EntityId>(ids[0]),
            Err(EcsError::ReadOnlyComponent(type_name::<EntityId>()))
        );
        let result = world.for_each_chunk::<(EntityId,), _>(|_, (entities,)| entities.fill(EntityId::NULL));
        assert_eq!(result, Err(EcsError::ReadOnlyComponent(type_name::<EntityId>())));
        let result = world.for_each_chunk::<(Position, EntityId), _>(|_, _| {});
        assert!(matches!(result, Err(EcsError::ReadOnlyComponent(_))));

        // Stored ids are intact, so removal still repairs positions
        world.remove_entity(ids[0]).unwrap();
        assert_eq!(world.position_of(ids[2]), Ok(1));
        assert_eq!(world.get::<Position>(ids[2]), Ok(&pos(2.0)));
        assert_eq!(world.get::<EntityId>(ids[2]), Ok(&ids[2]));
    }

    #[test]
    fn test_duplicate_query_rejected() {
        let mut world = World::new();
        world.create_entity((pos(0.0),)).unwrap();
        let result = world.for_each_chunk::<(Position, Position), _>(|_, _| {});
        assert!(matches!(result, Err(EcsError::DuplicateComponent(_))));
    }
}
