//! # Type Storage
//!
//! One storage per component type. It owns a single arena and partitions
//! it into [`Group`]s, one per archetype containing the type, laid out back
//! to back in [`ArchetypeMask`] order:
//!
//! ```text
//! Position arena:
//! [ {E,P,V,X} ][ {E,P,V} ][ {E,P} ][ free ... ]
//! ```
//!
//! Inserting into `{E,P,V}` rolls `{E,P}` clockwise by the batch size (at
//! most one copy per moved slot); removing rolls it back. Groups before the
//! mutated one are never touched.
//!
//! A combination registry maps every subset of an archetype (always
//! including this storage's own type) to the archetypes containing it, so a
//! query for `{P,V}` is a single lookup.

use std::any::{type_name, Any};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use tracing::{debug, trace};

use super::archetype::ArchetypeMask;
use super::component::{Component, ComponentTypeId};
use super::entity::PendingRemovals;
use super::group::{Group, GroupView};
use crate::math;
use crate::memory::ComponentArena;

/// Storage for one component type, partitioned by archetype.
pub struct TypeStorage<T> {
    component: ComponentTypeId,
    arena: ComponentArena<T>,
    /// Live records across all groups; also the end of the last group.
    used: usize,
    growth_factor: f32,
    groups: BTreeMap<ArchetypeMask, Group>,
    /// Combination -> archetypes containing it.
    registry: HashMap<ArchetypeMask, BTreeSet<ArchetypeMask>>,
}

impl<T: Component> TypeStorage<T> {
    /// Creates an empty storage.
    ///
    /// # Arguments
    ///
    /// * `component` - Id of `T` in the owning world
    /// * `capacity` - Slots reserved up front
    /// * `growth_factor` - Capacity multiplier applied on growth
    #[must_use]
    pub fn new(component: ComponentTypeId, capacity: usize, growth_factor: f32) -> Self {
        Self {
            component,
            arena: ComponentArena::new(capacity),
            used: 0,
            growth_factor,
            groups: BTreeMap::new(),
            registry: HashMap::new(),
        }
    }

    /// Id of the stored component type.
    #[inline]
    #[must_use]
    pub fn component(&self) -> ComponentTypeId {
        self.component
    }

    /// Live records across all groups.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.used
    }

    /// Checks if no records are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Slots currently allocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Number of archetype groups, empty ones included.
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Placement of one archetype's group.
    #[must_use]
    pub fn group(&self, mask: &ArchetypeMask) -> Option<Group> {
        self.groups.get(mask).copied()
    }

    /// Read-only view of one archetype's group.
    #[must_use]
    pub fn view(&self, mask: &ArchetypeMask) -> Option<GroupView<'_, T>> {
        self.group(mask)
            .map(|group| GroupView::new(group, self.arena.as_slice()))
    }

    /// Iterates all groups in layout order.
    pub fn groups(&self) -> impl Iterator<Item = (&ArchetypeMask, Group)> {
        self.groups.iter().map(|(mask, group)| (mask, *group))
    }

    /// Reads the record at `position` in `mask`'s group.
    #[must_use]
    pub fn get(&self, mask: &ArchetypeMask, position: usize) -> Option<&T> {
        self.groups
            .get(mask)
            .and_then(|group| group.get(self.arena.as_slice(), position))
    }

    /// Mutable access to the record at `position` in `mask`'s group.
    pub fn get_mut(&mut self, mask: &ArchetypeMask, position: usize) -> Option<&mut T> {
        let group = *self.groups.get(mask)?;
        group.get_mut(self.arena.as_mut_slice(), position)
    }

    /// Returns the group of `mask`, creating it if needed.
    ///
    /// A new group starts empty at the end of its predecessor in mask order
    /// and is registered under every combination of its member types that
    /// includes this storage's type.
    pub fn get_or_create_archetype_group(&mut self, mask: &ArchetypeMask) -> Group {
        if let Some(group) = self.groups.get(mask) {
            return *group;
        }
        debug_assert!(
            mask.contains(self.component),
            "archetype does not contain the storage's type"
        );

        let base = self
            .groups
            .range::<ArchetypeMask, _>(..mask)
            .next_back()
            .map_or(0, |(_, group)| group.end());
        let group = Group::new(base);
        self.groups.insert(mask.clone(), group);

        let own = self.component;
        self.registry
            .entry(ArchetypeMask::single(own))
            .or_default()
            .insert(mask.clone());
        for combination in math::combinations(&mask.without(own)) {
            let key = ArchetypeMask::new(combination.into_iter().chain(std::iter::once(own)));
            self.registry.entry(key).or_default().insert(mask.clone());
        }

        debug!(
            component = type_name::<T>(),
            archetype = ?mask.types(),
            base,
            "Created archetype group"
        );
        group
    }

    /// Appends a batch of records to `mask`'s group.
    ///
    /// Grows the arena if needed, rolls every later group clockwise by the
    /// batch size, then shifts and appends into the target group.
    ///
    /// Returns the logical position of the first appended record; the rest
    /// follow consecutively.
    pub fn add_components(&mut self, mask: &ArchetypeMask, records: &[T]) -> usize {
        let start = self.get_or_create_archetype_group(mask).size();
        let count = records.len();
        if count == 0 {
            return start;
        }
        self.reserve(count);

        let buf = self.arena.as_mut_slice();
        // Last group first, so each roll lands in slots already vacated
        for (key, group) in self.groups.range_mut::<ArchetypeMask, _>(mask..).rev() {
            if key == mask {
                group.shift_clockwise(buf, count);
                group.append(buf, records);
            } else {
                group.roll_clockwise(buf, count);
            }
        }
        self.used += count;
        start
    }

    /// Removes one record from `mask`'s group and closes the gap.
    ///
    /// Returns the number of records removed (0 if the group is missing).
    pub fn remove_component(&mut self, position: usize, mask: &ArchetypeMask) -> usize {
        if !self.groups.contains_key(mask) {
            return 0;
        }
        let buf = self.arena.as_mut_slice();
        let mut freed = 0;
        for (key, group) in self.groups.range_mut::<ArchetypeMask, _>(mask..) {
            if key == mask {
                freed = group.remove_by_positions(buf, &[position]).total();
            } else {
                group.roll_counter_clockwise(buf, freed);
            }
        }
        self.used -= freed;
        freed
    }

    /// Removes every queued position of every archetype in one pass.
    ///
    /// Each group from the first affected one onwards is rolled back at most
    /// once, by the total freed before it.
    ///
    /// Returns the number of records removed.
    pub fn remove_components(&mut self, pending: &PendingRemovals) -> usize {
        let Some(first) = pending
            .iter()
            .map(|(mask, _)| mask)
            .find(|mask| self.groups.contains_key(*mask))
        else {
            return 0;
        };

        let buf = self.arena.as_mut_slice();
        let mut freed = 0;
        for (key, group) in self.groups.range_mut::<ArchetypeMask, _>((Bound::Included(first), Bound::Unbounded)) {
            group.roll_counter_clockwise(buf, freed);
            if let Some(positions) = pending.positions(key) {
                freed += group.remove_by_positions(buf, positions).total();
            }
        }
        self.used -= freed;
        trace!(component = type_name::<T>(), freed, "Batched removal");
        freed
    }

    /// Iterates the groups of every archetype containing `combination`.
    ///
    /// Yields nothing if no such archetype exists.
    #[must_use]
    pub fn component_iterator(&self, combination: &ArchetypeMask) -> ComponentIter<'_, T> {
        ComponentIter {
            masks: self.registry.get(combination).map(BTreeSet::iter),
            groups: &self.groups,
            data: self.arena.as_slice(),
        }
    }

    /// Groups matching `combination` with the raw arena, for chunked dispatch.
    pub(crate) fn column(&self, combination: &ArchetypeMask) -> (Vec<Group>, &[T]) {
        (self.matching_groups(combination), self.arena.as_slice())
    }

    /// Mutable counterpart of [`column`](Self::column).
    pub(crate) fn column_mut(&mut self, combination: &ArchetypeMask) -> (Vec<Group>, &mut [T]) {
        (self.matching_groups(combination), self.arena.as_mut_slice())
    }

    fn matching_groups(&self, combination: &ArchetypeMask) -> Vec<Group> {
        self.registry
            .get(combination)
            .into_iter()
            .flatten()
            .filter_map(|mask| self.groups.get(mask).copied())
            .collect()
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn reserve(&mut self, additional: usize) {
        let required = self.used + additional;
        let capacity = self.arena.capacity();
        if required <= capacity {
            return;
        }
        let grown = (math::max(capacity, required) as f64 * f64::from(self.growth_factor)).ceil() as usize;
        let new_capacity = math::max(grown, required);
        debug!(
            component = type_name::<T>(),
            from = capacity,
            to = new_capacity,
            "Growing type storage"
        );
        self.arena.grow_to(new_capacity);
    }
}

/// Iterator over the groups matching a type combination, in mask order.
pub struct ComponentIter<'a, T> {
    masks: Option<std::collections::btree_set::Iter<'a, ArchetypeMask>>,
    groups: &'a BTreeMap<ArchetypeMask, Group>,
    data: &'a [T],
}

impl<'a, T> Iterator for ComponentIter<'a, T> {
    type Item = GroupView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let masks = self.masks.as_mut()?;
        masks
            .find_map(|mask| self.groups.get(mask))
            .map(|group| GroupView::new(*group, self.data))
    }
}

/// Type-erased access to a [`TypeStorage`].
///
/// Lets the world hold storages of every component type in one table and
/// run structural removals without knowing the concrete type.
pub trait ErasedStorage: Send + Sync {
    /// Id of the stored component type.
    fn component(&self) -> ComponentTypeId;

    /// Rust name of the stored component type.
    fn type_name(&self) -> &'static str;

    /// Live records across all groups.
    fn len(&self) -> usize;

    /// Checks if no records are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// See [`TypeStorage::remove_component`].
    fn remove_component(&mut self, position: usize, mask: &ArchetypeMask) -> usize;

    /// See [`TypeStorage::remove_components`].
    fn remove_components(&mut self, pending: &PendingRemovals) -> usize;

    /// Upcast for downcasting to the concrete storage.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete storage.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for TypeStorage<T> {
    fn component(&self) -> ComponentTypeId {
        self.component
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.used
    }

    fn remove_component(&mut self, position: usize, mask: &ArchetypeMask) -> usize {
        TypeStorage::remove_component(self, position, mask)
    }

    fn remove_components(&mut self, pending: &PendingRemovals) -> usize {
        TypeStorage::remove_components(self, pending)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
