//! # Entity Management
//!
//! Entities are lightweight handles consisting of:
//! - An index into the registry's record table
//! - A generation counter that detects stale handles
//!
//! ## Lifecycle
//!
//! ```text
//!            create              late_remove            flush
//!   Free ────────────▶ Active ───────────────▶ Pending ───────▶ Free
//!                        │                                        ▲
//!                        └──────────── remove ───────────────────┘
//!                                  (slot recycled at flush)
//! ```
//!
//! Both removal paths bump the generation at once, so the old handle fails
//! fast. Freed indices go back into circulation only when the world is
//! flushed, oldest first.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bytemuck::{Pod, Zeroable};

use super::archetype::{ArchetypeId, ArchetypeMask, ArchetypeTable};
use super::component::ComponentTypeId;
use crate::error::{EcsError, EcsResult};

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the registry's record table
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - Slot in the registry (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Lifecycle state of a registry slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityState {
    /// Unused, or removed and waiting to be recycled.
    Free,
    /// Live; the handle with the current generation is valid.
    Active,
    /// Queued for removal at the next flush; records still in storage.
    PendingRemoval,
}

/// Where an entity's records live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityLocation {
    /// Archetype of the entity.
    pub archetype: ArchetypeId,
    /// Logical position inside each of the archetype's groups.
    pub position: usize,
}

#[derive(Clone, Copy, Debug)]
struct EntityRecord {
    generation: u32,
    state: EntityState,
    location: EntityLocation,
}

/// Group positions to remove, keyed by archetype.
///
/// Built from deferred removals and consumed by one flush. Position lists
/// handed to storages are sorted and de-duplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingRemovals {
    by_archetype: BTreeMap<ArchetypeMask, Vec<usize>>,
    touched: BTreeSet<ComponentTypeId>,
}

impl PendingRemovals {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `position` in the groups of `mask`.
    pub fn insert(&mut self, mask: &ArchetypeMask, position: usize) {
        self.touched.extend(mask.types().iter().copied());
        match self.by_archetype.get_mut(mask) {
            Some(positions) => positions.push(position),
            None => {
                self.by_archetype.insert(mask.clone(), vec![position]);
            }
        }
    }

    /// Sorts and de-duplicates every position list.
    pub fn normalize(&mut self) {
        for positions in self.by_archetype.values_mut() {
            positions.sort_unstable();
            positions.dedup();
        }
    }

    /// Positions queued for `mask`.
    #[must_use]
    pub fn positions(&self, mask: &ArchetypeMask) -> Option<&[usize]> {
        self.by_archetype.get(mask).map(Vec::as_slice)
    }

    /// Iterates archetypes with their positions, in mask order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArchetypeMask, &[usize])> {
        self.by_archetype.iter().map(|(mask, positions)| (mask, positions.as_slice()))
    }

    /// Component types whose storages hold queued records.
    pub fn touched(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.touched.iter().copied()
    }

    /// Total queued positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_archetype.values().map(Vec::len).sum()
    }

    /// Checks if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_archetype.is_empty()
    }
}

/// Highest number of entity slots a registry hands out.
///
/// Index `u32::MAX` is never issued, so no live handle equals
/// [`EntityId::NULL`].
pub const MAX_ENTITIES: u32 = u32::MAX;

/// Owns every entity record of a world.
pub struct EntityRegistry {
    records: Vec<EntityRecord>,
    /// Recyclable slots, oldest first.
    free: VecDeque<u32>,
    /// Removed slots not yet recyclable.
    retired: Vec<u32>,
    /// Deferred removals by archetype, as slot indices.
    pending: BTreeMap<ArchetypeId, Vec<u32>>,
    alive: usize,
    /// Slots below this index may be issued.
    limit: u32,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            free: VecDeque::new(),
            retired: Vec::new(),
            pending: BTreeMap::new(),
            alive: 0,
            limit: MAX_ENTITIES,
        }
    }

    /// Issues a handle for a new entity of `archetype`.
    ///
    /// The position must be set with [`set_position`](Self::set_position)
    /// once the records are stored.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IdSpaceExhausted`] when every slot is in use and
    /// none is waiting to be recycled.
    pub fn allocate(&mut self, archetype: ArchetypeId) -> EcsResult<EntityId> {
        let location = EntityLocation {
            archetype,
            position: 0,
        };

        if let Some(index) = self.free.pop_front() {
            let record = &mut self.records[index as usize];
            record.state = EntityState::Active;
            record.location = location;
            self.alive += 1;
            return Ok(EntityId::new(index, record.generation));
        }

        let index = u32::try_from(self.records.len())
            .ok()
            .filter(|&index| index < self.limit)
            .ok_or(EcsError::IdSpaceExhausted("entity"))?;
        self.records.push(EntityRecord {
            generation: 0,
            state: EntityState::Active,
            location,
        });
        self.alive += 1;
        Ok(EntityId::new(index, 0))
    }

    /// Records the group position of a freshly stored entity.
    pub fn set_position(&mut self, id: EntityId, position: usize) {
        if let Some(record) = self.records.get_mut(id.index() as usize) {
            record.location.position = position;
        }
    }

    /// Checks if `id` is a live handle.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.record(id).is_some()
    }

    /// Location of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn location(&self, id: EntityId) -> EcsResult<EntityLocation> {
        self.record(id)
            .map(|record| record.location)
            .ok_or_else(|| EcsError::stale(id))
    }

    /// Invalidates a live handle for immediate removal.
    ///
    /// Returns where its records live so the caller can remove them. The
    /// slot is recycled at the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn release(&mut self, id: EntityId) -> EcsResult<EntityLocation> {
        let record = self.record_mut(id).ok_or_else(|| EcsError::stale(id))?;
        record.state = EntityState::Free;
        record.generation = record.generation.wrapping_add(1);
        let location = record.location;
        self.retired.push(id.index());
        self.alive -= 1;
        Ok(location)
    }

    /// Invalidates a live handle and queues its records for the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if the handle is not live.
    pub fn defer_release(&mut self, id: EntityId) -> EcsResult<()> {
        let record = self.record_mut(id).ok_or_else(|| EcsError::stale(id))?;
        record.state = EntityState::PendingRemoval;
        record.generation = record.generation.wrapping_add(1);
        let archetype = record.location.archetype;
        self.pending.entry(archetype).or_default().push(id.index());
        self.alive -= 1;
        Ok(())
    }

    /// Number of deferred removals waiting for a flush.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Resolves deferred removals into group positions.
    ///
    /// Positions are read now, not when the removal was queued, so they
    /// reflect any compaction that happened in between. Every resolved slot
    /// is freed and retired.
    pub fn take_pending(&mut self, archetypes: &ArchetypeTable) -> PendingRemovals {
        let mut removals = PendingRemovals::new();
        for (archetype, indices) in std::mem::take(&mut self.pending) {
            let Some(mask) = archetypes.mask(archetype) else {
                continue;
            };
            for index in indices {
                let record = &mut self.records[index as usize];
                removals.insert(mask, record.location.position);
                record.state = EntityState::Free;
                self.retired.push(index);
            }
        }
        removals.normalize();
        removals
    }

    /// Moves retired slots to the free queue.
    pub fn recycle_retired(&mut self) {
        self.free.extend(self.retired.drain(..));
    }

    /// Rewrites the stored group position of the entity in slot `index`.
    ///
    /// Applies to pending entities too: their records are still stored.
    pub fn relocate(&mut self, index: u32, position: usize) {
        if let Some(record) = self.records.get_mut(index as usize) {
            record.location.position = position;
        }
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Checks if no entity is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records
            .get(id.index() as usize)
            .filter(|r| r.state == EntityState::Active && r.generation == id.generation())
    }

    fn record_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.records
            .get_mut(id.index() as usize)
            .filter(|r| r.state == EntityState::Active && r.generation == id.generation())
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
