//! # Archetype Masks
//!
//! An archetype is the exact set of component types an entity carries.
//! Its mask is the sorted id list itself, so distinct sets never collide.
//!
//! ## Ordering
//!
//! ```text
//! {0,1,2,3}  <  {0,1,2}  <  {0,1,3}  <  {0,2}  <  {0}
//! ```
//!
//! Masks with more types sort first; equal-sized masks compare their ids
//! lexicographically. Type storages lay their groups out in this order, so
//! inserting into an archetype only disturbs the groups that follow it.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::component::ComponentTypeId;
use crate::error::{EcsError, EcsResult};

/// Order-independent identity of a set of component types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArchetypeMask {
    /// Sorted, de-duplicated.
    types: Vec<ComponentTypeId>,
}

impl ArchetypeMask {
    /// Builds a mask from ids in any order. Duplicates collapse.
    pub fn new(types: impl IntoIterator<Item = ComponentTypeId>) -> Self {
        let mut types: Vec<_> = types.into_iter().collect();
        types.sort_unstable();
        types.dedup();
        Self { types }
    }

    /// Mask of a single type.
    #[must_use]
    pub fn single(id: ComponentTypeId) -> Self {
        Self { types: vec![id] }
    }

    /// Member ids, ascending.
    #[inline]
    #[must_use]
    pub fn types(&self) -> &[ComponentTypeId] {
        &self.types
    }

    /// Number of member types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Checks if the mask has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Checks membership of one type.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.types.binary_search(&id).is_ok()
    }

    /// This mask plus `id`.
    #[must_use]
    pub fn with(&self, id: ComponentTypeId) -> Self {
        Self::new(self.types.iter().copied().chain(std::iter::once(id)))
    }

    /// Members other than `id`, ascending.
    #[must_use]
    pub fn without(&self, id: ComponentTypeId) -> Vec<ComponentTypeId> {
        self.types.iter().copied().filter(|&t| t != id).collect()
    }
}

impl Ord for ArchetypeMask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .types
            .len()
            .cmp(&self.types.len())
            .then_with(|| self.types.cmp(&other.types))
    }
}

impl PartialOrd for ArchetypeMask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compact per-world handle to an interned archetype mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    /// Returns the id as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interns archetype masks. Archetypes live as long as the world.
#[derive(Default)]
pub struct ArchetypeTable {
    masks: Vec<ArchetypeMask>,
    lookup: HashMap<ArchetypeMask, ArchetypeId>,
}

impl ArchetypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `mask`, interning it on first sight.
    ///
    /// The flag is true when the archetype is new.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IdSpaceExhausted`] once `u32::MAX` archetypes
    /// exist.
    pub fn intern(&mut self, mask: ArchetypeMask) -> EcsResult<(ArchetypeId, bool)> {
        if let Some(&id) = self.lookup.get(&mask) {
            return Ok((id, false));
        }
        let raw = u32::try_from(self.masks.len())
            .map_err(|_| EcsError::IdSpaceExhausted("archetype"))?;
        let id = ArchetypeId(raw);
        self.masks.push(mask.clone());
        self.lookup.insert(mask, id);
        Ok((id, true))
    }

    /// Mask behind an id.
    #[inline]
    #[must_use]
    pub fn mask(&self, id: ArchetypeId) -> Option<&ArchetypeMask> {
        self.masks.get(id.index())
    }

    /// Number of archetypes seen so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Checks if no archetype has been interned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(ids: &[u32]) -> ArchetypeMask {
        ArchetypeMask::new(ids.iter().map(|&i| ComponentTypeId::new(i)))
    }

    #[test]
    fn test_mask_order_independent() {
        assert_eq!(mask(&[3, 1, 2]), mask(&[1, 2, 3]));
        assert_eq!(mask(&[2, 2, 1]).len(), 2);
    }

    #[test]
    fn test_more_types_sort_first() {
        let mut masks = vec![mask(&[0]), mask(&[0, 2]), mask(&[0, 1, 3]), mask(&[0, 1]), mask(&[0, 1, 2])];
        masks.sort();
        assert_eq!(
            masks,
            vec![mask(&[0, 1, 2]), mask(&[0, 1, 3]), mask(&[0, 1]), mask(&[0, 2]), mask(&[0])]
        );
    }

    #[test]
    fn test_no_collisions_between_equal_sums() {
        // {1,4} and {2,3} would collide under an additive identity
        assert_ne!(mask(&[1, 4]), mask(&[2, 3]));
        assert_ne!(mask(&[1, 4]).cmp(&mask(&[2, 3])), Ordering::Equal);
    }

    #[test]
    fn test_membership() {
        let m = mask(&[0, 2, 5]);
        assert!(m.contains(ComponentTypeId::new(2)));
        assert!(!m.contains(ComponentTypeId::new(3)));
        assert_eq!(m.with(ComponentTypeId::new(1)), mask(&[0, 1, 2, 5]));
        assert_eq!(m.with(ComponentTypeId::new(2)), m);
        assert_eq!(m.without(ComponentTypeId::new(2)), vec![ComponentTypeId::new(0), ComponentTypeId::new(5)]);
    }

    #[test]
    fn test_intern() {
        let mut table = ArchetypeTable::new();
        let (a, new_a) = table.intern(mask(&[0, 1])).unwrap();
        let (b, new_b) = table.intern(mask(&[1, 0])).unwrap();
        assert!(new_a);
        assert!(!new_b);
        assert_eq!(a, b);
        assert_eq!(table.mask(a), Some(&mask(&[0, 1])));
        assert_eq!(table.mask(ArchetypeId(1)), None);
        assert_eq!(table.len(), 1);
    }
}
