//! # Identity Tracking
//!
//! Every archetype stores its entities' ids in the [`EntityId`] storage,
//! position for position alongside the other components. After a removal
//! compacts a group, reading the survivors' ids back is enough to tell the
//! registry where each one moved.

use super::archetype::ArchetypeMask;
use super::entity::{EntityId, PendingRemovals};
use super::storage::TypeStorage;

/// New group position of an entity after a compaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionUpdate {
    /// The entity whose records moved.
    pub entity: EntityId,
    /// Its logical position inside its archetype's groups.
    pub position: usize,
}

impl TypeStorage<EntityId> {
    /// Removes one entity record and reports every survivor that moved.
    pub fn remove_tracked(&mut self, position: usize, mask: &ArchetypeMask) -> Vec<PositionUpdate> {
        if self.remove_component(position, mask) == 0 {
            return Vec::new();
        }
        self.positions_from(mask, position).collect()
    }

    /// Batched counterpart of [`remove_tracked`](Self::remove_tracked).
    ///
    /// Only survivors at or after the first removed position of their group
    /// change position; rolling never changes logical positions.
    pub fn remove_tracked_batch(&mut self, pending: &PendingRemovals) -> Vec<PositionUpdate> {
        if self.remove_components(pending) == 0 {
            return Vec::new();
        }
        let mut updates = Vec::new();
        for (mask, positions) in pending.iter() {
            if let Some(&first) = positions.first() {
                updates.extend(self.positions_from(mask, first));
            }
        }
        updates
    }

    fn positions_from<'a>(
        &'a self,
        mask: &ArchetypeMask,
        from: usize,
    ) -> impl Iterator<Item = PositionUpdate> + 'a {
        let view = self.view(mask);
        let len = view.map_or(0, |v| v.len());
        (from..len).filter_map(move |position| {
            view.and_then(|v| v.get(position)).map(|&entity| PositionUpdate { entity, position })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentTypeId;

    fn mask(ids: &[u32]) -> ArchetypeMask {
        ArchetypeMask::new(ids.iter().map(|&i| ComponentTypeId::new(i)))
    }

    fn filled(m: &ArchetypeMask, count: u32) -> TypeStorage<EntityId> {
        let mut storage = TypeStorage::new(ComponentTypeId::IDENTITY, 4, 1.5);
        let ids: Vec<_> = (0..count).map(|i| EntityId::new(i, 0)).collect();
        storage.add_components(m, &ids);
        storage
    }

    #[test]
    fn test_remove_tracked_reports_shifted_survivors() {
        let m = mask(&[0, 1]);
        let mut storage = filled(&m, 5);

        let updates = storage.remove_tracked(1, &m);
        assert_eq!(
            updates,
            vec![
                PositionUpdate { entity: EntityId::new(2, 0), position: 1 },
                PositionUpdate { entity: EntityId::new(3, 0), position: 2 },
                PositionUpdate { entity: EntityId::new(4, 0), position: 3 },
            ]
        );
    }

    #[test]
    fn test_remove_tracked_last_reports_nothing() {
        let m = mask(&[0, 1]);
        let mut storage = filled(&m, 3);
        assert!(storage.remove_tracked(2, &m).is_empty());
        assert!(storage.remove_tracked(0, &mask(&[0, 9])).is_empty());
    }

    #[test]
    fn test_batch_updates_per_archetype() {
        let a = mask(&[0, 1, 2]);
        let b = mask(&[0, 1]);
        let mut storage = filled(&b, 4);
        let ids: Vec<_> = (10..13).map(|i| EntityId::new(i, 0)).collect();
        storage.add_components(&a, &ids);

        let mut pending = PendingRemovals::new();
        pending.insert(&a, 0);
        pending.insert(&b, 2);
        pending.normalize();

        let updates = storage.remove_tracked_batch(&pending);
        assert_eq!(
            updates,
            vec![
                PositionUpdate { entity: EntityId::new(11, 0), position: 0 },
                PositionUpdate { entity: EntityId::new(12, 0), position: 1 },
                PositionUpdate { entity: EntityId::new(3, 0), position: 2 },
            ]
        );
    }
}
