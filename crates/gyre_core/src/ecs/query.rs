//! # Chunked Queries
//!
//! A query names a fixed tuple of component types. For every archetype
//! containing all of them, the matching group of each type is walked in
//! lockstep and handed out as bounded, physically contiguous chunks:
//!
//! ```text
//! archetype {E,P,V}   P group: [ P3 P4 | P0 P1 P2 ]   tip = 2
//!                     V group: [ V0 V1 V2 V3 V4 ]     tip = 0
//!
//! chunk 1: positions 0..3  (P run ends at its physical end)
//! chunk 2: positions 3..5
//! ```
//!
//! A chunk ends wherever any queried group wraps at its tip, or at the
//! configured maximum chunk size.
//!
//! Every chunk also carries the matching slice of entity ids. That slice is
//! read-only: the world reads stored ids back to repair positions after a
//! removal, so [`EntityId`] is never a queryable (mutable) type.

use std::any::Any;

use super::archetype::ArchetypeMask;
use super::component::{Component, ComponentRegistry, ComponentTypeId};
use super::entity::EntityId;
use super::group::Group;
use super::storage::TypeStorage;
use crate::error::{EcsError, EcsResult};

/// A tuple of up to eight component types read and written together.
pub trait Query: 'static {
    /// One mutable slice per queried type, all of equal length.
    type Chunk<'a>;

    /// Ids of the queried types in tuple order, or `None` if one of them was
    /// never registered (nothing can match).
    fn component_ids(registry: &ComponentRegistry) -> Option<Vec<ComponentTypeId>>;

    /// Walks every matching chunk.
    ///
    /// `columns[i]` must hold the storage of the `i`-th queried type;
    /// `identities` supplies the read-only entity ids of each chunk.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::GroupSizeMismatch`] if the groups of one
    /// archetype disagree on their size.
    fn for_each_chunk<F>(
        columns: Vec<Option<&mut dyn Any>>,
        identities: &TypeStorage<EntityId>,
        combination: &ArchetypeMask,
        max_chunk: usize,
        f: F,
    ) -> EcsResult<()>
    where
        F: for<'a> FnMut(usize, &'a [EntityId], Self::Chunk<'a>);
}

/// Checks that every layout lists the same archetypes with equal sizes.
fn check_layouts(layouts: &[&[Group]]) -> EcsResult<()> {
    let Some((first, rest)) = layouts.split_first() else {
        return Ok(());
    };
    for other in rest {
        if other.len() != first.len() {
            return Err(EcsError::GroupSizeMismatch {
                expected: first.len(),
                found: other.len(),
            });
        }
        for (a, b) in first.iter().zip(other.iter()) {
            if a.size() != b.size() {
                return Err(EcsError::GroupSizeMismatch {
                    expected: a.size(),
                    found: b.size(),
                });
            }
        }
    }
    Ok(())
}

/// Drives chunking over parallel group layouts.
///
/// `layouts[k][a]` is the group of archetype `a` in the `k`-th queried
/// storage. `visit` receives the arena offset of the chunk in every storage
/// and the chunk length.
pub(crate) fn walk_chunks<F>(layouts: &[&[Group]], max_chunk: usize, mut visit: F) -> EcsResult<()>
where
    F: FnMut(&[usize], usize),
{
    check_layouts(layouts)?;
    let Some(first) = layouts.first() else {
        return Ok(());
    };
    let max_chunk = max_chunk.max(1);
    let mut starts = vec![0; layouts.len()];

    for archetype in 0..first.len() {
        let size = first[archetype].size();
        let mut pos = 0;
        while pos < size {
            let mut len = max_chunk;
            for (k, layout) in layouts.iter().enumerate() {
                let group = layout[archetype];
                len = len.min(group.contiguous_run(pos));
                starts[k] = group.base() + (group.tip() + pos) % size;
            }
            visit(&starts, len);
            pos += len;
        }
    }
    Ok(())
}

macro_rules! impl_query {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Component),+> Query for ($($name,)+) {
            type Chunk<'a> = ($(&'a mut [$name],)+);

            fn component_ids(registry: &ComponentRegistry) -> Option<Vec<ComponentTypeId>> {
                Some(vec![$(registry.id_of::<$name>()?),+])
            }

            #[allow(non_snake_case)]
            fn for_each_chunk<Func>(
                mut columns: Vec<Option<&mut dyn Any>>,
                identities: &TypeStorage<EntityId>,
                combination: &ArchetypeMask,
                max_chunk: usize,
                mut f: Func,
            ) -> EcsResult<()>
            where
                Func: for<'a> FnMut(usize, &'a [EntityId], Self::Chunk<'a>),
            {
                $(
                    let Some($name) = columns
                        .get_mut($idx)
                        .and_then(Option::take)
                        .and_then(|column| column.downcast_mut::<TypeStorage<$name>>())
                    else {
                        return Ok(());
                    };
                    let $name = $name.column_mut(combination);
                )+

                let identity_key = combination.with(ComponentTypeId::IDENTITY);
                let (id_groups, ids) = identities.column(&identity_key);
                let layouts: &[&[Group]] = &[$(&$name.0[..],)+ &id_groups[..]];
                let own = layouts.len() - 1;
                walk_chunks(layouts, max_chunk, |starts, len| {
                    f(
                        len,
                        &ids[starts[own]..starts[own] + len],
                        ($(&mut $name.1[starts[$idx]..starts[$idx] + len],)+),
                    );
                })
            }
        }
    };
}

impl_query!(A: 0);
impl_query!(A: 0, B: 1);
impl_query!(A: 0, B: 1, C: 2);
impl_query!(A: 0, B: 1, C: 2, D: 3);
impl_query!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_query!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_query!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_query!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
