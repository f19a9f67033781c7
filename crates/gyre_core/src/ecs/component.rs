//! # Component Types
//!
//! Components are pure data records with no behavior. Each Rust type used
//! as a component is issued a small dense [`ComponentTypeId`] by the world's
//! [`ComponentRegistry`]; archetype masks are built from these ids.

use std::any::TypeId;
use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use super::entity::EntityId;
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: bitwise copyable, so groups can move them in blocks
/// - `Pod` + `Zeroable`: storages pre-fill their arenas with zeroed slots
/// - `Default`: used by [`World::create_entity_default`](crate::ecs::World::create_entity_default)
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use gyre_core::ecs::Component;
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// impl Component for Position {}
/// ```
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {}

/// Entity ids are stored like any other component; their storage is what
/// lets the world map group positions back to entities.
impl Component for EntityId {}

/// Dense per-world identifier of a component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    /// Id of the identity-tracking component ([`EntityId`]).
    ///
    /// Always registered first, so every archetype mask contains it.
    pub const IDENTITY: Self = Self(0);

    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the id as an index into per-type tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Issues component type ids in registration order.
pub struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentTypeId>,
}

impl ComponentRegistry {
    /// Creates a registry holding only the identity component.
    #[must_use]
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(TypeId::of::<EntityId>(), ComponentTypeId::IDENTITY);
        Self { ids }
    }

    /// Returns the id of `T`, issuing a new one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IdSpaceExhausted`] once `u32::MAX` types exist.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return Ok(id);
        }
        let raw = u32::try_from(self.ids.len())
            .map_err(|_| EcsError::IdSpaceExhausted("component type"))?;
        let id = ComponentTypeId(raw);
        self.ids.insert(TypeId::of::<T>(), id);
        Ok(id)
    }

    /// Returns the id of `T` if it has been registered.
    #[inline]
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Number of registered component types, identity included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; the identity component is registered on creation.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default, Pod, Zeroable)]
    #[repr(C)]
    struct Mass(f32);
    impl Component for Mass {}

    #[derive(Clone, Copy, Default, Pod, Zeroable)]
    #[repr(C)]
    struct Charge(i32);
    impl Component for Charge {}

    #[test]
    fn test_identity_registered_first() {
        let registry = ComponentRegistry::new();
        assert_eq!(registry.id_of::<EntityId>(), Some(ComponentTypeId::IDENTITY));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut registry = ComponentRegistry::new();
        let mass = registry.register::<Mass>().unwrap();
        let charge = registry.register::<Charge>().unwrap();

        assert_eq!(mass.index(), 1);
        assert_eq!(charge.index(), 2);
        assert_eq!(registry.register::<Mass>(), Ok(mass));
        assert_eq!(registry.register::<EntityId>(), Ok(ComponentTypeId::IDENTITY));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unregistered_lookup() {
        let registry = ComponentRegistry::new();
        assert_eq!(registry.id_of::<Mass>(), None);
    }
}
