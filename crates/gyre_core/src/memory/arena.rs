//! # Component Arena
//!
//! A growable, zero-initialised buffer of plain-old-data records.

use bytemuck::Zeroable;

/// Contiguous storage for one component type, addressed by index.
///
/// Every slot up to [`capacity`](Self::capacity) is always initialised
/// (freshly grown slots are zeroed), so offsets can be read and written
/// without tracking which slots are live. Liveness is the owner's concern.
///
/// # Example
///
/// ```rust
/// use gyre_core::memory::ComponentArena;
///
/// let mut arena: ComponentArena<u32> = ComponentArena::new(4);
/// arena.as_mut_slice()[3] = 7;
/// arena.grow_to(16);
/// assert_eq!(arena.capacity(), 16);
/// assert_eq!(arena.as_slice()[3], 7);
/// ```
pub struct ComponentArena<T> {
    /// Backing slots; `len()` is the capacity.
    slots: Vec<T>,
}

impl<T: Zeroable + Copy> ComponentArena<T> {
    /// Creates an arena with `capacity` zeroed slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::zeroed(); capacity],
        }
    }

    /// Returns the number of addressable slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Grows the arena to at least `capacity` slots.
    ///
    /// Existing records keep their offsets. Does nothing if the arena is
    /// already large enough.
    pub fn grow_to(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize(capacity, T::zeroed());
        }
    }

    /// Returns every slot as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    /// Returns every slot as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_zeroed() {
        let arena: ComponentArena<u64> = ComponentArena::new(8);
        assert_eq!(arena.capacity(), 8);
        assert!(arena.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_arena_grow_keeps_offsets() {
        let mut arena: ComponentArena<i32> = ComponentArena::new(2);
        arena.as_mut_slice().copy_from_slice(&[5, 6]);
        arena.grow_to(5);
        assert_eq!(arena.as_slice(), &[5, 6, 0, 0, 0]);

        // Shrinking requests are ignored
        arena.grow_to(1);
        assert_eq!(arena.capacity(), 5);
    }
}
