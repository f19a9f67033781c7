//! Shared buffer of deferred removal requests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::ecs::EntityId;

/// Cloneable, thread-safe handle for requesting deferred removals.
///
/// Every clone feeds the same buffer. Handles that are already stale when
/// the world drains the buffer are skipped.
///
/// # Example
///
/// ```rust
/// use gyre_core::ecs::EntityId;
/// use gyre_core::sync::RemovalQueue;
///
/// let queue = RemovalQueue::new();
/// let worker = queue.clone();
/// std::thread::spawn(move || worker.push(EntityId::new(3, 0)))
///     .join()
///     .unwrap();
/// assert_eq!(queue.drain(), vec![EntityId::new(3, 0)]);
/// ```
#[derive(Clone, Default)]
pub struct RemovalQueue {
    requests: Arc<Mutex<Vec<EntityId>>>,
}

impl RemovalQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests removal of one entity.
    pub fn push(&self, id: EntityId) {
        self.requests.lock().push(id);
    }

    /// Requests removal of many entities under one lock.
    pub fn extend(&self, ids: impl IntoIterator<Item = EntityId>) {
        self.requests.lock().extend(ids);
    }

    /// Takes every queued request, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<EntityId> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Number of queued requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    /// Checks if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let queue = RemovalQueue::new();
        let other = queue.clone();
        other.push(EntityId::new(1, 0));
        queue.extend([EntityId::new(2, 0), EntityId::new(3, 1)]);

        assert_eq!(queue.len(), 3);
        assert_eq!(
            other.drain(),
            vec![EntityId::new(1, 0), EntityId::new(2, 0), EntityId::new(3, 1)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_pushes() {
        let queue = RemovalQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        queue.push(EntityId::new(t * 100 + i, 0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(queue.drain().len(), 400);
    }
}
