//! # Cross-thread Removal Requests
//!
//! Structural mutation needs exclusive access to the world. Other threads
//! can still ask for entities to go away: they push handles into a shared
//! [`RemovalQueue`] and the owning thread applies them at its next flush.
//!
//! ```text
//! Worker threads:   queue.push(id)  ──┐
//!                                      ├─▶ [ Mutex<Vec<EntityId>> ]
//! Owner thread:     world.flush_entity_operations()  ◀── drain
//! ```
//!
//! The lock is held only for a push or a swap; no storage work happens
//! under it.

mod removal_queue;

pub use removal_queue::RemovalQueue;
