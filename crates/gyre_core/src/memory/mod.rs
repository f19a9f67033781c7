//! # Memory Management
//!
//! Typed, index-addressed backing buffers for component storages.
//!
//! ## Design Philosophy
//!
//! - Records live in one contiguous slice per component type
//! - Callers address records by integer offsets, never by pointer
//! - Growth reallocates and copies; offsets survive, borrowed slices do not

mod arena;

pub use arena::ComponentArena;
