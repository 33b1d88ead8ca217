//! Visitor-scoped persistence: the key-value boundary and the dedupe guard
//! that gates survey re-display.

pub mod guard;
pub mod visitor;

pub use guard::DedupeGuard;
pub use visitor::{memory_store, MemoryStore, VisitorStore};
