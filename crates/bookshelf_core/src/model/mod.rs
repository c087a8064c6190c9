//! Catalog domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Business identity is the caller-supplied `id`, never the storage key.
//! - Deletion is permanent; there are no tombstones.

pub mod book;
