//! Store adapter contract and its implementations.
//!
//! # Responsibility
//! - Define the storage-agnostic `BookStore` contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Stores never validate business rules beyond the unique `id` constraint.
//! - Store APIs return semantic errors (`DuplicateId`) alongside transport
//!   errors.

pub mod book_store;
pub mod memory_store;
