//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into write and read use-cases.
//! - Keep the gateway decoupled from storage details.

pub mod book_service;
pub mod catalog_service;
