//! Persistence layer for the todo service.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (document mappings)
//! - Repository implementations (MongoDB and in-memory)

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;

pub use error::StoreError;
