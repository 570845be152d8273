//! Domain layer for the todo service.
//!
//! This crate contains the API-facing todo models and their request
//! validation rules.

pub mod models;
