//! Shared utilities and common types for the todo service.
//!
//! This crate provides common functionality used across all other crates:
//! - Title validation

pub mod validation;
