//! Database entity definitions.
//!
//! Entities are direct mappings to stored documents.

pub mod todo;

pub use todo::{parse_todo_id, TodoChanges, TodoEntity};
