//! Repository implementations for database operations.

pub mod memory;
pub mod todo;

pub use memory::InMemoryTodoRepository;
pub use todo::{MongoTodoRepository, TodoRepository};
