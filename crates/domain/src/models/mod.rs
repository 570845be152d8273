//! Domain models for the todo service.

pub mod todo;

pub use todo::{CreateTodoRequest, DeleteTodoResponse, Todo, UpdateTodoRequest};
