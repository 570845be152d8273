//! In-memory todo repository.
//!
//! Mirrors the MongoDB repository's semantics without a server, for tests and
//! local development.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::todo::TodoRepository;
use crate::entities::{parse_todo_id, TodoChanges, TodoEntity};
use crate::error::StoreError;

/// Todo repository held in process memory.
///
/// Keyed by `ObjectId`, so listing returns todos in creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<BTreeMap<ObjectId, TodoEntity>>>,
}

impl InMemoryTodoRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos.
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, title: &str) -> Result<TodoEntity, StoreError> {
        let entity = TodoEntity::new(title)?;
        self.todos.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn list_all(&self) -> Result<Vec<TodoEntity>, StoreError> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<TodoEntity, StoreError> {
        let id = parse_todo_id(id)?;
        self.todos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: TodoChanges,
    ) -> Result<TodoEntity, StoreError> {
        let id = parse_todo_id(id)?;
        changes.validate()?;

        let mut todos = self.todos.write().await;
        let entity = todos.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply(entity);
        Ok(entity.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_todo_id(id)?;
        self.todos
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
