//! Todo repository: the storage contract and its MongoDB implementation.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::entities::{parse_todo_id, TodoChanges, TodoEntity};
use crate::error::StoreError;
use crate::metrics::QueryTimer;

/// Storage operations over the todo collection.
///
/// Every operation is a single round-trip to the backing store. Identifiers
/// are the hex strings handed out by `create`; anything else fails with
/// [`StoreError::InvalidId`].
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Stores a new todo with `completed = false`.
    async fn create(&self, title: &str) -> Result<TodoEntity, StoreError>;

    /// Returns every todo in storage order.
    async fn list_all(&self) -> Result<Vec<TodoEntity>, StoreError>;

    /// Fetches a single todo.
    async fn get_by_id(&self, id: &str) -> Result<TodoEntity, StoreError>;

    /// Applies the present fields of `changes` and returns the updated todo.
    async fn update_by_id(
        &self,
        id: &str,
        changes: TodoChanges,
    ) -> Result<TodoEntity, StoreError>;

    /// Removes a todo.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// MongoDB-backed todo repository.
#[derive(Clone)]
pub struct MongoTodoRepository {
    database: Database,
    collection: Collection<TodoEntity>,
}

impl MongoTodoRepository {
    /// Creates a new MongoTodoRepository over the named collection.
    pub fn new(database: Database, collection_name: &str) -> Self {
        let collection = database.collection::<TodoEntity>(collection_name);
        Self {
            database,
            collection,
        }
    }

    /// Returns a reference to the underlying collection.
    pub fn collection(&self) -> &Collection<TodoEntity> {
        &self.collection
    }

    async fn find_by_object_id(&self, id: ObjectId) -> Result<TodoEntity, StoreError> {
        let timer = QueryTimer::new("find_todo_by_id");
        let result = self.collection.find_one(doc! { "_id": id }, None).await;
        timer.record();
        result?.ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn create(&self, title: &str) -> Result<TodoEntity, StoreError> {
        let entity = TodoEntity::new(title)?;

        let timer = QueryTimer::new("insert_todo");
        let result = self.collection.insert_one(&entity, None).await;
        timer.record();
        result?;

        Ok(entity)
    }

    async fn list_all(&self) -> Result<Vec<TodoEntity>, StoreError> {
        let timer = QueryTimer::new("find_all_todos");
        let result = async {
            let mut cursor = self.collection.find(None, None).await?;
            let mut todos = Vec::new();
            while cursor.advance().await? {
                todos.push(cursor.deserialize_current()?);
            }
            Ok::<_, mongodb::error::Error>(todos)
        }
        .await;
        timer.record();
        Ok(result?)
    }

    async fn get_by_id(&self, id: &str) -> Result<TodoEntity, StoreError> {
        let id = parse_todo_id(id)?;
        self.find_by_object_id(id).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: TodoChanges,
    ) -> Result<TodoEntity, StoreError> {
        let id = parse_todo_id(id)?;
        changes.validate()?;

        // An empty `$set` is rejected by the server; nothing to change is a read.
        if changes.is_empty() {
            return self.find_by_object_id(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let timer = QueryTimer::new("update_todo");
        let result = self
            .collection
            .find_one_and_update(doc! { "_id": id }, changes.to_update_document(), options)
            .await;
        timer.record();
        result?.ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_todo_id(id)?;

        let timer = QueryTimer::new("delete_todo");
        let result = self.collection.delete_one(doc! { "_id": id }, None).await;
        timer.record();

        if result?.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let timer = QueryTimer::new("ping");
        let result = self.database.run_command(doc! { "ping": 1 }, None).await;
        timer.record();
        result?;
        Ok(())
    }
}
