//! Todo entity (document mapping for the `todos` collection).

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{self, doc, Document};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Document mapping for the `todos` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoEntity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TodoEntity {
    /// Builds a new, not yet stored, todo with a fresh identifier.
    ///
    /// `created_at` is taken at millisecond precision so the value handed back
    /// on create matches what later reads return.
    pub fn new(title: &str) -> Result<Self, StoreError> {
        shared::validation::validate_title(title)?;
        Ok(Self {
            id: ObjectId::new(),
            title: title.to_string(),
            completed: false,
            created_at: bson::DateTime::now().to_chrono(),
        })
    }
}

impl From<TodoEntity> for domain::models::Todo {
    fn from(entity: TodoEntity) -> Self {
        Self {
            id: entity.id.to_hex(),
            title: entity.title,
            completed: entity.completed,
            created_at: entity.created_at,
        }
    }
}

/// Partial update of a todo. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// Returns true if there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Checks the fields that are present.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            shared::validation::validate_title(title)?;
        }
        Ok(())
    }

    /// Builds the `$set` body for the fields that are present.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(title) = &self.title {
            set.insert("title", title.as_str());
        }
        if let Some(completed) = self.completed {
            set.insert("completed", completed);
        }
        set
    }

    /// Builds the full update document.
    pub fn to_update_document(&self) -> Document {
        doc! { "$set": self.to_set_document() }
    }

    /// Applies the changes to an entity in place.
    pub fn apply(&self, entity: &mut TodoEntity) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(completed) = self.completed {
            entity.completed = completed;
        }
    }
}

impl From<domain::models::UpdateTodoRequest> for TodoChanges {
    fn from(request: domain::models::UpdateTodoRequest) -> Self {
        Self {
            title: request.title,
            completed: request.completed,
        }
    }
}

/// Parses a hex-encoded identifier from a request path.
pub fn parse_todo_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}
