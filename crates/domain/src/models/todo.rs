//! Todo item domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message returned after a todo item has been deleted.
pub const TODO_DELETED_MESSAGE: &str = "Deleted Todo";

/// Message returned when a todo item does not exist.
pub const TODO_NOT_FOUND_MESSAGE: &str = "Cannot find todo";

/// A todo item as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Storage-assigned identifier (hex-encoded).
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a todo item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(
        required(message = "Title is required"),
        custom(function = "shared::validation::validate_title")
    )]
    pub title: Option<String>,
}

/// Request payload for updating a todo item (partial update).
///
/// Only `title` and `completed` can change; any other field in the body is
/// ignored, so `id` and `createdAt` stay immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: Option<String>,

    pub completed: Option<bool>,
}

/// Response payload for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub message: String,
}

impl Default for DeleteTodoResponse {
    fn default() -> Self {
        Self {
            message: TODO_DELETED_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_todo() -> Todo {
        Todo {
            id: "507f1f77bcf86cd799439011".to_string(),
            title: "Buy milk".to_string(),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_todo_serializes_camel_case() {
        let value = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(value["id"], "507f1f77bcf86cd799439011");
        assert_eq!(value["title"], "Buy milk");
        assert_eq!(value["completed"], false);
        assert_eq!(value["createdAt"], "2024-03-01T12:00:00Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_create_request_valid() {
        let request: CreateTodoRequest =
            serde_json::from_value(json!({ "title": "Write report" })).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_missing_title() {
        let request: CreateTodoRequest = serde_json::from_value(json!({})).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_request_blank_title() {
        let request: CreateTodoRequest =
            serde_json::from_value(json!({ "title": "  " })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_ignores_immutable_fields() {
        let request: UpdateTodoRequest = serde_json::from_value(json!({
            "completed": true,
            "createdAt": "1999-01-01T00:00:00Z",
            "id": "000000000000000000000000"
        }))
        .unwrap();
        assert_eq!(request.completed, Some(true));
        assert!(request.title.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_blank_title() {
        let request = UpdateTodoRequest {
            title: Some(String::new()),
            completed: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_delete_response_default_message() {
        let value = serde_json::to_value(DeleteTodoResponse::default()).unwrap();
        assert_eq!(value, json!({ "message": "Deleted Todo" }));
    }
}
