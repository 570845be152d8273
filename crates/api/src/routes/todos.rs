//! Todo item CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateTodoRequest, DeleteTodoResponse, Todo, UpdateTodoRequest};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_todo_created, record_todo_deleted};

/// Create a todo item.
///
/// POST /items
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let title = request.title.as_deref().unwrap_or_default();
    let todo: Todo = state.todos.create(title).await?.into();

    record_todo_created();
    info!(todo_id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// List all todo items.
///
/// GET /items
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos: Vec<Todo> = state
        .todos
        .list_all()
        .await?
        .into_iter()
        .map(Todo::from)
        .collect();

    Ok(Json(todos))
}

/// Get a single todo item.
///
/// GET /items/:id
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.todos.get_by_id(&id).await?;
    Ok(Json(todo.into()))
}

/// Update a todo item. Only the fields present in the body change.
///
/// PUT /items/:id
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let todo: Todo = state.todos.update_by_id(&id, request.into()).await?.into();

    info!(
        todo_id = %todo.id,
        completed = todo.completed,
        "Todo updated"
    );

    Ok(Json(todo))
}

/// Delete a todo item.
///
/// DELETE /items/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    state.todos.delete_by_id(&id).await?;

    record_todo_deleted();
    info!(todo_id = %id, "Todo deleted");

    Ok(Json(DeleteTodoResponse::default()))
}
