//! Todo handlers: creation, completion and deletion within a list.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use todos_core::storage::Storage;
use todos_core::todo::{validate_todo_name, ListId};

use super::flash::{redirect_with_flash, FlashMessage};
use super::lists::list_not_found;
use super::params::{ListPath, TodoPath};
use super::{is_xhr_request, pages, AppError};
use crate::models::{CompletionForm, TodoForm};
use crate::session::SessionId;
use crate::state::AppState;
use crate::storage::release;

/// Handler for POST /lists/{id}/todos
///
/// Invalid names re-render the list with status 422.
pub async fn create_todo(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
    Form(form): Form<TodoForm>,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = insert_todo(storage.as_ref(), list_id, form.name()).await;
    release(storage, outcome).await
}

async fn insert_todo(
    storage: &dyn Storage,
    list_id: ListId,
    name: &str,
) -> Result<Response, AppError> {
    let Some(list) = storage.find_list(list_id).await? else {
        return Ok(list_not_found(list_id));
    };

    if let Err(e) = validate_todo_name(name, &list.todos) {
        tracing::warn!(list_id, error = %e, "Rejected todo name");
        return Ok(pages::single_list_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            Some(FlashMessage::error(e.to_string())),
            list,
            name,
        ));
    }

    let Some(todo_id) = storage.create_todo(list_id, name).await? else {
        return Ok(list_not_found(list_id));
    };
    tracing::info!(list_id, todo_id, name, "Todo created");

    Ok(redirect_with_flash(
        &format!("/lists/{list_id}"),
        FlashMessage::success(format!("A todo item '{name}' has been added.")),
    ))
}

/// Handler for POST /lists/{id}/todos/{item_id}/delete
///
/// Script requests get an empty 204 instead of a redirect.
pub async fn delete_todo(
    State(state): State<AppState>,
    session: SessionId,
    TodoPath { list_id, todo_id }: TodoPath,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = storage
        .delete_todo(list_id, todo_id)
        .await
        .map_err(AppError::from);
    release(storage, outcome).await?;

    tracing::info!(list_id, todo_id, "Todo deleted");

    if is_xhr_request(&headers) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(redirect_with_flash(
        &format!("/lists/{list_id}"),
        FlashMessage::success("A todo item has been deleted."),
    ))
}

/// Handler for POST /lists/{id}/todos/{item_id}
pub async fn update_todo(
    State(state): State<AppState>,
    session: SessionId,
    TodoPath { list_id, todo_id }: TodoPath,
    Form(form): Form<CompletionForm>,
) -> Result<Response, AppError> {
    let completed = form.is_completed();

    let storage = state.storage.connect(&session).await?;
    let outcome = storage
        .mark_todo_complete(list_id, todo_id, completed)
        .await
        .map_err(AppError::from);
    release(storage, outcome).await?;

    tracing::info!(list_id, todo_id, completed, "Todo updated");

    Ok(Redirect::to(&format!("/lists/{list_id}")).into_response())
}

/// Handler for POST /lists/{id}/todos/all/
pub async fn complete_all_todos(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = storage
        .mark_all_todos_complete(list_id)
        .await
        .map_err(AppError::from);
    release(storage, outcome).await?;

    tracing::info!(list_id, "All todos completed");

    Ok(redirect_with_flash(
        &format!("/lists/{list_id}"),
        FlashMessage::success("All tasks have been marked complete."),
    ))
}
