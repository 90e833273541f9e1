//! List handlers: index, creation, detail, rename and deletion.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use todos_core::storage::Storage;
use todos_core::todo::{validate_list_name, ListId};

use super::flash::{redirect_with_flash, Flash, FlashMessage};
use super::params::ListPath;
use super::{is_xhr_request, pages, AppError};
use crate::models::ListForm;
use crate::session::SessionId;
use crate::state::AppState;
use crate::storage::release;

/// Message shown when a list id does not resolve.
pub const LIST_NOT_FOUND: &str = "The requested list is not found.";

/// Sends the browser back to the index with the not-found message.
pub(super) fn not_found_redirect() -> Response {
    redirect_with_flash("/lists", FlashMessage::error(LIST_NOT_FOUND))
}

pub(super) fn list_not_found(list_id: ListId) -> Response {
    tracing::warn!(list_id, "List not found");
    not_found_redirect()
}

/// Handler for GET /lists
pub async fn list_lists(
    State(state): State<AppState>,
    session: SessionId,
    Flash(flash): Flash,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = render_lists(storage.as_ref(), flash).await;
    release(storage, outcome).await
}

async fn render_lists(
    storage: &dyn Storage,
    flash: Option<FlashMessage>,
) -> Result<Response, AppError> {
    let lists = storage.all_lists().await?;
    Ok(pages::lists_page(flash, lists))
}

/// Handler for GET /lists/new
pub async fn new_list_form(Flash(flash): Flash) -> Response {
    pages::new_list_page(StatusCode::OK, flash, "")
}

/// Handler for POST /lists
///
/// Invalid names re-render the form with status 422.
pub async fn create_list(
    State(state): State<AppState>,
    session: SessionId,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = insert_list(storage.as_ref(), form.name()).await;
    release(storage, outcome).await
}

async fn insert_list(storage: &dyn Storage, name: &str) -> Result<Response, AppError> {
    let lists = storage.all_lists().await?;

    if let Err(e) = validate_list_name(name, &lists) {
        tracing::warn!(error = %e, "Rejected list name");
        return Ok(pages::new_list_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            Some(FlashMessage::error(e.to_string())),
            name,
        ));
    }

    let list_id = storage.add_list(name).await?;
    tracing::info!(list_id, name, "List created");

    Ok(redirect_with_flash(
        "/lists",
        FlashMessage::success(format!("The list {name} has been created.")),
    ))
}

/// Handler for GET /lists/{id}
pub async fn show_list(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
    Flash(flash): Flash,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = render_list(storage.as_ref(), list_id, flash).await;
    release(storage, outcome).await
}

async fn render_list(
    storage: &dyn Storage,
    list_id: ListId,
    flash: Option<FlashMessage>,
) -> Result<Response, AppError> {
    Ok(match storage.find_list(list_id).await? {
        Some(list) => pages::single_list_page(StatusCode::OK, flash, list, ""),
        None => list_not_found(list_id),
    })
}

/// Handler for POST /lists/{id}/delete
///
/// Script requests get the index URL as a plain body instead of a redirect.
pub async fn delete_list(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = remove_list(storage.as_ref(), list_id, is_xhr_request(&headers)).await;
    release(storage, outcome).await
}

async fn remove_list(
    storage: &dyn Storage,
    list_id: ListId,
    is_xhr: bool,
) -> Result<Response, AppError> {
    let list = storage.find_list(list_id).await?;
    storage.delete_list(list_id).await?;

    if is_xhr {
        return Ok("/lists".into_response());
    }

    Ok(match list {
        Some(list) => {
            tracing::info!(list_id, "List deleted");
            redirect_with_flash(
                "/lists",
                FlashMessage::success(format!("The list {} has been deleted.", list.name)),
            )
        }
        None => list_not_found(list_id),
    })
}

/// Handler for GET /lists/{id}/edit
pub async fn edit_list_form(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
    Flash(flash): Flash,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = render_edit_form(storage.as_ref(), list_id, flash).await;
    release(storage, outcome).await
}

async fn render_edit_form(
    storage: &dyn Storage,
    list_id: ListId,
    flash: Option<FlashMessage>,
) -> Result<Response, AppError> {
    Ok(match storage.find_list(list_id).await? {
        Some(list) => pages::edit_list_page(StatusCode::OK, flash, list, None),
        None => list_not_found(list_id),
    })
}

/// Handler for POST /lists/{id}
///
/// Submitting the current name is a no-op that returns to the list.
pub async fn update_list(
    State(state): State<AppState>,
    session: SessionId,
    ListPath(list_id): ListPath,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    let storage = state.storage.connect(&session).await?;
    let outcome = rename_list(storage.as_ref(), list_id, form.name()).await;
    release(storage, outcome).await
}

async fn rename_list(
    storage: &dyn Storage,
    list_id: ListId,
    name: &str,
) -> Result<Response, AppError> {
    let Some(list) = storage.find_list(list_id).await? else {
        return Ok(list_not_found(list_id));
    };

    if name == list.name {
        return Ok(Redirect::to(&format!("/lists/{list_id}")).into_response());
    }

    let lists = storage.all_lists().await?;
    if let Err(e) = validate_list_name(name, &lists) {
        tracing::warn!(list_id, error = %e, "Rejected list name");
        return Ok(pages::edit_list_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            Some(FlashMessage::error(e.to_string())),
            list,
            Some(name),
        ));
    }

    storage.edit_list_name(list_id, name).await?;
    tracing::info!(list_id, name, "List renamed");

    Ok(redirect_with_flash(
        "/lists",
        FlashMessage::success(format!("The list {} has been updated.", list.name)),
    ))
}
