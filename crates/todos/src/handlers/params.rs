//! Path extractors for list and todo ids.
//!
//! A segment that is not a number names no list, so it gets the same
//! not-found redirect as an unknown id instead of a bare 400.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

use todos_core::todo::{ListId, TodoId};

use super::lists::not_found_redirect;

/// The `{id}` segment of a list route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPath(pub ListId);

/// The `{id}` and `{item_id}` segments of a todo route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPath {
    pub list_id: ListId,
    pub todo_id: TodoId,
}

impl<S> FromRequestParts<S> for ListPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(list_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self(parse_id(&list_id)?))
    }
}

impl<S> FromRequestParts<S> for TodoPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((list_id, todo_id)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self {
            list_id: parse_id(&list_id)?,
            todo_id: parse_id(&todo_id)?,
        })
    }
}

fn parse_id(segment: &str) -> Result<i64, Response> {
    segment.parse().map_err(|_| {
        tracing::warn!(segment, "Invalid id in path");
        not_found_redirect()
    })
}
