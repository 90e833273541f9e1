//! Browser sessions identified by a random cookie.
//!
//! Every request passes through [`ensure_session`], which reuses the
//! `todos_session` cookie when present and issues a fresh id otherwise. Handlers
//! read the id with the [`SessionId`] extractor.

use std::fmt;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header::SET_COOKIE, request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "todos_session";

/// Opaque identifier of a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// A new random session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Set-Cookie` value that stores this id in the browser.
    pub fn to_set_cookie_header(&self) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; SameSite=Lax",
            SESSION_COOKIE_NAME, self.0
        )
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware attaching a [`SessionId`] to every request.
///
/// When the browser did not send a usable session cookie a new id is
/// generated and returned to it with `Set-Cookie`.
pub async fn ensure_session(mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let existing = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(|value| SessionId::new(value.to_string()));

    let (session, is_new) = match existing {
        Some(session) => (session, false),
        None => {
            let session = SessionId::generate();
            tracing::debug!(session = %session, "Starting new session");
            (session, true)
        }
    };

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&session.to_set_cookie_header()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie header"),
        }
    }

    response
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Session middleware missing"))
    }
}
