//! Flash message utilities for server-to-client communication.
//!
//! Flash messages are short-lived messages stored in a cookie by one request
//! and shown once by the next rendered page, which then clears the cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the pending flash message.
pub const FLASH_COOKIE_NAME: &str = "flash_message";

/// Flash message structure stored in cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashMessage {
    /// Message type ("error" or "success")
    #[serde(rename = "type")]
    pub message_type: String,
    /// The message content to display
    pub message: String,
    /// Whether the message should auto-dismiss after a few seconds
    pub auto_dismiss: bool,
}

impl FlashMessage {
    /// Create an error flash message that requires manual dismissal.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message_type: "error".to_string(),
            message: message.into(),
            auto_dismiss: false,
        }
    }

    /// Create a success flash message that auto-dismisses.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message_type: "success".to_string(),
            message: message.into(),
            auto_dismiss: true,
        }
    }

    /// Serialize to JSON for cookie storage.
    pub fn to_cookie_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a cookie value back into a message.
    ///
    /// Accepts both the raw JSON and its URL-encoded form, since cookie
    /// parsing may already have decoded the value.
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        serde_json::from_str(value).ok().or_else(|| {
            let decoded = urlencoding::decode(value).ok()?;
            serde_json::from_str(&decoded).ok()
        })
    }

    /// Build a Set-Cookie header value for the flash message.
    ///
    /// Cookie properties:
    /// - Path: / (accessible from any page)
    /// - SameSite: Lax (sent on navigation, not cross-site requests)
    /// - Max-Age: 60 (expires after 60 seconds as a safety net)
    pub fn to_set_cookie_header(&self) -> String {
        let cookie_value = self.to_cookie_value();
        let encoded = urlencoding::encode(&cookie_value);
        format!(
            "{}={}; Path=/; SameSite=Lax; Max-Age=60",
            FLASH_COOKIE_NAME, encoded
        )
    }

    /// Set-Cookie header value that removes any pending flash message.
    pub fn clear_cookie_header() -> String {
        format!("{}=; Path=/; SameSite=Lax; Max-Age=0", FLASH_COOKIE_NAME)
    }
}

/// The flash message left by the previous request, if any.
///
/// Unreadable cookies are ignored.
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Option<FlashMessage>);

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let flash = jar.get(FLASH_COOKIE_NAME).and_then(|cookie| {
            let parsed = FlashMessage::from_cookie_value(cookie.value());
            if parsed.is_none() {
                tracing::debug!("Ignoring unreadable flash cookie");
            }
            parsed
        });

        Ok(Self(flash))
    }
}

/// Create a redirect response with a flash message cookie.
pub fn redirect_with_flash(url: &str, flash: FlashMessage) -> Response {
    let cookie_header = flash.to_set_cookie_header();

    ([(SET_COOKIE, cookie_header)], Redirect::to(url)).into_response()
}
