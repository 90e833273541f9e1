pub mod error;
pub mod flash;
pub mod lists;
pub mod pages;
pub mod params;
pub mod root;
pub mod todos;

use axum::http::HeaderMap;

pub use error::AppError;

/// Check if the request was sent by the page's script rather than a navigation.
fn is_xhr_request(headers: &HeaderMap) -> bool {
    headers
        .get("X-Requested-With")
        .is_some_and(|value| value == "XMLHttpRequest")
}
