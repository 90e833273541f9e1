use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        lists::{
            create_list, delete_list, edit_list_form, list_lists, new_list_form, show_list,
            update_list,
        },
        root::root_redirect,
        todos::{complete_all_todos, create_todo, delete_todo, update_todo},
    },
    session::ensure_session,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/new", get(new_list_form))
        .route("/lists/{id}", get(show_list).post(update_list))
        .route("/lists/{id}/edit", get(edit_list_form))
        .route("/lists/{id}/delete", post(delete_list))
        .route("/lists/{id}/todos", post(create_todo))
        .route("/lists/{id}/todos/all/", post(complete_all_todos))
        .route("/lists/{id}/todos/{item_id}", post(update_todo))
        .route("/lists/{id}/todos/{item_id}/delete", post(delete_todo))
        .layer(middleware::from_fn(ensure_session))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::SET_COOKIE, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use todos_core::storage::{Result as StorageResult, Storage, StorageError};
    use todos_core::todo::{ListId, ListSummary, TodoId, TodoList};

    use crate::handlers::flash::FlashMessage;
    use crate::session::SessionId;
    use crate::storage::{SessionProvider, SqliteProvider, StorageProvider};

    const SESSION: &str = "todos_session=test-session";

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get_with(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("cookie", cookie)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_xhr(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("cookie", cookie)
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::empty())
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get("location")
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// The `name=value` pair of the named cookie set by the response.
    fn set_cookie(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&format!("{name}=")))
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    fn flash(response: &Response) -> FlashMessage {
        let pair = set_cookie(response, "flash_message").unwrap();
        let value = pair.strip_prefix("flash_message=").unwrap();
        FlashMessage::from_cookie_value(value).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn create_list_named(app: &Router, name: &str) -> Response {
        send(app, post_form("/lists", SESSION, &format!("list_name={name}"))).await
    }

    /// Session storage that counts handles and can fail list lookups.
    #[derive(Clone, Default)]
    struct CountingProvider {
        inner: SessionProvider,
        connects: Arc<AtomicUsize>,
        disconnects: Arc<AtomicUsize>,
        fail_reads: bool,
    }

    impl CountingProvider {
        fn failing() -> Self {
            Self {
                fail_reads: true,
                ..Self::default()
            }
        }

        fn counts(&self) -> (usize, usize) {
            (
                self.connects.load(Ordering::SeqCst),
                self.disconnects.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl StorageProvider for CountingProvider {
        async fn connect(&self, session: &SessionId) -> StorageResult<Box<dyn Storage>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingStorage {
                inner: self.inner.connect(session).await?,
                disconnects: self.disconnects.clone(),
                fail_reads: self.fail_reads,
            }))
        }
    }

    struct CountingStorage {
        inner: Box<dyn Storage>,
        disconnects: Arc<AtomicUsize>,
        fail_reads: bool,
    }

    impl CountingStorage {
        fn check(&self) -> StorageResult<()> {
            if self.fail_reads {
                return Err(StorageError::QueryFailed("disk I/O error".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn all_lists(&self) -> StorageResult<Vec<ListSummary>> {
            self.check()?;
            self.inner.all_lists().await
        }

        async fn contains(&self, list_id: ListId) -> StorageResult<bool> {
            self.inner.contains(list_id).await
        }

        async fn add_list(&self, name: &str) -> StorageResult<ListId> {
            self.inner.add_list(name).await
        }

        async fn delete_list(&self, list_id: ListId) -> StorageResult<()> {
            self.inner.delete_list(list_id).await
        }

        async fn find_list(&self, list_id: ListId) -> StorageResult<Option<TodoList>> {
            self.check()?;
            self.inner.find_list(list_id).await
        }

        async fn edit_list_name(&self, list_id: ListId, name: &str) -> StorageResult<()> {
            self.inner.edit_list_name(list_id, name).await
        }

        async fn create_todo(&self, list_id: ListId, name: &str) -> StorageResult<Option<TodoId>> {
            self.inner.create_todo(list_id, name).await
        }

        async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> StorageResult<()> {
            self.inner.delete_todo(list_id, todo_id).await
        }

        async fn mark_todo_complete(
            &self,
            list_id: ListId,
            todo_id: TodoId,
            completed: bool,
        ) -> StorageResult<()> {
            self.inner.mark_todo_complete(list_id, todo_id, completed).await
        }

        async fn mark_all_todos_complete(&self, list_id: ListId) -> StorageResult<()> {
            self.inner.mark_all_todos_complete(list_id).await
        }

        async fn disconnect(self: Box<Self>) -> StorageResult<()> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            self.inner.disconnect().await
        }
    }

    #[tokio::test]
    async fn test_root_redirects_to_lists() {
        let app = create_app(AppState::default());

        let response = send(&app, get_with("/", SESSION)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists");
    }

    #[tokio::test]
    async fn test_first_visit_starts_session() {
        let app = create_app(AppState::default());

        let response = send(
            &app,
            Request::builder().uri("/lists").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response, "todos_session").is_some());
        let html = body_text(response).await;
        assert!(html.contains("You have no lists yet."));
    }

    #[tokio::test]
    async fn test_create_list_then_render_index() {
        let app = create_app(AppState::default());

        let response = create_list_named(&app, "Groceries").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists");
        assert_eq!(
            flash(&response),
            FlashMessage::success("The list Groceries has been created.")
        );

        let response = send(&app, get_with("/lists", SESSION)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = set_cookie(&response, "flash_message").unwrap();
        assert_eq!(cleared, "flash_message=");
        let html = body_text(response).await;
        assert!(html.contains("Groceries"));
        assert!(html.contains("0/0"));
    }

    #[tokio::test]
    async fn test_flash_cookie_is_shown_once_rendered() {
        let app = create_app(AppState::default());
        let response = create_list_named(&app, "Groceries").await;
        let pending = set_cookie(&response, "flash_message").unwrap();

        let cookie = format!("{SESSION}; {pending}");
        let html = body_text(send(&app, get_with("/lists", &cookie)).await).await;

        assert!(html.contains("The list Groceries has been created."));
    }

    #[tokio::test]
    async fn test_invalid_list_names_rerender_form() {
        let app = create_app(AppState::default());

        let response = create_list_named(&app, "+++").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("List name must have 1 to 100 characters."));

        create_list_named(&app, "Groceries").await;
        let response = create_list_named(&app, "Groceries").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("The list name must be unique."));
        assert!(html.contains("value=\"Groceries\""));
    }

    #[tokio::test]
    async fn test_missing_list_redirects_with_error() {
        let app = create_app(AppState::default());

        for uri in ["/lists/42", "/lists/42/edit"] {
            let response = send(&app, get_with(uri, SESSION)).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/lists");
            assert_eq!(
                flash(&response),
                FlashMessage::error("The requested list is not found.")
            );
        }
    }

    #[tokio::test]
    async fn test_non_numeric_ids_redirect_as_not_found() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;

        let requests = [
            get_with("/lists/abc", SESSION),
            get_with("/lists/abc/edit", SESSION),
            post_form("/lists/abc/todos", SESSION, "todo=Milk"),
            post_form("/lists/1/todos/x", SESSION, "completed=true"),
            post_form("/lists/1/todos/x/delete", SESSION, ""),
        ];

        for request in requests {
            let response = send(&app, request).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/lists");
            assert_eq!(
                flash(&response),
                FlashMessage::error("The requested list is not found.")
            );
        }
    }

    #[tokio::test]
    async fn test_todo_lifecycle() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;

        let response = send(&app, post_form("/lists/1/todos", SESSION, "todo=Milk")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists/1");
        assert_eq!(
            flash(&response),
            FlashMessage::success("A todo item 'Milk' has been added.")
        );
        send(&app, post_form("/lists/1/todos", SESSION, "todo=Eggs")).await;

        let html = body_text(send(&app, get_with("/lists/1", SESSION)).await).await;
        assert!(html.contains("Milk"));
        assert!(html.contains("2/2"));

        let response = send(
            &app,
            post_form("/lists/1/todos/1", SESSION, "completed=true"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists/1");
        let html = body_text(send(&app, get_with("/lists/1", SESSION)).await).await;
        assert!(html.contains("1/2"));

        let response = send(&app, post_form("/lists/1/todos/all/", SESSION, "")).await;
        assert_eq!(
            flash(&response),
            FlashMessage::success("All tasks have been marked complete.")
        );
        let html = body_text(send(&app, get_with("/lists/1", SESSION)).await).await;
        assert!(html.contains("0/2"));

        send(
            &app,
            post_form("/lists/1/todos/2", SESSION, "completed=false"),
        )
        .await;
        let html = body_text(send(&app, get_with("/lists/1", SESSION)).await).await;
        assert!(html.contains("1/2"));
    }

    #[tokio::test]
    async fn test_invalid_todo_rerenders_list() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;
        send(&app, post_form("/lists/1/todos", SESSION, "todo=Milk")).await;

        let response = send(&app, post_form("/lists/1/todos", SESSION, "todo=Milk")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Todo name must be unique."));

        let response = send(&app, post_form("/lists/1/todos", SESSION, "todo=")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response)
            .await
            .contains("Todo name must have 1 to 100 characters."));
    }

    #[tokio::test]
    async fn test_todo_in_missing_list_redirects() {
        let app = create_app(AppState::default());

        let response = send(&app, post_form("/lists/9/todos", SESSION, "todo=Milk")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists");
    }

    #[tokio::test]
    async fn test_delete_todo_plain_and_xhr() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;
        send(&app, post_form("/lists/1/todos", SESSION, "todo=Milk")).await;
        send(&app, post_form("/lists/1/todos", SESSION, "todo=Eggs")).await;

        let response = send(&app, post_xhr("/lists/1/todos/1/delete", SESSION)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response, "flash_message").is_none());

        let response = send(&app, post_form("/lists/1/todos/2/delete", SESSION, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists/1");
        assert_eq!(
            flash(&response),
            FlashMessage::success("A todo item has been deleted.")
        );

        let html = body_text(send(&app, get_with("/lists/1", SESSION)).await).await;
        assert!(html.contains("0/0"));
    }

    #[tokio::test]
    async fn test_delete_list_plain_and_xhr() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;
        create_list_named(&app, "Chores").await;

        let response = send(&app, post_xhr("/lists/1/delete", SESSION)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "/lists");

        let response = send(&app, post_form("/lists/2/delete", SESSION, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            flash(&response),
            FlashMessage::success("The list Chores has been deleted.")
        );

        let html = body_text(send(&app, get_with("/lists", SESSION)).await).await;
        assert!(html.contains("You have no lists yet."));
    }

    #[tokio::test]
    async fn test_rename_list() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;
        create_list_named(&app, "Chores").await;

        let response = send(&app, post_form("/lists/1", SESSION, "list_name=Groceries")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists/1");
        assert!(set_cookie(&response, "flash_message").is_none());

        let response = send(&app, post_form("/lists/1", SESSION, "list_name=Chores")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response)
            .await
            .contains("The list name must be unique."));

        let response = send(&app, post_form("/lists/1", SESSION, "list_name=Food")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/lists");
        assert_eq!(
            flash(&response),
            FlashMessage::success("The list Groceries has been updated.")
        );

        let html = body_text(send(&app, get_with("/lists/1/edit", SESSION)).await).await;
        assert!(html.contains("value=\"Food\""));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_lists() {
        let app = create_app(AppState::default());
        create_list_named(&app, "Groceries").await;

        let html = body_text(send(&app, get_with("/lists", "todos_session=other")).await).await;

        assert!(!html.contains("Groceries"));
    }

    #[tokio::test]
    async fn test_sqlite_backend_persists_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let path = path.to_str().unwrap();

        let app = create_app(AppState::with_provider(
            SqliteProvider::new(path).await.unwrap(),
        ));
        create_list_named(&app, "Groceries").await;
        send(&app, post_form("/lists/1/todos", SESSION, "todo=Milk")).await;

        let app = create_app(AppState::with_provider(
            SqliteProvider::new(path).await.unwrap(),
        ));
        let html = body_text(send(&app, get_with("/lists/1", "todos_session=other")).await).await;

        assert!(html.contains("Groceries"));
        assert!(html.contains("Milk"));
        assert!(html.contains("1/1"));
    }

    #[tokio::test]
    async fn test_storage_released_once_per_request() {
        let provider = CountingProvider::default();
        let app = create_app(AppState::with_provider(provider.clone()));

        let response = create_list_named(&app, "Groceries").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(provider.counts(), (1, 1));

        let response = create_list_named(&app, "Groceries").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.counts(), (2, 2));

        let response = send(&app, post_form("/lists/1/todos", SESSION, "todo=")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.counts(), (3, 3));

        let response = send(&app, get_with("/lists/99", SESSION)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(provider.counts(), (4, 4));

        let response = send(&app, post_xhr("/lists/1/delete", SESSION)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(provider.counts(), (5, 5));
    }

    #[tokio::test]
    async fn test_storage_released_when_storage_fails() {
        let provider = CountingProvider::failing();
        let app = create_app(AppState::with_provider(provider.clone()));

        let response = create_list_named(&app, "Groceries").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "Sorry there was a nasty error - Query failed: disk I/O error"
        );
        assert_eq!(provider.counts(), (1, 1));

        let response = send(&app, get_with("/lists/1", SESSION)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider.counts(), (2, 2));
    }

    #[tokio::test]
    async fn test_invalid_path_does_not_acquire_storage() {
        let provider = CountingProvider::default();
        let app = create_app(AppState::with_provider(provider.clone()));

        let response = send(&app, get_with("/lists/abc", SESSION)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(provider.counts(), (0, 0));
    }
}
