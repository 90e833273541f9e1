use askama::Template;
use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Response},
};

use todos_core::todo::{
    sort_lists_for_display, sort_todos_for_display, ListSummary, Todo, TodoList,
};

use super::flash::FlashMessage;

/// Template wrapper that converts Askama templates into HTML responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}

/// Renders a page and clears the flash cookie it has just displayed.
fn render<T: Template>(status: StatusCode, template: T) -> Response {
    (
        status,
        [(SET_COOKIE, FlashMessage::clear_cookie_header())],
        HtmlTemplate(template),
    )
        .into_response()
}

/// Index of all lists, incomplete ones first.
#[derive(Template)]
#[template(path = "lists.html")]
struct ListsTemplate {
    flash: Option<FlashMessage>,
    lists: Vec<ListSummary>,
}

#[derive(Template)]
#[template(path = "new_list.html")]
struct NewListTemplate {
    flash: Option<FlashMessage>,
    list_name: String,
}

#[derive(Template)]
#[template(path = "edit_list.html")]
struct EditListTemplate {
    flash: Option<FlashMessage>,
    list: TodoList,
    list_name: String,
}

/// A single list with its todos, open ones first.
#[derive(Template)]
#[template(path = "single_list.html")]
struct SingleListTemplate {
    flash: Option<FlashMessage>,
    list: TodoList,
    todos: Vec<Todo>,
    todo_name: String,
}

pub fn lists_page(flash: Option<FlashMessage>, lists: Vec<ListSummary>) -> Response {
    render(
        StatusCode::OK,
        ListsTemplate {
            flash,
            lists: sort_lists_for_display(lists),
        },
    )
}

/// The list creation form, optionally refilled with a rejected name.
pub fn new_list_page(status: StatusCode, flash: Option<FlashMessage>, list_name: &str) -> Response {
    render(
        status,
        NewListTemplate {
            flash,
            list_name: list_name.to_string(),
        },
    )
}

pub fn edit_list_page(
    status: StatusCode,
    flash: Option<FlashMessage>,
    list: TodoList,
    list_name: Option<&str>,
) -> Response {
    let list_name = list_name.unwrap_or(&list.name).to_string();
    render(
        status,
        EditListTemplate {
            flash,
            list,
            list_name,
        },
    )
}

pub fn single_list_page(
    status: StatusCode,
    flash: Option<FlashMessage>,
    list: TodoList,
    todo_name: &str,
) -> Response {
    let todos = sort_todos_for_display(list.todos.clone());
    render(
        status,
        SingleListTemplate {
            flash,
            list,
            todos,
            todo_name: todo_name.to_string(),
        },
    )
}
