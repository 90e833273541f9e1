//! In-memory storage keyed by browser session.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use todos_core::storage::{Result, Storage};
use todos_core::todo::{next_todo_id, ListId, ListSummary, Todo, TodoId, TodoList};

use crate::session::SessionId;
use crate::storage::StorageProvider;

#[derive(Debug, Clone)]
struct StoredList {
    name: String,
    todos: BTreeMap<TodoId, Todo>,
}

/// Lists owned by one session.
#[derive(Debug, Default)]
struct SessionData {
    lists: BTreeMap<ListId, StoredList>,
    last_list_id: ListId,
}

type SessionMap = Arc<RwLock<HashMap<String, Arc<RwLock<SessionData>>>>>;

/// Where a not yet registered session is recorded on its first write.
#[derive(Debug, Clone)]
struct Registration {
    sessions: SessionMap,
    key: String,
}

impl Registration {
    /// The session's registered data, inserting `data` if the session is still unknown.
    async fn register(&self, data: &Arc<RwLock<SessionData>>) -> Arc<RwLock<SessionData>> {
        self.sessions
            .write()
            .await
            .entry(self.key.clone())
            .or_insert_with(|| data.clone())
            .clone()
    }
}

/// Storage handle over a single session's lists.
///
/// Cloning the handle shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    data: Arc<RwLock<SessionData>>,
    registration: Option<Registration>,
}

#[async_trait]
impl Storage for SessionStorage {
    async fn all_lists(&self) -> Result<Vec<ListSummary>> {
        let data = self.data.read().await;
        let mut lists: Vec<ListSummary> = data
            .lists
            .iter()
            .map(|(id, list)| ListSummary {
                id: *id,
                name: list.name.clone(),
                total_todos_count: list.todos.len(),
                incomplete_todos_count: list.todos.values().filter(|t| !t.completed).count(),
            })
            .collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(lists)
    }

    async fn contains(&self, list_id: ListId) -> Result<bool> {
        let data = self.data.read().await;
        Ok(data.lists.contains_key(&list_id))
    }

    async fn add_list(&self, name: &str) -> Result<ListId> {
        let target = match &self.registration {
            Some(registration) => registration.register(&self.data).await,
            None => self.data.clone(),
        };
        let mut data = target.write().await;
        data.last_list_id += 1;
        let id = data.last_list_id;
        data.lists.insert(
            id,
            StoredList {
                name: name.to_string(),
                todos: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    async fn delete_list(&self, list_id: ListId) -> Result<()> {
        let mut data = self.data.write().await;
        data.lists.remove(&list_id);
        Ok(())
    }

    async fn find_list(&self, list_id: ListId) -> Result<Option<TodoList>> {
        let data = self.data.read().await;
        Ok(data.lists.get(&list_id).map(|list| {
            TodoList::new(list_id, list.name.clone(), list.todos.values().cloned().collect())
        }))
    }

    async fn edit_list_name(&self, list_id: ListId, name: &str) -> Result<()> {
        let mut data = self.data.write().await;
        if let Some(list) = data.lists.get_mut(&list_id) {
            list.name = name.to_string();
        }
        Ok(())
    }

    async fn create_todo(&self, list_id: ListId, name: &str) -> Result<Option<TodoId>> {
        let mut data = self.data.write().await;
        let Some(list) = data.lists.get_mut(&list_id) else {
            return Ok(None);
        };
        let id = next_todo_id(list.todos.keys().copied());
        list.todos.insert(id, Todo::new(id, name));
        Ok(Some(id))
    }

    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> Result<()> {
        let mut data = self.data.write().await;
        if let Some(list) = data.lists.get_mut(&list_id) {
            list.todos.remove(&todo_id);
        }
        Ok(())
    }

    async fn mark_todo_complete(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> Result<()> {
        let mut data = self.data.write().await;
        if let Some(todo) = data
            .lists
            .get_mut(&list_id)
            .and_then(|list| list.todos.get_mut(&todo_id))
        {
            todo.completed = completed;
        }
        Ok(())
    }

    async fn mark_all_todos_complete(&self, list_id: ListId) -> Result<()> {
        let mut data = self.data.write().await;
        if let Some(list) = data.lists.get_mut(&list_id) {
            list.todos.values_mut().for_each(|todo| todo.completed = true);
        }
        Ok(())
    }

    async fn disconnect(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Every session's data, keyed by session id.
///
/// A session is only recorded once it creates its first list, so requests
/// that never write (including every request without a session cookie that
/// only reads) leave the map untouched. Recorded sessions live as long as
/// the process.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: SessionMap,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage for `session`. Unknown sessions read as empty.
    pub async fn storage_for(&self, session: &SessionId) -> SessionStorage {
        if let Some(data) = self.sessions.read().await.get(session.as_str()) {
            return SessionStorage {
                data: data.clone(),
                registration: None,
            };
        }

        SessionStorage {
            data: Arc::default(),
            registration: Some(Registration {
                sessions: self.sessions.clone(),
                key: session.as_str().to_string(),
            }),
        }
    }
}

/// Serves each session its own in-memory lists.
#[derive(Debug, Clone, Default)]
pub struct SessionProvider {
    store: SessionStore,
}

impl SessionProvider {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageProvider for SessionProvider {
    async fn connect(&self, session: &SessionId) -> Result<Box<dyn Storage>> {
        Ok(Box::new(self.store.storage_for(session).await))
    }
}
