//! In-process repository implementation.
//!
//! Keeps everything in a `parking_lot::RwLock`. Enforces the same uniqueness
//! rules as the SQL schema so tests written against it behave like the real
//! store.

use crate::db::traits::{TodoRepository, UserRepository};
use crate::types::{AppError, IdentityField, NewTodo, NewUser, Result, Todo, User};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        if user.password_hash.is_empty() {
            return Err(AppError::Database("password hash must not be empty".to_string()));
        }

        let mut tables = self.tables.write();

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateIdentity(IdentityField::Email));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateIdentity(IdentityField::Username));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());

        Ok(created)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let mut tables = self.tables.write();

        tables.next_todo_id += 1;
        let now = Utc::now();
        let created = Todo {
            id: tables.next_todo_id,
            title: todo.title,
            completed: false,
            user_id: todo.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.todos.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.tables.read().todos.get(&id).cloned())
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Todo>> {
        let tables = self.tables.read();
        Ok(tables
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, todo: &Todo) -> Result<Todo> {
        let mut tables = self.tables.write();
        let stored = tables
            .todos
            .get_mut(&todo.id)
            .ok_or_else(|| AppError::NotFound("todo".to_string()))?;

        stored.title = todo.title.clone();
        stored.completed = todo.completed;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, todo: &Todo) -> Result<()> {
        self.tables.write().todos.remove(&todo.id);
        Ok(())
    }
}
