//! Repository traits
//!
//! The HTTP layer and the account service only talk to storage through
//! [`UserRepository`] and [`TodoRepository`]. "Not found" is always
//! `Ok(None)`; an `Err` means the storage itself failed.
//!
//! # Example
//!
//! ```rust,ignore
//! use todos::db::DatabaseProvider;
//!
//! // Ephemeral database, lost on restart
//! let repos = DatabaseProvider::Memory.connect().await?;
//!
//! // File-backed SQLite
//! let repos = DatabaseProvider::SQLite { path: "data/todo.db".into() }.connect().await?;
//! ```

use crate::types::{NewTodo, NewUser, Result, Todo, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Maps a configured database URL to a provider. `:memory:` and the
    /// empty string select the in-memory database.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.trim_start_matches("sqlite://").to_string(),
            }
        }
    }

    /// Opens the database and hands out both repositories backed by it.
    pub async fn connect(&self) -> Result<Repositories> {
        let client = match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await?,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await?,
        };
        let client = Arc::new(client);

        Ok(Repositories {
            users: client.clone(),
            todos: client,
        })
    }
}

/// The pair of repositories an [`AppState`](crate::AppState) is built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub todos: Arc<dyn TodoRepository>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Inserts a user. A collision on email or username is reported as
    /// [`AppError::DuplicateIdentity`](crate::types::AppError::DuplicateIdentity).
    async fn create(&self, user: NewUser) -> Result<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, todo: NewTodo) -> Result<Todo>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>>;

    /// All todos owned by `user_id`, oldest first.
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Todo>>;

    /// Persists title and completion state; bumps `updated_at`.
    async fn update(&self, todo: &Todo) -> Result<Todo>;

    async fn delete(&self, todo: &Todo) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_url() {
        assert_eq!(DatabaseProvider::from_url(":memory:"), DatabaseProvider::Memory);
        assert_eq!(DatabaseProvider::from_url(""), DatabaseProvider::Memory);
        assert_eq!(
            DatabaseProvider::from_url("./data/todo.db"),
            DatabaseProvider::SQLite {
                path: "./data/todo.db".to_string()
            }
        );
        assert_eq!(
            DatabaseProvider::from_url("sqlite://todo.db"),
            DatabaseProvider::SQLite {
                path: "todo.db".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_memory_provider_connects() {
        let repos = DatabaseProvider::Memory
            .connect()
            .await
            .expect("should connect");

        assert!(repos
            .users
            .find_by_id(1)
            .await
            .expect("should query")
            .is_none());
    }
}
