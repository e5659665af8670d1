use crate::db::traits::{TodoRepository, UserRepository};
use crate::types::{AppError, IdentityField, NewTodo, NewUser, Result, Todo, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const TODO_COLUMNS: &str = "id, title, completed, user_id, created_at, updated_at";

/// libsql-backed storage for users and todos.
///
/// Holds a single connection so an in-memory database stays the same
/// database for the lifetime of the client.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Opens (or creates) a local SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        tracing::debug!(path, "database ready");
        Ok(client)
    }

    /// Opens an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to enable foreign keys: {}", e)))?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL CHECK (password_hash <> ''),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Todos table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                user_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create todos table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos(user_id)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create todos index: {}", e)))?;

        Ok(())
    }

    async fn query_user(&self, column: &str, value: libsql::Value) -> Result<Option<User>> {
        let conn = self.connection();
        let sql = format!("SELECT {} FROM users WHERE {} = ?1", USER_COLUMNS, column);

        let mut rows = conn
            .query(&sql, [value])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid stored timestamp: {}", secs)))
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row.get(4).map_err(|e| AppError::Database(e.to_string()))?)?,
        updated_at: timestamp(row.get(5).map_err(|e| AppError::Database(e.to_string()))?)?,
    })
}

fn todo_from_row(row: &Row) -> Result<Todo> {
    let completed: i64 = row.get(2).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Todo {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        title: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        completed: completed != 0,
        user_id: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row.get(4).map_err(|e| AppError::Database(e.to_string()))?)?,
        updated_at: timestamp(row.get(5).map_err(|e| AppError::Database(e.to_string()))?)?,
    })
}

/// Turns a unique-constraint violation into the matching duplicate error.
fn map_user_insert_error(e: libsql::Error) -> AppError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed: users.email") {
        AppError::DuplicateIdentity(IdentityField::Email)
    } else if msg.contains("UNIQUE constraint failed: users.username") {
        AppError::DuplicateIdentity(IdentityField::Username)
    } else {
        AppError::Database(format!("Failed to create user: {}", msg))
    }
}

#[async_trait]
impl UserRepository for TursoClient {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user("email", email.into()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_user("username", username.into()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.query_user("id", id.into()).await
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let conn = self.connection();
        let now = Utc::now().timestamp();
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {}",
            USER_COLUMNS
        );

        let mut rows = conn
            .query(
                &sql,
                (
                    user.username.as_str(),
                    user.email.as_str(),
                    user.password_hash.as_str(),
                    now,
                    now,
                ),
            )
            .await
            .map_err(map_user_insert_error)?;

        let row = rows
            .next()
            .await
            .map_err(map_user_insert_error)?
            .ok_or_else(|| AppError::Database("Insert returned no user row".to_string()))?;

        user_from_row(&row)
    }
}

#[async_trait]
impl TodoRepository for TursoClient {
    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let conn = self.connection();
        let now = Utc::now().timestamp();
        let sql = format!(
            "INSERT INTO todos (title, completed, user_id, created_at, updated_at)
             VALUES (?1, 0, ?2, ?3, ?4)
             RETURNING {}",
            TODO_COLUMNS
        );

        let mut rows = conn
            .query(&sql, (todo.title.as_str(), todo.user_id, now, now))
            .await
            .map_err(|e| AppError::Database(format!("Failed to create todo: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Database("Insert returned no todo row".to_string()))?;

        todo_from_row(&row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let conn = self.connection();
        let sql = format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS);

        let mut rows = conn
            .query(&sql, [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query todo: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(todo_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Todo>> {
        let conn = self.connection();
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = ?1 ORDER BY id ASC",
            TODO_COLUMNS
        );

        let mut rows = conn
            .query(&sql, [user_id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to list todos: {}", e)))?;

        let mut todos = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            todos.push(todo_from_row(&row)?);
        }

        Ok(todos)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo> {
        let conn = self.connection();
        let now = Utc::now().timestamp();
        let sql = format!(
            "UPDATE todos SET title = ?1, completed = ?2, updated_at = ?3
             WHERE id = ?4
             RETURNING {}",
            TODO_COLUMNS
        );

        let mut rows = conn
            .query(
                &sql,
                (
                    todo.title.as_str(),
                    i64::from(todo.completed),
                    now,
                    todo.id,
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update todo: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("todo".to_string()))?;

        todo_from_row(&row)
    }

    async fn delete(&self, todo: &Todo) -> Result<()> {
        let conn = self.connection();

        conn.execute("DELETE FROM todos WHERE id = ?1", [todo.id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete todo: {}", e)))?;

        Ok(())
    }
}
