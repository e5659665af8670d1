//! Storage for users and todos.
//!
//! - **Turso/SQLite** (`turso`): local libsql database, file-backed or in-memory
//! - **Memory** (`memory`): lock-protected maps, no SQL involved
//!
//! Both implement the repository traits in [`traits`].

/// In-process store behind a read/write lock.
pub mod memory;
/// Repository traits and provider selection.
pub mod traits;
/// libsql client and the SQL schema.
pub mod turso;

pub use memory::MemoryStore;
pub use traits::{DatabaseProvider, Repositories, TodoRepository, UserRepository};
pub use turso::TursoClient;
