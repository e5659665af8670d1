//! # Todo Server
//!
//! An HTTP service where users register, log in with email and password,
//! and manage their own todo items. Identity travels as an HS256-signed
//! bearer token valid for seven days.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todos::{api::routes::build_app, auth::jwt::TokenService, db::MemoryStore, AppState};
//! use todos::utils::config::TodoConfig;
//!
//! let store = Arc::new(MemoryStore::new());
//! let tokens = Arc::new(TokenService::new("change-me")?);
//! let state = AppState::new(TodoConfig::default(), store.clone(), store, tokens);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8082").await?;
//! axum::serve(listener, build_app(state)).await?;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST handlers, routes and the OpenAPI document
//! - [`accounts`] - Registration and login
//! - [`auth`] - Password hashing, tokens, authentication and ownership guards
//! - [`validation`] - Field validation and the validating JSON extractor
//! - [`db`] - Repository traits with libsql and in-memory implementations
//! - [`types`] - Models, wire types and error handling
//! - [`utils`] - TOML configuration
//! - [`cli`] - Command-line interface

#![warn(rustdoc::missing_crate_level_docs)]

/// Registration and login.
pub mod accounts;
/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, tokens and request guards.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Storage for users and todos.
pub mod db;
/// Core types (models, requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Field validation.
pub mod validation;

// Re-export commonly used types
pub use accounts::AccountService;
pub use auth::jwt::TokenService;
pub use db::{MemoryStore, TodoRepository, TursoClient, UserRepository};
pub use types::{AppError, Result};
pub use utils::config::TodoConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration, after environment overrides
    pub config: Arc<TodoConfig>,
    /// User storage
    pub users: Arc<dyn UserRepository>,
    /// Todo storage
    pub todos: Arc<dyn TodoRepository>,
    /// Token issuing and verification
    pub token_service: Arc<TokenService>,
    /// Registration and login
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(
        config: TodoConfig,
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        token_service: Arc<TokenService>,
    ) -> Self {
        let accounts = Arc::new(AccountService::new(users.clone(), token_service.clone()));

        Self {
            config: Arc::new(config),
            users,
            todos,
            token_service,
            accounts,
        }
    }
}
