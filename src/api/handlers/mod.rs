//! API request handlers.

/// Liveness probe.
pub mod health;
/// Todo CRUD handlers.
pub mod todos;
/// Registration, login and the current-user endpoint.
pub mod users;
