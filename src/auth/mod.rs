//! Credentials, tokens and request guards
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuing and verification
//! - [`auth::middleware`](crate::auth::middleware) - bearer authentication layer and the [`AuthUser`](middleware::AuthUser) extractor
//! - [`auth::ownership`](crate::auth::ownership) - per-resource ownership checks and the [`Owned`](ownership::Owned) extractor
//!
//! # Usage
//!
//! Handlers ask for what they need by type. Authentication and ownership run
//! while the arguments are extracted, so the handler body only ever sees an
//! authenticated owner:
//!
//! ```ignore
//! use todos::auth::{middleware::AuthUser, ownership::Owned};
//!
//! async fn me(AuthUser(user): AuthUser) -> Json<User> {
//!     Json(user)
//! }
//!
//! async fn show(owned: Owned<Todo>) -> Json<Todo> {
//!     Json(owned.resource)
//! }
//! ```
//!
//! Rejections are plain [`AppError`](crate::types::AppError)s: a missing or
//! invalid token is 401, a resource that does not exist is 404 and a
//! resource owned by someone else is 403.

/// HS256 token issuing and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Ownership checks for per-user resources.
pub mod ownership;
/// Password hashing.
pub mod password;
