//! HTTP API Handlers and Routes
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and the middleware stack
//! - [`api::docs`](crate::api::docs) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Users (`/api/v1/users`)
//! - `POST /api/v1/users/register` - Register and receive a token
//! - `POST /api/v1/users/login` - Login and receive a token
//! - `GET /api/v1/users/me` - Current user
//!
//! ## Todos (`/api/v1/todos`)
//! - `POST /api/v1/todos` - Create a todo
//! - `GET /api/v1/todos` - List the caller's todos
//! - `GET /api/v1/todos/{id}` - Get a todo
//! - `PATCH /api/v1/todos/{id}` - Update title and/or completion
//! - `DELETE /api/v1/todos/{id}` - Delete a todo
//!
//! ## Other
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! # Authentication
//!
//! Everything under `/api/v1` except register and login requires a valid
//! token in the `Authorization` header (prefix matched case-insensitively):
//! ```text
//! Authorization: Bearer <token>
//! ```
//! `/todos/{id}` additionally requires the caller to own the todo.

/// OpenAPI document assembly.
pub mod docs;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
