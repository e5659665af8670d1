//! Ownership checks for per-user resources.
//!
//! A resource kind opts in by implementing [`Ownable`] (who owns it) and
//! [`Resolve`] (how to load it by id). [`Owned<R>`] then runs the whole chain
//! as an extractor: authenticate, parse the `{id}` path segment, load the
//! resource (404 when absent) and compare owners (403 on mismatch).

use crate::auth::middleware::AuthUser;
use crate::types::{AppError, Result, Todo, User};
use crate::AppState;
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::request::Parts;

pub trait Ownable {
    fn is_owner(&self, user: &User) -> bool;
}

impl Ownable for Todo {
    fn is_owner(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

/// Fails with [`AppError::Forbidden`] unless `user` owns `resource`.
pub fn authorize<R: Ownable>(user: &User, resource: &R) -> Result<()> {
    if resource.is_owner(user) {
        Ok(())
    } else {
        tracing::debug!(user_id = user.id, "ownership check failed");
        Err(AppError::Forbidden)
    }
}

/// Loads a resource of this kind by id.
#[async_trait]
pub trait Resolve: Ownable + Sized + Send + Sync + 'static {
    /// Name used in the 404 body, e.g. `"todo not found"`.
    const KIND: &'static str;

    async fn resolve(state: &AppState, id: i64) -> Result<Option<Self>>;
}

#[async_trait]
impl Resolve for Todo {
    const KIND: &'static str = "todo";

    async fn resolve(state: &AppState, id: i64) -> Result<Option<Self>> {
        state.todos.find_by_id(id).await
    }
}

/// An authenticated caller together with a resource they own.
#[derive(Debug, Clone)]
pub struct Owned<R> {
    pub user: User,
    pub resource: R,
}

impl<S, R> FromRequestParts<S> for Owned<R>
where
    AppState: FromRef<S>,
    S: Send + Sync,
    R: Resolve,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        let app = AppState::from_ref(state);
        let resource = R::resolve(&app, id)
            .await?
            .ok_or_else(|| AppError::NotFound(R::KIND.to_string()))?;

        authorize(&user, &resource)?;

        Ok(Owned { user, resource })
    }
}
