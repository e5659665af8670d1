use crate::auth::jwt::TokenService;
use crate::db::UserRepository;
use crate::types::{AppError, Result, User};
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Resolves the caller behind an `Authorization` header value.
///
/// Every failure, including a storage error during the lookup, collapses to
/// [`AppError::Unauthorized`].
pub async fn authenticate(
    tokens: &TokenService,
    users: &dyn UserRepository,
    authorization: Option<&str>,
) -> Result<User> {
    let user_id = tokens.verify(authorization).map_err(|e| {
        tracing::debug!(reason = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;

    match users.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            tracing::debug!(user_id, "token refers to an unknown user");
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "user lookup failed during authentication");
            Err(AppError::Unauthorized)
        }
    }
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

/// Rejects unauthenticated requests before routing reaches the handler.
///
/// The resolved caller is stored in the request extensions, where
/// [`AuthUser`] picks it up without a second lookup.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let user = authenticate(
        &state.token_service,
        state.users.as_ref(),
        authorization_header(req.headers()),
    )
    .await?;

    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let state = AppState::from_ref(state);
        let user = authenticate(
            &state.token_service,
            state.users.as_ref(),
            authorization_header(&parts.headers),
        )
        .await?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::traits::MockUserRepository;
    use crate::db::MemoryStore;
    use crate::types::NewUser;

    const SECRET: &str = "middleware-test-secret";

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = UserRepository::create(
            &store,
            NewUser {
                username: "alice".to_string(),
                email: "a@b.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            },
        )
        .await
        .expect("should create user");
        (store, user)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let tokens = TokenService::new(SECRET).expect("should build service");
        let (store, user) = store_with_user().await;
        let header = format!("Bearer {}", tokens.issue(user.id).unwrap().access_token);

        let found = authenticate(&tokens, &store, Some(&header))
            .await
            .expect("should authenticate");

        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let tokens = TokenService::new(SECRET).expect("should build service");
        let (store, _) = store_with_user().await;

        let result = authenticate(&tokens, &store, None).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_unauthorized() {
        let tokens = TokenService::new(SECRET).expect("should build service");
        let (store, _) = store_with_user().await;
        let token = tokens.issue(999).unwrap().access_token;

        let result = authenticate(&tokens, &store, Some(&token)).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_unauthorized() {
        let tokens = TokenService::new(SECRET).expect("should build service");
        let token = tokens.issue(1).unwrap().access_token;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(AppError::Database("connection reset".to_string())));

        let result = authenticate(&tokens, &users, Some(&token)).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
