//! Account registration and login.

use crate::auth::{jwt::TokenService, password::CredentialHasher};
use crate::db::UserRepository;
use crate::types::{
    AppError, AuthResponse, IdentityField, LoginRequest, NewUser, RegisterRequest, Result,
};
use std::sync::Arc;

/// Turns validated credentials into users and tokens.
///
/// Callers are expected to have run the request through
/// [`Validate`](crate::validation::Validate) already.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher: CredentialHasher::new(),
            tokens,
        }
    }

    /// Creates an account and signs a token for it.
    ///
    /// Email is checked before username, so a request colliding on both
    /// reports the email.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::DuplicateIdentity(IdentityField::Email));
        }
        if self.users.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::DuplicateIdentity(IdentityField::Username));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .users
            .create(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await?;

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = user.id, "registered new user");
        Ok(AuthResponse { user, token })
    }

    /// Checks an email/password pair and signs a fresh token.
    ///
    /// Unknown email and wrong password both end in
    /// [`AppError::InvalidCredential`].
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let Some(user) = self.users.find_by_email(&req.email).await? else {
            self.hasher.verify_dummy(&req.password);
            tracing::debug!("login attempt for unknown email");
            return Err(AppError::InvalidCredential);
        };

        if !self.hasher.verify(&req.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "login attempt with wrong password");
            return Err(AppError::InvalidCredential);
        }

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok(AuthResponse { user, token })
    }
}
