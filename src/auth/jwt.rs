use crate::types::{AppError, Claims, IssuedToken};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

/// Fixed validity window of every issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

const BEARER_PREFIX: &str = "bearer ";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// No token text was supplied at all.
    #[error("missing token")]
    Missing,

    /// Bad signature, malformed structure or expired.
    #[error("invalid token")]
    Invalid,

    #[error("token signing secret must not be empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Missing | TokenError::Invalid => AppError::Unauthorized,
            TokenError::EmptySecret | TokenError::Signing(_) => AppError::Internal(e.to_string()),
        }
    }
}

/// Issues and verifies HS256-signed identity tokens.
///
/// The secret is fixed for the lifetime of the service. Rotating it means
/// building a new service, which invalidates every token issued by the old
/// one.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service reading time from the system clock.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        Self::with_clock(secret, Arc::new(DefaultClock))
    }

    /// Creates a token service with an explicit time source.
    pub fn with_clock(
        secret: impl AsRef<[u8]>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            clock,
        })
    }

    /// Signs `{id, exp: now + 7 days}` for the given identity.
    pub fn issue(&self, identity_id: i64) -> Result<IssuedToken, TokenError> {
        let expires_at = self.clock.utc() + Duration::days(TOKEN_TTL_DAYS);
        let claims = Claims {
            id: identity_id,
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Verifies raw token text and returns the identity id it was issued for.
    ///
    /// Accepts the bare token or `Bearer <token>` with any casing of the
    /// prefix. `None` or blank input is [`TokenError::Missing`]; everything
    /// else that does not check out is [`TokenError::Invalid`].
    pub fn verify(&self, raw: Option<&str>) -> Result<i64, TokenError> {
        let token = raw
            .map(|r| strip_bearer_prefix(r.trim_start()).trim())
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Missing)?;

        // Expiry is checked below against the injected clock, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)?;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Invalid);
        }

        Ok(claims.id)
    }
}

/// Removes a leading case-insensitive `"Bearer "` when present.
pub fn strip_bearer_prefix(raw: &str) -> &str {
    match raw.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            raw[BEARER_PREFIX.len()..].trim_start()
        }
        _ => raw,
    }
}
