//! Field-level payload validation.
//!
//! A [`Validator`] accumulates at most one error per field. Rules run in the
//! order they are called and the first failing rule for a field wins: once a
//! field has an error, every later rule that targets it is a no-op.
//!
//! ```ignore
//! let mut v = Validator::new();
//! v.not_empty("email", &payload.email);
//! v.valid_email("email", &payload.email);
//! if !v.is_valid() {
//!     return Err(AppError::Validation(v.into_errors()));
//! }
//! ```
//!
//! Request payloads implement [`Validate`] and are pulled out of the body with
//! the [`ValidatedJson`] extractor, so a handler only ever sees a payload that
//! already passed its rules.

use crate::types::{
    AppError, CreateTodoRequest, FieldErrors, LoginRequest, RegisterRequest, UpdateTodoRequest,
};
use axum::extract::{FromRequest, Json, Request};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LEN: usize = 7;
/// Minimum username length accepted at registration.
pub const USERNAME_MIN_LEN: usize = 4;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Domain labels: alphanumeric at both ends, hyphens inside, 63 chars max.
        // At least one dot-separated suffix is required.
        let pattern = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// A named value taking part in a [`Validator::must_match`] comparison.
#[derive(Debug, Clone, Copy)]
pub struct FieldMatch<'a> {
    pub field: &'a str,
    pub value: &'a str,
}

impl<'a> FieldMatch<'a> {
    pub fn new(field: &'a str, value: &'a str) -> Self {
        Self { field, value }
    }
}

/// Stateful accumulator of field errors for one payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    fn record(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_insert(message);
    }

    /// Fails with "`<field>` is required" when `value` is empty.
    pub fn not_empty(&mut self, field: &str, value: &str) -> bool {
        if self.has_error(field) {
            return false;
        }

        if value.is_empty() {
            self.record(field, format!("{} is required", field));
            return false;
        }

        true
    }

    /// Fails when a non-empty `value` has fewer than `min` characters.
    ///
    /// Empty values pass; pair with [`Validator::not_empty`] when the field is
    /// mandatory.
    pub fn longer_than(&mut self, field: &str, value: &str, min: usize) -> bool {
        if self.has_error(field) {
            return false;
        }

        if value.is_empty() {
            return true;
        }

        if value.chars().count() < min {
            self.record(
                field,
                format!("{} not long enough; {} characters is required", field, min),
            );
            return false;
        }

        true
    }

    pub fn valid_email(&mut self, field: &str, value: &str) -> bool {
        if self.has_error(field) {
            return false;
        }

        if !email_regex().is_match(value) {
            self.record(field, "bad email format".to_string());
            return false;
        }

        true
    }

    /// Fails on both fields when the two values differ.
    ///
    /// Only `el`'s existing error short-circuits the rule. An error already
    /// recorded on `other` is kept as is.
    pub fn must_match(&mut self, el: FieldMatch<'_>, other: FieldMatch<'_>) -> bool {
        if self.has_error(el.field) {
            return false;
        }

        if el.value != other.value {
            self.record(el.field, format!("must match {}", other.field));
            self.record(other.field, format!("must match {}", el.field));
            return false;
        }

        true
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    /// `Ok(())` when no rule failed, otherwise the collected errors.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// A payload with a fixed rule pipeline.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();

        v.not_empty("email", &self.email);
        v.valid_email("email", &self.email);

        v.longer_than("password", &self.password, PASSWORD_MIN_LEN);
        v.not_empty("password", &self.password);

        v.not_empty("confirmPassword", &self.confirm_password);
        v.must_match(
            FieldMatch::new("confirmPassword", &self.confirm_password),
            FieldMatch::new("password", &self.password),
        );

        v.longer_than("username", &self.username, USERNAME_MIN_LEN);
        v.not_empty("username", &self.username);

        v.finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();

        v.not_empty("email", &self.email);
        v.valid_email("email", &self.email);

        v.not_empty("password", &self.password);

        v.finish()
    }
}

impl Validate for CreateTodoRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.not_empty("title", &self.title);
        v.finish()
    }
}

impl Validate for UpdateTodoRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.not_empty("title", title);
        }
        v.finish()
    }
}

/// JSON body extractor that rejects payloads failing [`Validate`].
///
/// Malformed JSON becomes [`AppError::InvalidInput`]; rule failures become
/// [`AppError::Validation`] carrying the field map.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

        payload.validate().map_err(AppError::Validation)?;

        Ok(ValidatedJson(payload))
    }
}
