//! OpenAPI document for every route, served at `/api-docs/openapi.json`.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Server API",
        description = "User accounts and per-user todo lists. Protected routes expect `Authorization: Bearer <token>`."
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::users::register,
        crate::api::handlers::users::login,
        crate::api::handlers::users::me,
        crate::api::handlers::todos::create_todo,
        crate::api::handlers::todos::list_todos,
        crate::api::handlers::todos::get_todo,
        crate::api::handlers::todos::update_todo,
        crate::api::handlers::todos::delete_todo,
    ),
    components(schemas(
        crate::types::User,
        crate::types::Todo,
        crate::types::RegisterRequest,
        crate::types::LoginRequest,
        crate::types::CreateTodoRequest,
        crate::types::UpdateTodoRequest,
        crate::types::IssuedToken,
        crate::types::AuthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login and the current user"),
        (name = "todos", description = "Todo items, visible only to their owner"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/api/v1/users/register",
            "/api/v1/users/login",
            "/api/v1/users/me",
            "/api/v1/todos",
            "/api/v1/todos/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components should exist");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
