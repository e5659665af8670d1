use crate::api::{docs, handlers};
use crate::auth::middleware::auth_middleware;
use crate::AppState;
use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Largest accepted request body.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Routes mounted under `/api/v1`.
pub fn create_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/users/me", get(handlers::users::me))
        .route(
            "/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        // Ownership is checked per handler by the `Owned<Todo>` extractor
        .route(
            "/todos/{id}",
            get(handlers::todos::get_todo)
                .patch(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public_routes.merge(protected_routes)
}

/// The complete application: API, health probe, OpenAPI document and the
/// HTTP middleware stack.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/v1", create_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new())
                .layer(CompressionLayer::new())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                )),
        )
        .with_state(state)
}
