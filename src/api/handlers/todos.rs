use crate::{
    auth::{middleware::AuthUser, ownership::Owned},
    types::{CreateTodoRequest, NewTodo, Result, Todo, UpdateTodoRequest},
    validation::ValidatedJson,
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Create a todo owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    let todo = state
        .todos
        .create(NewTodo {
            title: payload.title,
            user_id: user.id,
        })
        .await?;

    tracing::debug!(todo_id = todo.id, user_id = user.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// List the caller's todos
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "The caller's todos, oldest first", body = [Todo]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Todo>>> {
    let todos = state.todos.list_by_owner(user.id).await?;
    Ok(Json(todos))
}

/// Get a single todo
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo", body = Todo),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn get_todo(owned: Owned<Todo>) -> Json<Todo> {
    Json(owned.resource)
}

/// Update title and/or completion state
#[utoipa::path(
    patch,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Owned { resource: mut todo, .. }: Owned<Todo>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoRequest>,
) -> Result<Json<Todo>> {
    if let Some(title) = payload.title {
        todo.title = title;
    }
    if let Some(completed) = payload.completed {
        todo.completed = completed;
    }

    let updated = state.todos.update(&todo).await?;
    Ok(Json(updated))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Owned { user, resource }: Owned<Todo>,
) -> Result<StatusCode> {
    state.todos.delete(&resource).await?;

    tracing::debug!(todo_id = resource.id, user_id = user.id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
