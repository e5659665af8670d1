//! Database integration tests
//!
//! These tests exercise the libsql repositories, in memory and against a
//! temporary SQLite file.

use todos::db::{TodoRepository, TursoClient, UserRepository};
use todos::types::{AppError, IdentityField, NewTodo, NewUser};

/// Test helper to create a TursoClient with in-memory database
async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

async fn create_user(client: &TursoClient, username: &str, email: &str) -> todos::types::User {
    UserRepository::create(client, new_user(username, email))
        .await
        .expect("should create user")
}

async fn create_todo(client: &TursoClient, user_id: i64, title: &str) -> todos::types::Todo {
    TodoRepository::create(
        client,
        NewTodo {
            title: title.to_string(),
            user_id,
        },
    )
    .await
    .expect("should create todo")
}

#[tokio::test]
async fn test_create_and_find_user() {
    let client = create_test_client().await;

    let user = create_user(&client, "alice", "a@b.com").await;
    assert!(user.id > 0);
    assert_eq!(user.created_at, user.updated_at);

    let by_email = client
        .find_by_email("a@b.com")
        .await
        .expect("should query")
        .expect("user should exist");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.password_hash, user.password_hash);

    let by_name = client
        .find_by_username("alice")
        .await
        .expect("should query")
        .expect("user should exist");
    assert_eq!(by_name.email, "a@b.com");

    let by_id = UserRepository::find_by_id(&client, user.id)
        .await
        .expect("should query");
    assert_eq!(by_id.map(|u| u.username), Some("alice".to_string()));
}

#[tokio::test]
async fn test_unknown_user_is_none() {
    let client = create_test_client().await;

    assert!(client
        .find_by_email("nobody@b.com")
        .await
        .expect("should query")
        .is_none());
    assert!(UserRepository::find_by_id(&client, 99)
        .await
        .expect("should query")
        .is_none());
}

#[tokio::test]
async fn test_create_duplicate_user_fails() {
    let client = create_test_client().await;
    create_user(&client, "alice", "a@b.com").await;

    let same_email = UserRepository::create(&client, new_user("bobby", "a@b.com")).await;
    assert!(matches!(
        same_email,
        Err(AppError::DuplicateIdentity(IdentityField::Email))
    ));

    let same_name = UserRepository::create(&client, new_user("alice", "c@d.com")).await;
    assert!(matches!(
        same_name,
        Err(AppError::DuplicateIdentity(IdentityField::Username))
    ));
}

#[tokio::test]
async fn test_empty_password_hash_is_rejected() {
    let client = create_test_client().await;

    let mut user = new_user("alice", "a@b.com");
    user.password_hash = String::new();

    let result = UserRepository::create(&client, user).await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_todo_crud() {
    let client = create_test_client().await;
    let user = create_user(&client, "alice", "a@b.com").await;

    let todo = create_todo(&client, user.id, "buy milk").await;
    assert_eq!(todo.title, "buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.user_id, user.id);

    let mut changed = todo.clone();
    changed.title = "buy oat milk".to_string();
    changed.completed = true;
    let updated = client.update(&changed).await.expect("should update");
    assert_eq!(updated.title, "buy oat milk");
    assert!(updated.completed);
    assert_eq!(updated.created_at, todo.created_at);

    let fetched = TodoRepository::find_by_id(&client, todo.id)
        .await
        .expect("should query")
        .expect("todo should exist");
    assert_eq!(fetched, updated);

    client.delete(&updated).await.expect("should delete");
    assert!(TodoRepository::find_by_id(&client, todo.id)
        .await
        .expect("should query")
        .is_none());
}

#[tokio::test]
async fn test_update_missing_todo_is_not_found() {
    let client = create_test_client().await;
    let user = create_user(&client, "alice", "a@b.com").await;
    let todo = create_todo(&client, user.id, "ephemeral").await;
    client.delete(&todo).await.expect("should delete");

    let result = client.update(&todo).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_by_owner() {
    let client = create_test_client().await;
    let alice = create_user(&client, "alice", "a@b.com").await;
    let bob = create_user(&client, "bobby", "b@b.com").await;

    create_todo(&client, alice.id, "first").await;
    create_todo(&client, bob.id, "bob's").await;
    create_todo(&client, alice.id, "second").await;

    let titles: Vec<String> = client
        .list_by_owner(alice.id)
        .await
        .expect("should list")
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[tokio::test]
async fn test_todo_for_unknown_user_is_rejected() {
    let client = create_test_client().await;

    let result = TodoRepository::create(
        &client,
        NewTodo {
            title: "orphan".to_string(),
            user_id: 404,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_file_database_persists_across_clients() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("nested").join("todo.db");
    let path = path.to_str().expect("utf-8 path");

    {
        let client = TursoClient::new_local(path)
            .await
            .expect("should create file database");
        let user = create_user(&client, "alice", "a@b.com").await;
        create_todo(&client, user.id, "survive restart").await;
    }

    let reopened = TursoClient::new_local(path)
        .await
        .expect("should reopen file database");
    let user = reopened
        .find_by_email("a@b.com")
        .await
        .expect("should query")
        .expect("user should persist");
    let todos = reopened
        .list_by_owner(user.id)
        .await
        .expect("should list");

    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "survive restart");
}
