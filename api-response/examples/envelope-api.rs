//! Envelope API Example
//!
//! This example demonstrates:
//! - Success and error envelopes
//! - Paginated listings with a named resource transformer
//! - Created/updated/destroyed responses with generated messages
//! - Configuration loading and JSON tracing
//!
//! Run with: cargo run --example envelope-api
//!
//! Test with:
//!   curl http://localhost:8080/users?page=1
//!   curl -X POST http://localhost:8080/users -d '{"name":"Alice","email":"alice@example.com"}' -H 'content-type: application/json'
//!   curl -X POST http://localhost:8080/users -d '{"name":""}' -H 'content-type: application/json'
//!   curl -X DELETE http://localhost:8080/users/1
//!   curl -X DELETE http://localhost:8080/users/99

use std::collections::HashMap;

use api_response::prelude::*;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PER_PAGE: u32 = 2;

#[derive(Clone, Serialize)]
struct User {
    id: u32,
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct NewUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

struct UserResource;

impl Resource for UserResource {
    const NAME: &'static str = "UserResource";

    fn to_value(item: Value) -> Value {
        json!({
            "id": item["id"],
            "display_name": item["name"],
        })
    }
}

fn users() -> Vec<User> {
    ["Alice", "Bob", "Carol", "Dave", "Eve"]
        .iter()
        .enumerate()
        .map(|(i, name)| User {
            id: i as u32 + 1,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .collect()
}

/// Items on the given 1-based page; pages past the end are empty
fn page_items(all: &[User], page: u32) -> Vec<User> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(PER_PAGE as usize);
    all.iter().skip(start).take(PER_PAGE as usize).cloned().collect()
}

async fn list_users(
    State(api): State<ApiResponse>,
    Query(query): Query<HashMap<String, u32>>,
) -> Result<EnvelopeResponse> {
    let all = users();
    let page = query.get("page").copied().unwrap_or(1).max(1);
    let items = page_items(&all, page);

    let paginator = LengthAwarePaginator::new(items, all.len() as u64, PER_PAGE, page)
        .with_path("/users");

    api.pagination(&paginator, Mapper::named(UserResource::NAME))
}

async fn create_user(
    State(api): State<ApiResponse>,
    Json(input): Json<NewUser>,
) -> Result<EnvelopeResponse> {
    let mut errors = serde_json::Map::new();
    if input.name.is_empty() {
        errors.insert("name".into(), json!(["The name field is required."]));
    }
    if !input.email.contains('@') {
        errors.insert("email".into(), json!(["The email must be a valid email address."]));
    }
    if !errors.is_empty() {
        return Ok(ApiResponse::error(
            Some(Value::Object(errors)),
            None,
            StatusCode::UNPROCESSABLE_ENTITY,
        ));
    }

    let user = User {
        id: 6,
        name: input.name,
        email: input.email,
    };
    Ok(api.created(Some(serde_json::to_value(user)?), Some("User"), None, false))
}

async fn delete_user(State(api): State<ApiResponse>, Path(id): Path<u32>) -> EnvelopeResponse {
    let exists = users().iter().any(|user| user.id == id);
    api.destroyed(exists, Some("User"), None, false)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let api = ApiResponse::from_config(&config).with_resource::<UserResource>();

    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", delete(delete_user))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    tracing::info!("Listening on http://127.0.0.1:8080");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_items() {
        let all = users();
        let ids = |page| page_items(&all, page).iter().map(|user| user.id).collect::<Vec<_>>();

        assert_eq!(ids(1), vec![1, 2]);
        assert_eq!(ids(3), vec![5]);
        assert!(ids(4).is_empty());
        assert!(ids(u32::MAX).is_empty());
    }
}
