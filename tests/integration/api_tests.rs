//! API integration tests against a running server seeded with the default admin

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated admin client token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin1@example.com",
            "password": "admin1234"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .header("Authorization", format!("Bearer {}", token))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

/// Find the id of the most recent entity named `name` in a listing
async fn find_id(client: &Client, path: &str, field: &str, name: &str) -> i64 {
    let mut page = 1;
    let mut found = None;
    loop {
        let body: Value = client
            .get(format!("{}{}?page={}", BASE_URL, path, page))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");

        for item in body["items"].as_array().expect("items") {
            if item[field] == name {
                found = item["id"].as_i64();
            }
        }
        if page >= body["total_pages"].as_i64().unwrap_or(0) {
            break;
        }
        page += 1;
    }
    found.expect("entity not listed")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin1@example.com",
            "password": "admin1234"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin1@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "admin1@example.com");
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public_and_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"]["items"].is_array());
    assert_eq!(body["books"]["per_page"], 10);
    assert!(body["flashes"].as_array().expect("flashes").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_invalid_genre_filter_lists_everything_with_notice() {
    let client = Client::new();

    let all: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .get(format!("{}/books?genre=Science%20Fiction%25", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["flashes"][0]["level"], "danger");
    assert_eq!(body["flashes"][0]["message"], "invalid_data");
    assert!(body["genre"].is_null());
    assert_eq!(body["books"]["total"], all["books"]["total"]);
}

#[tokio::test]
#[ignore]
async fn test_catalog_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Author and genre
    let outcome = create(&client, &token, "/authors", json!({ "surname": "Integration" })).await;
    assert_eq!(outcome["flash"]["message"], "created_successfully");
    let author_id = find_id(&client, "/authors", "surname", "Integration").await;

    let outcome = create(&client, &token, "/genres", json!({ "name": "Xenofiction" })).await;
    assert_eq!(outcome["flash"]["message"], "genre_created");
    let genre_id = find_id(&client, "/genres", "name", "Xenofiction").await;

    // Book
    let outcome = create(
        &client,
        &token,
        "/books",
        json!({
            "title": "Lifecycle",
            "description": "Created by the API tests",
            "author_id": author_id,
            "genre_ids": [genre_id]
        }),
    )
    .await;
    assert_eq!(outcome["flash"]["message"], "book_created");
    assert_eq!(outcome["redirect"], "/books");

    let listing: Value = client
        .get(format!("{}/books?genre=Xeno", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listing["genre"], "Xeno");
    let book = listing["books"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .find(|b| b["title"] == "Lifecycle")
        .cloned()
        .expect("book listed under its genre");
    let book_id = book["id"].as_i64().expect("book id");

    // The author cannot go while the book exists
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["flash"]["message"], "cant_remove_author_with_books");

    // Public comment
    let outcome = create(
        &client,
        "",
        &format!("/books/{}/comments", book_id),
        json!({ "content": "Nice", "email": "reader@example.com", "nick": "reader" }),
    )
    .await;
    assert_eq!(outcome["redirect"], format!("/books/{}", book_id));

    let detail: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["comments"]["total"], 1);
    assert_eq!(detail["comments"]["items"][0]["book_id"], book_id);

    // Cleanup: book (with its comment), then the author and genre
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["flash"]["message"], "book_deleted");

    for path in [format!("/authors/{}", author_id), format!("/genres/{}", genre_id)] {
        let response = client
            .delete(format!("{}{}", BASE_URL, path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }
}

#[tokio::test]
#[ignore]
async fn test_invalid_form_is_rendered_back() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "surname": "R2D2" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["form"]["values"]["surname"], "R2D2");
    assert!(body["form"]["errors"]["surname"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_admin_wrong_confirmation() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .put(format!("{}/admin", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "email": "admin1@example.com",
            "password": "newpass",
            "confirm": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["flash"]["message"], "invalid_confirm_password");

    // Old credentials still work
    get_auth_token(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&json!({ "name": "Anonymous" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
