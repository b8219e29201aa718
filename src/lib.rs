//! Libris library catalog server
//!
//! REST JSON API for a small library catalog: authors, books filed under
//! genres, and reader comments, with an administrator account for editing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route(
            "/admin",
            get(api::admin::edit_credentials).put(api::admin::update_credentials),
        )
        // Books
        .route(
            "/books",
            get(api::books::list_books).post(api::books::create_book),
        )
        .route("/books/new", get(api::books::new_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route("/books/:id/edit", get(api::books::edit_book))
        .route("/books/:id/delete", get(api::books::confirm_delete_book))
        .route("/books/:id/comments", post(api::comments::create_comment))
        .route("/books/:id/comments/new", get(api::comments::new_comment))
        // Authors
        .route(
            "/authors",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route("/authors/new", get(api::authors::new_author))
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route("/authors/:id/edit", get(api::authors::edit_author))
        .route("/authors/:id/delete", get(api::authors::confirm_delete_author))
        // Genres
        .route(
            "/genres",
            get(api::genres::list_genres).post(api::genres::create_genre),
        )
        .route("/genres/new", get(api::genres::new_genre))
        .route(
            "/genres/:id",
            get(api::genres::get_genre)
                .put(api::genres::update_genre)
                .delete(api::genres::delete_genre),
        )
        .route("/genres/:id/edit", get(api::genres::edit_genre))
        .route("/genres/:id/delete", get(api::genres::confirm_delete_genre))
        // Comments
        .route("/comments", get(api::comments::list_comments))
        .route(
            "/comments/:id",
            get(api::comments::get_comment)
                .put(api::comments::update_comment)
                .delete(api::comments::delete_comment),
        )
        .route("/comments/:id/edit", get(api::comments::edit_comment))
        .route("/comments/:id/delete", get(api::comments::confirm_delete_comment))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::{
        models::user::{UserClaims, ROLE_ADMIN, ROLE_USER},
        repository::Repository,
        services::Services,
    };

    // Only routes that never reach the database are exercised here
    fn app() -> Router {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = Services::new(Repository::new(pool), config.auth.clone());
        create_router(AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }

    fn token(roles: &[&str]) -> String {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "someone@example.com".into(),
            user_id: 1,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: now + 3600,
            iat: now,
        }
        .create_token(&AppConfig::default().auth.jwt_secret)
        .unwrap()
    }

    fn post_author(bearer: Option<String>) -> Request<Body> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/authors")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(bearer) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        }
        request.body(Body::from(r#"{"surname":"Lem"}"#)).unwrap()
    }

    #[tokio::test]
    async fn health_answers_without_database() {
        let response = app()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mutations_require_a_token() {
        let response = app().oneshot(post_author(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(post_author(Some("not-a-jwt".into())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mutations_require_the_admin_role() {
        let response = app()
            .oneshot(post_author(Some(token(&[ROLE_USER]))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_gets_empty_forms() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/genres/new")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token(&[ROLE_USER, ROLE_ADMIN])))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let view: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["form"]["name"], "");
        assert!(view["errors"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_body_is_rendered_back_as_form_errors() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/authors")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token(&[ROLE_USER, ROLE_ADMIN])))
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["form"]["values"]["surname"], "");
        assert!(error["form"]["errors"]["surname"].is_array());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
