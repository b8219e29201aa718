//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, books, comments, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library catalog REST API: authors, books, genres and reader comments"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Admin
        admin::edit_credentials,
        admin::update_credentials,
        // Books
        books::list_books,
        books::get_book,
        books::new_book,
        books::create_book,
        books::edit_book,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::new_author,
        authors::create_author,
        authors::edit_author,
        authors::update_author,
        authors::confirm_delete_author,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::new_genre,
        genres::create_genre,
        genres::edit_genre,
        genres::update_genre,
        genres::confirm_delete_genre,
        genres::delete_genre,
        // Comments
        comments::list_comments,
        comments::get_comment,
        comments::new_comment,
        comments::create_comment,
        comments::edit_comment,
        comments::update_comment,
        comments::confirm_delete_comment,
        comments::delete_comment,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::CredentialsForm,
            // Catalog
            crate::models::author::Author,
            crate::models::author::AuthorForm,
            crate::models::author::AuthorDetail,
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::genre::Genre,
            crate::models::genre::GenreForm,
            crate::models::genre::GenreDetail,
            crate::models::comment::Comment,
            crate::models::comment::CommentForm,
            // View data
            crate::models::form::Flash,
            crate::models::form::FlashLevel,
            crate::models::form::Outcome,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FormRejection,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "admin", description = "Administrator account"),
        (name = "books", description = "Books and the genre-filtered listing"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "comments", description = "Reader comments")
    )
)]
pub struct ApiDoc;

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

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
