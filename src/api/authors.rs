//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorForm},
        form::{DeleteView, FormView},
        page::PageQuery,
        Author, Flash, Outcome, Page,
    },
};

use super::AdminUser;

/// List authors, paginated
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(Page::paginate(
        authors,
        query.number(),
        state.config.catalog.page_size,
    )))
}

/// Author with the books they wrote
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let detail = state.services.catalog.author_detail(id).await?;
    Ok(Json(detail))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/authors/new",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty form")
    )
)]
pub async fn new_author(_admin: AdminUser) -> Json<FormView<AuthorForm>> {
    Json(FormView::new(AuthorForm::default()))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorForm,
    responses(
        (status = 201, description = "Author created", body = Outcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Json(form): Json<AuthorForm>,
) -> AppResult<(StatusCode, Json<Outcome>)> {
    state.services.catalog.create_author(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Outcome::new(Flash::success("created_successfully"), "/authors")),
    ))
}

/// Author form prefilled for editing
#[utoipa::path(
    get,
    path = "/authors/{id}/edit",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Prefilled form"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_author(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<FormView<AuthorForm>>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(FormView::new(AuthorForm::from(&author))))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = AuthorForm,
    responses(
        (status = 200, description = "Author updated", body = Outcome),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(form): Json<AuthorForm>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.update_author(id, form).await?;
    Ok(Json(Outcome::new(Flash::success("updated_successfully"), "/authors")))
}

/// Deletion confirmation
#[utoipa::path(
    get,
    path = "/authors/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author to delete"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_author(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteView<Author>>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(DeleteView {
        entity: author,
        action: format!("/authors/{}", id),
    }))
}

/// Delete an author that has no books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted", body = Outcome),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Author still has books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.delete_author(id).await?;
    Ok(Json(Outcome::new(Flash::success("deleted_successfully"), "/authors")))
}
