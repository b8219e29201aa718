//! Genre endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        form::{DeleteView, FormView},
        genre::{GenreDetail, GenreForm},
        page::PageQuery,
        Flash, Genre, Outcome, Page,
    },
};

use super::AdminUser;

/// List genres, paginated
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of genres")
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(Page::paginate(
        genres,
        query.number(),
        state.config.catalog.page_size,
    )))
}

/// Genre with the books filed under it
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details", body = GenreDetail),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreDetail>> {
    let detail = state.services.catalog.genre_detail(id).await?;
    Ok(Json(detail))
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/genres/new",
    tag = "genres",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty form")
    )
)]
pub async fn new_genre(_admin: AdminUser) -> Json<FormView<GenreForm>> {
    Json(FormView::new(GenreForm::default()))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = GenreForm,
    responses(
        (status = 201, description = "Genre created", body = Outcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Json(form): Json<GenreForm>,
) -> AppResult<(StatusCode, Json<Outcome>)> {
    state.services.catalog.create_genre(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Outcome::new(Flash::success("genre_created"), "/genres")),
    ))
}

/// Genre form prefilled for editing
#[utoipa::path(
    get,
    path = "/genres/{id}/edit",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Prefilled form"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_genre(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<FormView<GenreForm>>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(FormView::new(GenreForm::from(&genre))))
}

/// Rename a genre
#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    request_body = GenreForm,
    responses(
        (status = 200, description = "Genre updated", body = Outcome),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(form): Json<GenreForm>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.update_genre(id, form).await?;
    Ok(Json(Outcome::new(Flash::success("updated_successfully"), "/genres")))
}

/// Deletion confirmation
#[utoipa::path(
    get,
    path = "/genres/{id}/delete",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre to delete"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_genre(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteView<Genre>>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(DeleteView {
        entity: genre,
        action: format!("/genres/{}", id),
    }))
}

/// Delete a genre, unlinking it from its books
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre deleted", body = Outcome),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.delete_genre(id).await?;
    Ok(Json(Outcome::new(Flash::success("deleted_successfully"), "/genres")))
}
