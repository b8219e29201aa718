//! Comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{
        comment::CommentForm,
        form::{DeleteView, FormView},
        page::PageQuery,
        Book, Comment, Flash, Outcome, Page,
    },
};

use super::AdminUser;

/// Comment together with the book it was left on
#[derive(Serialize)]
pub struct CommentDetail {
    pub comment: Comment,
    pub book: Book,
}

/// Comment form for a given book
#[derive(Serialize)]
pub struct CommentFormPage {
    #[serde(flatten)]
    pub view: FormView<CommentForm>,
    pub book: Book,
}

/// List all comments, paginated
#[utoipa::path(
    get,
    path = "/comments",
    tag = "comments",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of comments")
    )
)]
pub async fn list_comments(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Comment>>> {
    let comments = state.services.catalog.list_comments().await?;
    Ok(Json(Page::paginate(
        comments,
        query.number(),
        state.config.catalog.page_size,
    )))
}

/// Comment details
#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment with its book"),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_comment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CommentDetail>> {
    let comment = state.services.catalog.get_comment(id).await?;
    let book = state.services.catalog.comment_book(&comment).await?;
    Ok(Json(CommentDetail { comment, book }))
}

/// Empty comment form for a book
#[utoipa::path(
    get,
    path = "/books/{id}/comments/new",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Empty form"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn new_comment(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<CommentFormPage>> {
    let book = state.services.catalog.get_book(book_id).await?;
    Ok(Json(CommentFormPage {
        view: FormView::new(CommentForm::default()),
        book,
    }))
}

/// Comment on a book
#[utoipa::path(
    post,
    path = "/books/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CommentForm,
    responses(
        (status = 201, description = "Comment created", body = Outcome),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    Json(form): Json<CommentForm>,
) -> AppResult<(StatusCode, Json<Outcome>)> {
    let comment = state.services.catalog.create_comment(book_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Outcome::new(
            Flash::success("created_successfully"),
            format!("/books/{}", comment.book_id),
        )),
    ))
}

/// Comment form prefilled for editing
#[utoipa::path(
    get,
    path = "/comments/{id}/edit",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Prefilled form"),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_comment(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<FormView<CommentForm>>> {
    let comment = state.services.catalog.get_comment(id).await?;
    Ok(Json(FormView::new(CommentForm::from(&comment))))
}

/// Update a comment
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    request_body = CommentForm,
    responses(
        (status = 200, description = "Comment updated", body = Outcome),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_comment(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(form): Json<CommentForm>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.update_comment(id, form).await?;
    Ok(Json(Outcome::new(Flash::success("updated_successfully"), "/comments")))
}

/// Deletion confirmation
#[utoipa::path(
    get,
    path = "/comments/{id}/delete",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment to delete"),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_comment(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteView<Comment>>> {
    let comment = state.services.catalog.get_comment(id).await?;
    Ok(Json(DeleteView {
        entity: comment,
        action: format!("/comments/{}", id),
    }))
}

/// Delete a comment
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = Outcome),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_comment(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Outcome>> {
    let comment = state.services.catalog.delete_comment(id).await?;
    Ok(Json(Outcome::new(
        Flash::success("deleted_successfully"),
        format!("/books/{}", comment.book_id),
    )))
}
