//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{
        book::{BookDetail, BookForm, BookListing, BookQuery, GenreFilter},
        form::{DeleteView, FormView},
        page::PageQuery,
        Author, Book, Flash, Genre, Outcome, Page,
    },
};

use super::AdminUser;

/// Book form together with the authors and genres it can point at
#[derive(Serialize)]
pub struct BookFormPage {
    #[serde(flatten)]
    pub view: FormView<BookForm>,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

async fn form_page(state: &crate::AppState, form: BookForm) -> AppResult<BookFormPage> {
    let catalog = &state.services.catalog;
    Ok(BookFormPage {
        view: FormView::new(form),
        authors: catalog.list_authors().await?,
        genres: catalog.list_genres().await?,
    })
}

/// List books, optionally only those in genres whose name contains `genre`.
///
/// A filter longer than the configured limit or containing anything but ASCII
/// letters and digits is ignored and reported with an `invalid_data` notice.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookListing>> {
    let filter = GenreFilter::parse(
        query.genre.as_deref(),
        state.config.catalog.genre_filter_max_len,
    );

    let mut flashes = Vec::new();
    if filter == GenreFilter::Rejected {
        tracing::debug!("Ignoring genre filter {:?}", query.genre);
        flashes.push(Flash::danger("invalid_data"));
    }

    let genre = filter.term().map(str::to_string);
    let books = state.services.catalog.list_books(genre.clone()).await?;
    let page = PageQuery { page: query.page }.number();

    Ok(Json(BookListing {
        books: Page::paginate(books, page, state.config.catalog.page_size),
        genre,
        flashes,
    }))
}

/// Book with its comments, paginated
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Book details"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book(id).await?;
    let comments = state.services.catalog.comments_for_book(id).await?;

    Ok(Json(BookDetail {
        book,
        comments: Page::paginate(comments, query.number(), state.config.catalog.page_size),
    }))
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty form with author and genre choices")
    )
)]
pub async fn new_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<BookFormPage>> {
    Ok(Json(form_page(&state, BookForm::default()).await?))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Outcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Json(form): Json<BookForm>,
) -> AppResult<(StatusCode, Json<Outcome>)> {
    state.services.catalog.create_book(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Outcome::new(Flash::success("book_created"), "/books")),
    ))
}

/// Book form prefilled for editing
#[utoipa::path(
    get,
    path = "/books/{id}/edit",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Prefilled form with author and genre choices"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookFormPage>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(form_page(&state, BookForm::from(&book)).await?))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Outcome),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.update_book(id, form).await?;
    Ok(Json(Outcome::new(Flash::success("updated_successfully"), "/books")))
}

/// Deletion confirmation
#[utoipa::path(
    get,
    path = "/books/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book to delete"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteView<Book>>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(DeleteView {
        entity: book,
        action: format!("/books/{}", id),
    }))
}

/// Delete a book with its comments
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = Outcome),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Outcome>> {
    state.services.catalog.delete_book(id).await?;
    Ok(Json(Outcome::new(Flash::success("book_deleted"), "/books")))
}
