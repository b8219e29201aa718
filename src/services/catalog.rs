//! Catalog management service: authors, genres, books and comments

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{AuthorDetail, AuthorForm},
        book::BookForm,
        comment::CommentForm,
        form::{validate_form, FormErrors},
        genre::{GenreDetail, GenreForm},
        Author, Book, Comment, Genre,
    },
    repository::{AuthorStore, BookStore, CommentStore, GenreStore},
};

#[derive(Clone)]
pub struct CatalogService {
    authors: Arc<dyn AuthorStore>,
    books: Arc<dyn BookStore>,
    comments: Arc<dyn CommentStore>,
    genres: Arc<dyn GenreStore>,
}

impl CatalogService {
    pub fn new(
        authors: Arc<dyn AuthorStore>,
        books: Arc<dyn BookStore>,
        comments: Arc<dyn CommentStore>,
        genres: Arc<dyn GenreStore>,
    ) -> Self {
        Self {
            authors,
            books,
            comments,
            genres,
        }
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.authors.list().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.authors
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn author_detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.get_author(id).await?;
        let books = self.books.by_author(id).await?;
        Ok(AuthorDetail { author, books })
    }

    pub async fn create_author(&self, form: AuthorForm) -> AppResult<Author> {
        validate_form(&form)?;
        let author = self.authors.save(&Author::new(form.surname)).await?;
        tracing::info!("Created author id={:?}", author.id);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, form: AuthorForm) -> AppResult<Author> {
        validate_form(&form)?;
        let mut author = self.get_author(id).await?;
        author.surname = form.surname;
        self.authors.save(&author).await
    }

    /// Delete an author. Rejected while any book still references them.
    pub async fn delete_author(&self, id: i32) -> AppResult<Author> {
        let author = self.get_author(id).await?;
        self.authors.remove(&author).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(author)
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.genres
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    pub async fn genre_detail(&self, id: i32) -> AppResult<GenreDetail> {
        let genre = self.get_genre(id).await?;
        let books = self.books.by_genre(id).await?;
        Ok(GenreDetail { genre, books })
    }

    pub async fn create_genre(&self, form: GenreForm) -> AppResult<Genre> {
        validate_form(&form)?;
        let genre = self.genres.save(&Genre::new(form.name)).await?;
        tracing::info!("Created genre id={:?}", genre.id);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, form: GenreForm) -> AppResult<Genre> {
        validate_form(&form)?;
        let mut genre = self.get_genre(id).await?;
        genre.name = form.name;
        self.genres.save(&genre).await
    }

    /// Delete a genre; books filed under it simply lose the link
    pub async fn delete_genre(&self, id: i32) -> AppResult<Genre> {
        let genre = self.get_genre(id).await?;
        self.genres.remove(&genre).await?;
        tracing::info!("Deleted genre id={}", id);
        Ok(genre)
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// All books, or only those with a genre whose name contains `genre`
    pub async fn list_books(&self, genre: Option<String>) -> AppResult<Vec<Book>> {
        self.books.by_genre_like(genre).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.books
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Resolve the author and genres a book form points at
    async fn bind_book(&self, form: &BookForm) -> AppResult<(Author, Vec<Genre>)> {
        validate_form(form)?;

        let mut errors = FormErrors::new();

        let author = match form.author_id {
            Some(id) => self.authors.find(id).await?,
            None => None,
        };
        if author.is_none() {
            errors.add("author_id", "The selected author does not exist");
        }

        let mut ids = form.genre_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        let genres = self.genres.find_many(ids.clone()).await?;
        if genres.len() != ids.len() {
            errors.add("genre_ids", "One or more selected genres do not exist");
        }

        errors.into_result(form)?;
        let author = author.ok_or_else(|| AppError::Internal("Unbound book author".to_string()))?;
        Ok((author, genres))
    }

    pub async fn create_book(&self, form: BookForm) -> AppResult<Book> {
        let (author, genres) = self.bind_book(&form).await?;
        let book = Book::new(form.title, form.description, author, genres);
        let book = self.books.save(&book).await?;
        tracing::info!("Created book id={:?}", book.id);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, form: BookForm) -> AppResult<Book> {
        let mut book = self.get_book(id).await?;
        let (author, genres) = self.bind_book(&form).await?;

        book.title = form.title;
        book.description = form.description;
        book.author = author;

        let dropped: Vec<Genre> = book
            .genres
            .iter()
            .filter(|g| !genres.iter().any(|n| n.id == g.id))
            .cloned()
            .collect();
        for genre in &dropped {
            book.remove_genre(genre);
        }
        for genre in genres {
            book.add_genre(genre);
        }

        self.books.save(&book).await
    }

    /// Delete a book together with its comments
    pub async fn delete_book(&self, id: i32) -> AppResult<Book> {
        let book = self.get_book(id).await?;
        self.books.remove(&book).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(book)
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    pub async fn list_comments(&self) -> AppResult<Vec<Comment>> {
        self.comments.list().await
    }

    pub async fn comments_for_book(&self, book_id: i32) -> AppResult<Vec<Comment>> {
        self.comments.by_book(book_id).await
    }

    pub async fn get_comment(&self, id: i32) -> AppResult<Comment> {
        self.comments
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
    }

    /// Book a comment was left on
    pub async fn comment_book(&self, comment: &Comment) -> AppResult<Book> {
        self.get_book(comment.book_id).await
    }

    pub async fn create_comment(&self, book_id: i32, form: CommentForm) -> AppResult<Comment> {
        let book = self.get_book(book_id).await?;
        validate_form(&form)?;
        let book_id = book
            .id
            .ok_or_else(|| AppError::Internal("Stored book without id".to_string()))?;
        self.comments.save(&Comment::from_form(book_id, form)).await
    }

    pub async fn update_comment(&self, id: i32, form: CommentForm) -> AppResult<Comment> {
        validate_form(&form)?;
        let mut comment = self.get_comment(id).await?;
        comment.apply(form);
        self.comments.save(&comment).await
    }

    pub async fn delete_comment(&self, id: i32) -> AppResult<Comment> {
        let comment = self.get_comment(id).await?;
        self.comments.remove(&comment).await?;
        Ok(comment)
    }
}
