//! Persistence tests against a throwaway Postgres database per test.
//!
//! Run with: DATABASE_URL=postgres://... cargo test --test repository_tests -- --ignored

use std::time::Duration;

use sqlx::PgPool;

use libris_server::{
    models::{Author, Book, Comment, Genre},
    repository::{AuthorStore, BookStore, CommentStore, GenreStore, Repository},
    AppError,
};

async fn author(repo: &Repository, surname: &str) -> Author {
    repo.authors.save(&Author::new(surname)).await.unwrap()
}

async fn genre(repo: &Repository, name: &str) -> Genre {
    repo.genres.save(&Genre::new(name)).await.unwrap()
}

async fn book(repo: &Repository, title: &str, author: &Author, genres: Vec<Genre>) -> Book {
    repo.books
        .save(&Book::new(title, "About the book", author.clone(), genres))
        .await
        .unwrap()
}

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn genre_fragment_matches_containing_names(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let history = genre(&repo, "History").await;

    book(&repo, "A", &lem, vec![sf.clone()]).await;
    book(&repo, "B", &lem, vec![history.clone()]).await;
    book(&repo, "C", &lem, vec![sf, history]).await;

    let books = repo.books.by_genre_like(Some("Sci".into())).await.unwrap();
    assert_eq!(titles(&books), vec!["A", "C"]);

    // LIKE is case-sensitive
    let books = repo.books.by_genre_like(Some("sci".into())).await.unwrap();
    assert!(books.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn empty_or_missing_filter_lists_every_book(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let poetry = genre(&repo, "Poetry").await;
    book(&repo, "A", &lem, vec![sf]).await;
    book(&repo, "B", &lem, vec![poetry]).await;

    let none = repo.books.by_genre_like(None).await.unwrap();
    let empty = repo.books.by_genre_like(Some(String::new())).await.unwrap();
    assert_eq!(none, empty);
    assert_eq!(titles(&none), vec!["A", "B"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn book_matching_several_genres_is_listed_once(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let a = genre(&repo, "Science Fiction").await;
    let b = genre(&repo, "Social Science").await;
    book(&repo, "Both", &lem, vec![a, b]).await;

    let books = repo.books.by_genre_like(Some("Science".into())).await.unwrap();
    assert_eq!(titles(&books), vec!["Both"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn author_with_books_cannot_be_removed(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let solaris = book(&repo, "Solaris", &lem, vec![sf]).await;

    match repo.authors.remove(&lem).await {
        Err(AppError::BusinessRule(key)) => assert_eq!(key, "cant_remove_author_with_books"),
        other => panic!("expected business rule error, got {:?}", other),
    }
    assert_eq!(repo.authors.find(lem.id.unwrap()).await.unwrap(), Some(lem.clone()));
    let kept = repo.books.find(solaris.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(kept, solaris);
    assert_eq!(kept.author, lem);

    repo.books.remove(&solaris).await.unwrap();
    repo.authors.remove(&lem).await.unwrap();
    assert!(repo.authors.find(lem.id.unwrap()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn author_removal_waits_for_a_pending_book_insert(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let lem = author(&repo, "Lem").await;
    let author_id = lem.id.unwrap();

    // A book write in flight: share lock on the author, insert not yet committed
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM authors WHERE id = $1 FOR SHARE")
        .bind(author_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("INSERT INTO books (author_id, title, description) VALUES ($1, 'Pending', 'Not yet visible')")
        .bind(author_id)
        .execute(&mut *tx)
        .await
        .unwrap();

    let remover = {
        let repo = repo.clone();
        let lem = lem.clone();
        tokio::spawn(async move { repo.authors.remove(&lem).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!remover.is_finished(), "removal must wait for the book write");

    tx.commit().await.unwrap();

    match remover.await.unwrap() {
        Err(AppError::BusinessRule(key)) => assert_eq!(key, "cant_remove_author_with_books"),
        other => panic!("expected business rule error, got {:?}", other),
    }
    assert!(repo.authors.find(author_id).await.unwrap().is_some());
    let books = repo.books.by_author(author_id).await.unwrap();
    assert_eq!(titles(&books), vec!["Pending"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn genre_links_are_visible_from_both_sides(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let history = genre(&repo, "History").await;
    let mut solaris = book(&repo, "Solaris", &lem, vec![sf.clone()]).await;

    assert!(solaris.add_genre(history.clone()));
    repo.books.save(&solaris).await.unwrap();
    let reloaded = repo.books.find(solaris.id.unwrap()).await.unwrap().unwrap();
    assert!(reloaded.has_genre(&history));
    let by_history = repo.books.by_genre(history.id.unwrap()).await.unwrap();
    assert_eq!(titles(&by_history), vec!["Solaris"]);

    assert!(solaris.remove_genre(&history));
    repo.books.save(&solaris).await.unwrap();
    let reloaded = repo.books.find(solaris.id.unwrap()).await.unwrap().unwrap();
    assert!(!reloaded.has_genre(&history));
    assert!(reloaded.has_genre(&sf));
    assert!(repo.books.by_genre(history.id.unwrap()).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn update_keeps_creation_time(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let mut solaris = book(&repo, "Solaris", &lem, vec![sf]).await;
    let created_at = solaris.created_at;
    assert!(created_at.is_some());

    solaris.title = "Solaris Revisited".into();
    let saved = repo.books.save(&solaris).await.unwrap();
    assert_eq!(saved.created_at, created_at);
    assert_eq!(saved.title, "Solaris Revisited");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn comment_reloads_with_its_book(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let solaris = book(&repo, "Solaris", &lem, vec![sf]).await;
    let book_id = solaris.id.unwrap();

    let comment = Comment {
        id: None,
        book_id,
        content: "Great".into(),
        email: "reader@example.com".into(),
        nick: "reader".into(),
        created_at: None,
    };
    let saved = repo.comments.save(&comment).await.unwrap();
    let reloaded = repo.comments.find(saved.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(reloaded.book_id, book_id);
    assert_eq!(repo.comments.by_book(book_id).await.unwrap(), vec![reloaded]);

    // Comments go along with their book
    repo.books.remove(&solaris).await.unwrap();
    assert!(repo.comments.find(saved.id.unwrap()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn removing_a_genre_unlinks_its_books(pool: PgPool) {
    let repo = Repository::new(pool);
    let lem = author(&repo, "Lem").await;
    let sf = genre(&repo, "Science Fiction").await;
    let history = genre(&repo, "History").await;
    let solaris = book(&repo, "Solaris", &lem, vec![sf.clone(), history]).await;

    repo.genres.remove(&sf).await.unwrap();
    let reloaded = repo.books.find(solaris.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(reloaded.genres.len(), 1);
    assert!(!reloaded.has_genre(&sf));
}
