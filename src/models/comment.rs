//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::patterns::LETTERS_DIGITS;

/// Reader comment on a book.
///
/// Ownership is stored once, as `book_id`; the book itself is fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: Option<i32>,
    pub book_id: i32,
    pub content: String,
    pub email: String,
    pub nick: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// New comment on `book_id` from a validated form
    pub fn from_form(book_id: i32, form: CommentForm) -> Self {
        Self {
            id: None,
            book_id,
            content: form.content,
            email: form.email,
            nick: form.nick,
            created_at: None,
        }
    }

    /// Overwrite the editable fields. Book and creation time stay as they are.
    pub fn apply(&mut self, form: CommentForm) {
        self.content = form.content;
        self.email = form.email;
        self.nick = form.nick;
    }
}

/// Submitted comment form. The book comes from the route, never from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CommentForm {
    #[validate(regex(path = *LETTERS_DIGITS, message = "Content may only contain letters, digits and spaces"))]
    pub content: String,
    #[validate(email(message = "This value is not a valid email address"))]
    pub email: String,
    #[validate(
        length(max = 255, message = "Nick must be at most 255 characters"),
        regex(path = *LETTERS_DIGITS, message = "Nick may only contain letters, digits and spaces")
    )]
    pub nick: String,
}

impl From<&Comment> for CommentForm {
    fn from(comment: &Comment) -> Self {
        Self {
            content: comment.content.clone(),
            email: comment.email.clone(),
            nick: comment.nick.clone(),
        }
    }
}
