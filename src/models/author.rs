//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::Book, patterns::LETTERS};

/// Author record. `id` is `None` until first saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Option<i32>,
    pub surname: String,
}

impl Author {
    pub fn new(surname: impl Into<String>) -> Self {
        Self {
            id: None,
            surname: surname.into(),
        }
    }
}

/// Submitted author form (new and edit)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, max = 255, message = "Surname must be between 1 and 255 characters"),
        regex(path = *LETTERS, message = "Surname may only contain letters and spaces")
    )]
    pub surname: String,
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            surname: author.surname.clone(),
        }
    }
}

/// Author page: the author and the books they wrote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}
