//! View data shared by every entity: flash notices, form views, outcomes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Severity of a flash notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

/// One-time notice shown on the next rendered page.
///
/// `message` is a translation key (`book_created`, `invalid_data`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: &str) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.to_string(),
        }
    }

    pub fn danger(message: &str) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.to_string(),
        }
    }
}

/// Result of a successful submission: where to go next and what to tell the user there
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Outcome {
    pub flash: Flash,
    pub redirect: String,
}

impl Outcome {
    pub fn new(flash: Flash, redirect: impl Into<String>) -> Self {
        Self {
            flash,
            redirect: redirect.into(),
        }
    }
}

/// Field name -> error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(IndexMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merge in the errors reported by `validator`
    pub fn extend_from(&mut self, errors: &ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, failures) in fields {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", failure.code));
                self.add(&field.to_string(), message);
            }
        }
    }

    /// Turn into an error carrying the submitted values, or `Ok` when empty
    pub fn into_result<T: Serialize>(self, form: &T) -> AppResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        Err(AppError::Form {
            values: serde_json::to_value(form).unwrap_or_default(),
            errors: self,
        })
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        out.extend_from(errors);
        out
    }
}

/// Run the declared field constraints of a submitted form
pub fn validate_form<T: Validate + Serialize>(form: &T) -> AppResult<()> {
    match form.validate() {
        Ok(()) => Ok(()),
        Err(e) => FormErrors::from(&e).into_result(form),
    }
}

/// A bound form ready to render (empty on "new", prefilled on "edit")
#[derive(Debug, Clone, Serialize)]
pub struct FormView<T> {
    pub form: T,
    pub errors: FormErrors,
}

impl<T> FormView<T> {
    pub fn new(form: T) -> Self {
        Self {
            form,
            errors: FormErrors::new(),
        }
    }
}

/// Deletion confirmation page for an entity
#[derive(Debug, Clone, Serialize)]
pub struct DeleteView<T> {
    pub entity: T,
    /// Where the confirmed delete is submitted
    pub action: String,
}
