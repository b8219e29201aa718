//! Business logic services

pub mod auth;
pub mod catalog;
pub mod fixtures;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(Arc::new(repository.users.clone()), auth_config),
            catalog: catalog::CatalogService::new(
                Arc::new(repository.authors.clone()),
                Arc::new(repository.books.clone()),
                Arc::new(repository.comments.clone()),
                Arc::new(repository.genres.clone()),
            ),
            repository,
        }
    }
}
