//! Pagination of listing results

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// `?page=` query parameter of every listing
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of entries across all pages
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Slice `page` (1-based) out of `items`. Pages past the end are empty.
    pub fn paginate(items: Vec<T>, page: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = items.len() as i64;
        let total_pages = (total + per_page - 1) / per_page;
        let offset = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);

        let items = items
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
