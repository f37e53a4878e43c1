use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters accepted by the catalog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
}

impl PageRequest {
    /// Pagination is opt-in: the plain array is returned unless the caller
    /// asks for a page or a page size.
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: u32,
    pub items_per_page: u32,
}

impl<T> CatalogPage<T> {
    pub fn slice(items: Vec<T>, page: u32, limit: u32) -> Self {
        let total_items = items.len();
        let per_page = limit.max(1) as usize;
        let total_pages = total_items.div_ceil(per_page);
        let start = (page.max(1) as usize - 1).saturating_mul(per_page);

        let items = items.into_iter().skip(start).take(per_page).collect();

        Self {
            items,
            total_items,
            total_pages,
            current_page: page.max(1),
            items_per_page: limit.max(1),
        }
    }
}

/// Either the full listing or one page of it, serialized untagged so the
/// unpaginated form stays a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CatalogListing<T> {
    All(Vec<T>),
    Page(CatalogPage<T>),
}

impl<T> CatalogListing<T> {
    pub fn from_request(items: Vec<T>, request: &PageRequest) -> Self {
        if request.is_paginated() {
            Self::Page(CatalogPage::slice(
                items,
                request.page(),
                request.limit(),
            ))
        } else {
            Self::All(items)
        }
    }
}
