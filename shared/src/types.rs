//! Common types used across the portal

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters (1-based page index)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Page 0 is read as page 1; page size is clamped to 1..=MAX_PER_PAGE
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Slice one page out of an already-ordered list
pub fn paginate<T>(items: Vec<T>, pagination: &Pagination) -> PaginatedResponse<T> {
    let Pagination { page, per_page } = pagination.normalized();
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(u64::from(per_page)) as u32;

    let start = (page as usize - 1).saturating_mul(per_page as usize);
    let data = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    PaginatedResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total_items,
            total_pages,
        },
    }
}

/// Case-insensitive substring match over any field; a blank term matches everything
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(items, &Pagination::new(2, 10));

        assert_eq!(page.data, (11..=20).collect::<Vec<_>>());
        assert_eq!(
            page.pagination,
            PaginationMeta {
                page: 2,
                per_page: 10,
                total_items: 25,
                total_pages: 3,
            }
        );
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(items, &Pagination::new(3, 10));
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        let page = paginate(items, &Pagination::new(4, 10));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_paginate_normalizes_input() {
        let items: Vec<u32> = (1..=5).collect();
        let page = paginate(items, &Pagination::new(0, 0));
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.per_page, 1);
        assert_eq!(page.data, vec![1]);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), &Pagination::default());
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("", &["anything"]));
        assert!(matches_search("  bl-98 ", &["BL-987654", "x"]));
        assert!(!matches_search("zzz", &["BL-987654", "Acme"]));
    }
}
