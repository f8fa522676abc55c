//! Pagination query parameters.

use serde::{Deserialize, Serialize};

use alumni_core::types::PageRequest;

/// `?page=&per_page=`; both optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// Converts to a clamped `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let page = PaginationParams::default().into_page_request();
        assert_eq!((page.page, page.per_page), (1, 20));

        let page = PaginationParams {
            page: Some(0),
            per_page: Some(1000),
        }
        .into_page_request();
        assert_eq!((page.page, page.per_page), (1, 100));
    }
}
