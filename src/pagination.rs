//! Page-number/page-size contract shared by every list endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Raw pagination query parameters, kept as strings so garbage input
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    page_number: Option<String>,
    page_size: Option<String>,
}

impl PageQuery {
    /// Coerce both parameters. Non-numeric, empty or non-positive values
    /// fall back to the defaults.
    pub fn page(&self) -> Page {
        Page {
            number: coerce(self.page_number.as_deref(), DEFAULT_PAGE_NUMBER),
            size: coerce(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        }
    }
}

fn coerce(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    /// Rows to skip before the first returned item.
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    /// Rows to return at most.
    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// Paging block of every list response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_number: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl Paging {
    /// Build the paging block for `total_count` items.
    ///
    /// `is_last_page` intentionally uses exact equality: a page number past
    /// `total_pages` yields an empty page that still reports
    /// `is_last_page: false`.
    pub fn new(page: Page, total_count: i64) -> Self {
        let total_pages = (total_count + page.size - 1) / page.size;

        Self {
            page_number: page.number,
            page_size: page.size,
            total_count,
            total_pages,
            is_first_page: page.number == DEFAULT_PAGE_NUMBER,
            is_last_page: page.number == total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(number: Option<&str>, size: Option<&str>) -> Page {
        PageQuery {
            page_number: number.map(str::to_owned),
            page_size: size.map(str::to_owned),
        }
        .page()
    }

    #[test]
    fn test_defaults() {
        let page = query(None, None);
        assert_eq!(page.number, DEFAULT_PAGE_NUMBER);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        for raw in ["", "abc", "12abc", "-3", "0", "1.5"] {
            let page = query(Some(raw), Some(raw));
            assert_eq!(page.number, DEFAULT_PAGE_NUMBER, "pageNumber {raw:?}");
            assert_eq!(page.size, DEFAULT_PAGE_SIZE, "pageSize {raw:?}");
        }
    }

    #[test]
    fn test_offset_arithmetic() {
        let page = query(Some("3"), Some("20"));
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, size, pages) in
            [(0, 50, 0), (1, 50, 1), (50, 50, 1), (51, 50, 2), (5, 2, 3)]
        {
            let paging = Paging::new(Page { number: 1, size }, total);
            assert_eq!(paging.total_pages, pages, "{total}/{size}");
        }
    }

    #[test]
    fn test_first_and_last_page_flags() {
        let paging = Paging::new(Page { number: 1, size: 2 }, 5);
        assert!(paging.is_first_page);
        assert!(!paging.is_last_page);

        let paging = Paging::new(Page { number: 3, size: 2 }, 5);
        assert!(!paging.is_first_page);
        assert!(paging.is_last_page);
    }

    #[test]
    fn test_page_past_the_end_is_not_last() {
        // Literal equality check, kept on purpose: page 5 of 3 is empty
        // yet not reported as the last page.
        let paging = Paging::new(Page { number: 5, size: 2 }, 5);
        assert_eq!(paging.total_pages, 3);
        assert!(!paging.is_last_page);
    }

    #[test]
    fn test_empty_collection_has_no_last_page() {
        let paging = Paging::new(Page { number: 1, size: 50 }, 0);
        assert_eq!(paging.total_pages, 0);
        assert!(paging.is_first_page);
        assert!(!paging.is_last_page);
    }

    #[test]
    fn test_envelope_field_names() {
        let paging = Paging::new(Page { number: 1, size: 2 }, 5);
        let json = serde_json::to_value(&paging).unwrap();

        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalCount"], 5);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["isFirstPage"], true);
        assert_eq!(json["isLastPage"], false);
    }
}
