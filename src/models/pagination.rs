use serde::{Deserialize, Serialize};

/// Every paginated listing uses the same fixed page size.
pub const PAGE_SIZE: u64 = 7;

/// Number of pages needed for `total` records. Never less than one, so an
/// empty listing still reports a single (empty) page.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// A requested page number, coerced to be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(u64);

impl PageRequest {
    pub fn new(page: u64) -> Self {
        Self(page.max(1))
    }

    /// Lenient parse of a raw `page` query value: anything missing,
    /// non-numeric or below 1 becomes page 1.
    pub fn parse(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self::new(page as u64)
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    pub fn offset(&self) -> u64 {
        (self.0 - 1).saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self(1)
    }
}

/// Totals reported alongside listings and after mutations that change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub pages: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<u64>,
}

impl Pagination {
    /// Totals only, as returned after a create or delete.
    pub fn summary(total: u64) -> Self {
        Self {
            total,
            pages: page_count(total),
            page: None,
        }
    }

    /// Totals plus the page that was served.
    pub fn for_page(total: u64, page: PageRequest) -> Self {
        Self {
            page: Some(page.number()),
            ..Self::summary(total)
        }
    }
}

/// One page of records plus its pagination summary.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(7), 1);
        assert_eq!(page_count(8), 2);
        assert_eq!(page_count(14), 2);
        assert_eq!(page_count(15), 3);
    }

    #[test]
    fn test_page_request_parse_is_lenient() {
        assert_eq!(PageRequest::parse(None).number(), 1);
        assert_eq!(PageRequest::parse(Some("")).number(), 1);
        assert_eq!(PageRequest::parse(Some("abc")).number(), 1);
        assert_eq!(PageRequest::parse(Some("0")).number(), 1);
        assert_eq!(PageRequest::parse(Some("-4")).number(), 1);
        assert_eq!(PageRequest::parse(Some("3")).number(), 3);
        assert_eq!(PageRequest::parse(Some(" 2 ")).number(), 2);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(PageRequest::new(1).offset(), 0);
        assert_eq!(PageRequest::new(2).offset(), 7);
        assert_eq!(PageRequest::new(0).offset(), 0);
    }

    #[test]
    fn test_summary_omits_page() {
        let json = serde_json::to_value(Pagination::summary(8)).unwrap();
        assert_eq!(json, serde_json::json!({ "total": 8, "pages": 2 }));

        let json = serde_json::to_value(Pagination::for_page(0, PageRequest::new(1))).unwrap();
        assert_eq!(json, serde_json::json!({ "total": 0, "pages": 1, "page": 1 }));
    }
}
