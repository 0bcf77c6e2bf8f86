//! Page requests that clamp instead of failing.
//!
//! Listing screens take a `?page=` query parameter. Anything that is not a
//! usable page number (missing, non-numeric, zero, past the end) falls back
//! to the first page rather than producing an error page.

use serde::Serialize;

/// Page sizes used by the listing screens.
pub mod sizes {
    /// Customers on the dashboard.
    pub const DASHBOARD_CUSTOMERS: u32 = 3;
    /// Recent orders on the dashboard.
    pub const DASHBOARD_ORDERS: u32 = 5;
    /// Orders on a customer's detail page.
    pub const CUSTOMER_ORDERS: u32 = 5;
    /// Products on the product list.
    pub const PRODUCTS: u32 = 5;
}

/// A requested page number, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest(u32);

impl Default for PageRequest {
    fn default() -> Self {
        Self::FIRST
    }
}

impl PageRequest {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Parse a raw `page` query value. Unusable input means page 1.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .map_or(Self::FIRST, Self)
    }

    /// The requested number, before range checking.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0
    }

    /// Resolve against the actual item count. A page past the end becomes
    /// page 1.
    #[must_use]
    pub fn resolve(self, total_items: u64, per_page: u32) -> PageWindow {
        let per_page = per_page.max(1);
        let num_pages = u32::try_from(total_items.div_ceil(u64::from(per_page)))
            .unwrap_or(u32::MAX)
            .max(1);
        let number = if self.0 > num_pages { 1 } else { self.0 };
        PageWindow {
            number,
            per_page,
            total_items,
            num_pages,
        }
    }
}

/// A resolved page position: which slice of the result set to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page number, within `1..=num_pages`.
    pub number: u32,
    pub per_page: u32,
    pub total_items: u64,
    /// Always at least 1, even for an empty result set.
    pub num_pages: u32,
}

impl PageWindow {
    /// SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.per_page)
    }

    /// Attach the fetched items.
    #[must_use]
    pub fn with_items<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            window: self,
        }
    }
}

/// One page of results plus navigation data.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub window: PageWindow,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.window.number
    }

    #[must_use]
    pub const fn num_pages(&self) -> u32 {
        self.window.num_pages
    }

    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.window.total_items
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.window.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.window.number < self.window.num_pages
    }

    #[must_use]
    pub const fn previous_number(&self) -> u32 {
        self.window.number.saturating_sub(1)
    }

    #[must_use]
    pub const fn next_number(&self) -> u32 {
        self.window.number + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_falls_back_to_first_page() {
        assert_eq!(PageRequest::parse(None), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("")), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("abc")), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("0")), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("-2")), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("2.5")), PageRequest::FIRST);
        assert_eq!(PageRequest::parse(Some("4")).number(), 4);
    }

    #[test]
    fn test_resolve_counts_pages() {
        let window = PageRequest::parse(Some("2")).resolve(11, 5);
        assert_eq!(window.num_pages, 3);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset(), 5);
        assert_eq!(window.limit(), 5);
    }

    #[test]
    fn test_resolve_out_of_range_is_first_page() {
        let window = PageRequest::parse(Some("9")).resolve(7, 3);
        assert_eq!(window.number, 1);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let window = PageRequest::FIRST.resolve(0, 5);
        assert_eq!(window.num_pages, 1);
        let page = window.with_items(Vec::<u8>::new());
        assert!(page.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_navigation() {
        let page = PageRequest::parse(Some("2"))
            .resolve(15, 5)
            .with_items(vec!['a'; 5]);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.previous_number(), 1);
        assert_eq!(page.next_number(), 3);
    }

    #[test]
    fn test_number_always_in_range() {
        for raw in ["1", "2", "3", "4", "50", "x"] {
            for total in 0..20 {
                let window = PageRequest::parse(Some(raw)).resolve(total, 3);
                assert!((1..=window.num_pages).contains(&window.number));
            }
        }
    }
}
