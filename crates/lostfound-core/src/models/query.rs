//! Catalog search parameters and pagination.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::ItemStatus;
use crate::error::AppError;

/// Claimed/unclaimed filter as exposed in the catalog's query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Unclaimed,
    Claimed,
}

impl StatusFilter {
    /// Unknown values fall back to `All` rather than failing the request.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "unclaimed" => StatusFilter::Unclaimed,
            "claimed" => StatusFilter::Claimed,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, status: ItemStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Unclaimed => status == ItemStatus::Found,
            StatusFilter::Claimed => status == ItemStatus::Claimed,
        }
    }
}

/// Ordering by `date_found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim() == "oldest" {
            SortOrder::Oldest
        } else {
            SortOrder::Newest
        }
    }
}

/// Catalog listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Keyword matched against title, description and location
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: StatusFilter,
    pub order: SortOrder,
    /// Raw page parameter; resolved against the result count by [`Page::paginate`]
    pub page: Option<String>,
}

impl ItemQuery {
    /// Build a query from raw query-string values. Blank values are treated as absent.
    pub fn from_params(
        q: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
        order: Option<&str>,
        page: Option<&str>,
    ) -> Result<Self, AppError> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let category_id = match non_blank(category) {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| AppError::InvalidInput(format!("Unknown category: {}", raw)))?,
            ),
            None => None,
        };

        Ok(Self {
            q: non_blank(q).map(str::to_string),
            category_id,
            status: non_blank(status)
                .map(StatusFilter::parse_lenient)
                .unwrap_or_default(),
            order: non_blank(order)
                .map(SortOrder::parse_lenient)
                .unwrap_or_default(),
            page: non_blank(page).map(str::to_string),
        })
    }

    /// Case-insensitive keyword match over the searchable text fields.
    pub fn matches_keyword(&self, fields: &[&str]) -> bool {
        match &self.q {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                fields.iter().any(|f| f.to_lowercase().contains(&needle))
            }
        }
    }
}

enum PageNumber {
    Number(i64),
    /// Numeric, but beyond what fits in an `i64`
    OutOfRange,
    Invalid,
}

fn parse_page_number(raw: &str) -> PageNumber {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => PageNumber::Number(n),
        Err(_) => {
            let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                PageNumber::OutOfRange
            } else {
                PageNumber::Invalid
            }
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    /// Slice `all` into the requested page.
    ///
    /// A missing or non-numeric page serves the first page; a number below 1 or
    /// past the end serves the last page. An empty result still has one page.
    pub fn paginate(all: Vec<T>, per_page: usize, raw_page: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        let total_count = all.len();
        let num_pages = total_count.div_ceil(per_page).max(1);

        let number = match raw_page.map(parse_page_number) {
            None | Some(PageNumber::Invalid) => 1,
            Some(PageNumber::OutOfRange) => num_pages,
            Some(PageNumber::Number(n)) if n < 1 => num_pages,
            Some(PageNumber::Number(n)) => (n as usize).min(num_pages),
        };

        let items = all
            .into_iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            number,
            num_pages,
            total_count,
            per_page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params_treats_blank_as_absent() {
        let query = ItemQuery::from_params(Some("  "), Some(""), None, Some(""), None).unwrap();
        assert_eq!(query, ItemQuery::default());
    }

    #[test]
    fn test_from_params_parses_filters() {
        let cat = Uuid::new_v4();
        let query = ItemQuery::from_params(
            Some(" umbrella "),
            Some(&cat.to_string()),
            Some("claimed"),
            Some("oldest"),
            Some("2"),
        )
        .unwrap();
        assert_eq!(query.q.as_deref(), Some("umbrella"));
        assert_eq!(query.category_id, Some(cat));
        assert_eq!(query.status, StatusFilter::Claimed);
        assert_eq!(query.order, SortOrder::Oldest);
        assert_eq!(query.page.as_deref(), Some("2"));
    }

    #[test]
    fn test_from_params_rejects_malformed_category() {
        assert!(ItemQuery::from_params(None, Some("12"), None, None, None).is_err());
    }

    #[test]
    fn test_unknown_status_and_order_fall_back() {
        let query =
            ItemQuery::from_params(None, None, Some("everything"), Some("random"), None).unwrap();
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.order, SortOrder::Newest);
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(ItemStatus::Claimed));
        assert!(StatusFilter::Unclaimed.matches(ItemStatus::Found));
        assert!(!StatusFilter::Unclaimed.matches(ItemStatus::Claimed));
        assert!(StatusFilter::Claimed.matches(ItemStatus::Claimed));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let query = ItemQuery {
            q: Some("LIBRARY".to_string()),
            ..Default::default()
        };
        assert!(query.matches_keyword(&["Keys", "found near the library desk"]));
        assert!(!query.matches_keyword(&["Keys", "gym"]));
    }

    #[test]
    fn test_paginate_clamps_like_get_page() {
        let all: Vec<u32> = (1..=20).collect();

        let first = Page::paginate(all.clone(), 9, None);
        assert_eq!(first.items, (1..=9).collect::<Vec<_>>());
        assert_eq!(first.num_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = Page::paginate(all.clone(), 9, Some("3"));
        assert_eq!(last.items, vec![19, 20]);
        assert!(!last.has_next());

        assert_eq!(Page::paginate(all.clone(), 9, Some("abc")).number, 1);
        assert_eq!(Page::paginate(all.clone(), 9, Some("99")).number, 3);
        assert_eq!(Page::paginate(all, 9, Some("0")).number, 3);
    }

    #[test]
    fn test_paginate_overflowing_page_serves_last() {
        let all: Vec<u32> = (1..=20).collect();
        assert_eq!(
            Page::paginate(all.clone(), 9, Some("99999999999999999999")).number,
            3
        );
        assert_eq!(
            Page::paginate(all.clone(), 9, Some("-99999999999999999999")).number,
            3
        );
        assert_eq!(Page::paginate(all.clone(), 9, Some("12abc")).number, 1);
        assert_eq!(Page::paginate(all, 9, Some("-")).number, 1);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let page = Page::paginate(Vec::<u32>::new(), 9, Some("4"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
    }
}
