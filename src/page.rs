//! Pagination input and the paginated list wrapper.

use serde::{Deserialize, Serialize};

use crate::error::NebClientError;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_COUNT: u32 = 100;

/// Input properties for pagination.
///
/// Selects which page to return for list queries. When omitted the server
/// defaults to the first page with a maximum of 100 items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInput {
    page: u32,
    count: u32,
}

impl PageInput {
    /// Create a page input. `page` is 1-based; `count` is the maximum
    /// number of items per page. Both must be at least 1.
    pub fn new(page: u32, count: u32) -> Result<Self, NebClientError> {
        if page < 1 {
            return Err(NebClientError::validation("page", "must be at least 1"));
        }
        if count < 1 {
            return Err(NebClientError::validation("count", "must be at least 1"));
        }
        Ok(Self { page, count })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The maximum number of items per page.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

impl Default for PageInput {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            count: DEFAULT_COUNT,
        }
    }
}

/// A paginated list reply.
///
/// Carries one page of items plus total and filtered counts so callers can
/// detect truncation without a second round trip. An empty page with a
/// non-zero `total_count` means "no matching resource", not an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemList<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Whether more items exist on the server beyond this page.
    pub more: bool,
    /// Total number of items on the server, ignoring any filter.
    pub total_count: u64,
    /// Number of items matching the filter, before pagination.
    pub filtered_count: u64,
}

impl<T> ItemList<T> {
    /// Selection set for a list reply wrapping the given item selection.
    #[must_use]
    pub fn fields(item_fields: &str) -> String {
        format!(
            "items{{{item_fields}}},more,totalCount,filteredCount"
        )
    }

    /// Check the wrapper invariant
    /// `items.len() <= filtered_count <= total_count`.
    ///
    /// A violation indicates a client-vs-server contract mismatch and is
    /// surfaced as a protocol error, never silently clamped.
    pub(crate) fn checked(self, operation: &str) -> Result<Self, NebClientError> {
        let len = self.items.len() as u64;
        if len > self.filtered_count || self.filtered_count > self.total_count {
            return Err(NebClientError::protocol(format!(
                "{operation}: malformed list wrapper: items={len}, \
                 filteredCount={}, totalCount={}",
                self.filtered_count, self.total_count
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::NebClientError;

    #[test]
    fn page_input_rejects_zero_page() {
        let err = PageInput::new(0, 100).unwrap_err();
        assert!(matches!(
            err,
            NebClientError::Validation { field: "page", .. }
        ));
    }

    #[test]
    fn page_input_serializes_both_fields() {
        let page = PageInput::new(3, 25).unwrap();
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            json!({"page": 3, "count": 25})
        );
    }

    #[test]
    fn empty_filtered_page_is_not_an_error() {
        let list: ItemList<serde_json::Value> = serde_json::from_value(json!({
            "items": [],
            "more": false,
            "totalCount": 5,
            "filteredCount": 0
        }))
        .unwrap();
        let list = list.checked("getVolumes").unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.filtered_count, 0);
        assert_eq!(list.total_count, 5);
    }

    #[test]
    fn filtered_count_above_total_is_a_protocol_error() {
        let list: ItemList<serde_json::Value> = serde_json::from_value(json!({
            "items": [],
            "more": false,
            "totalCount": 2,
            "filteredCount": 7
        }))
        .unwrap();
        let err = list.checked("getVolumes").unwrap_err();
        assert!(matches!(err, NebClientError::Protocol { .. }));
    }

    #[test]
    fn more_items_than_filtered_count_is_a_protocol_error() {
        let list: ItemList<u32> = serde_json::from_value(json!({
            "items": [1, 2, 3],
            "more": false,
            "totalCount": 3,
            "filteredCount": 2
        }))
        .unwrap();
        assert!(list.checked("getHosts").is_err());
    }
}
