//! Response side of the pagination contract.

use serde::{Deserialize, Serialize};

use crate::cursor::{CursorError, OffsetCursor};

/// Page information for forward cursor pagination.
///
/// `has_next_page` is authoritative: an adapter may hand back a terminal
/// cursor on its last page, so callers must not infer more pages from
/// `end_cursor` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Page info for the final page.
    pub fn last() -> Self {
        Self::default()
    }

    pub fn next(end_cursor: impl Into<String>) -> Self {
        PageInfo {
            has_next_page: true,
            end_cursor: Some(end_cursor.into()),
        }
    }

    /// The cursor to request the following page with, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// One page of an archive listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        PageResult { items, page_info }
    }

    pub fn empty() -> Self {
        PageResult {
            items: Vec::new(),
            page_info: PageInfo::last(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Trim results to the requested limit and determine if there are more.
///
/// Sources should fetch `limit + 1` items. This trims to the actual limit and
/// returns whether there were more items.
pub fn trim_results<T>(mut results: Vec<T>, limit: usize) -> (Vec<T>, bool) {
    let has_more = results.len() > limit;
    results.truncate(limit);
    (results, has_more)
}

/// Paginate an already ordered, fully materialized sequence.
///
/// Used by sources that merge several collections before paging. The cursor
/// encodes how many items precede the next page, so chaining `end_cursor`
/// walks the whole sequence once.
pub fn paginate_offset<T>(
    items: Vec<T>,
    first: u32,
    after: Option<&str>,
) -> Result<PageResult<T>, CursorError> {
    let start = after
        .map(OffsetCursor::decode)
        .transpose()?
        .map(|c| c.offset())
        .unwrap_or(0);
    let start = usize::try_from(start).map_err(|_| CursorError::Invalid)?;
    let limit = first as usize;

    let window: Vec<T> = items.into_iter().skip(start).take(limit + 1).collect();
    let (page, has_more) = trim_results(window, limit);

    let page_info = if has_more {
        PageInfo::next(OffsetCursor::new((start + page.len()) as u64).encode())
    } else {
        PageInfo::last()
    };

    Ok(PageResult::new(page, page_info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim_results() {
        let items: Vec<i32> = (1..=12).collect();
        let (trimmed, has_more) = trim_results(items, 10);
        assert_eq!(trimmed.len(), 10);
        assert!(has_more);

        let items: Vec<i32> = (1..=5).collect();
        let (trimmed, has_more) = trim_results(items, 10);
        assert_eq!(trimmed.len(), 5);
        assert!(!has_more);
    }

    #[test]
    fn page_result_wire_shape() {
        let page = PageResult::new(vec![1, 2], PageInfo::next("abc"));
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({"items": [1, 2], "pageInfo": {"hasNextPage": true, "endCursor": "abc"}})
        );

        let last: PageResult<i32> = PageResult::empty();
        assert_eq!(
            serde_json::to_value(&last).unwrap(),
            json!({"items": [], "pageInfo": {"hasNextPage": false, "endCursor": null}})
        );
    }

    #[test]
    fn next_cursor_trusts_has_next_page() {
        let terminal = PageInfo {
            has_next_page: false,
            end_cursor: Some("terminal".into()),
        };
        assert_eq!(terminal.next_cursor(), None);
        assert_eq!(PageInfo::next("c").next_cursor(), Some("c"));
    }

    #[test]
    fn chaining_offset_cursors_visits_every_item_once() {
        let items: Vec<u32> = (0..23).collect();
        let mut seen = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = paginate_offset(items.clone(), 5, after.as_deref()).unwrap();
            seen.extend(page.items);
            match page.page_info.next_cursor() {
                Some(cursor) => after = Some(cursor.to_string()),
                None => {
                    assert!(page.page_info.end_cursor.is_none());
                    break;
                }
            }
        }

        assert_eq!(seen, items);
    }

    #[test]
    fn exact_multiple_ends_without_next_page() {
        let items: Vec<u32> = (0..10).collect();
        let first = paginate_offset(items.clone(), 5, None).unwrap();
        assert!(first.page_info.has_next_page);

        let second =
            paginate_offset(items, 5, first.page_info.end_cursor.as_deref()).unwrap();
        assert_eq!(second.items, vec![5, 6, 7, 8, 9]);
        assert!(!second.page_info.has_next_page);
    }

    #[test]
    fn cursor_past_the_end_is_an_empty_last_page() {
        let cursor = OffsetCursor::new(99).encode();
        let page = paginate_offset(vec![1, 2, 3], 5, Some(&cursor)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page_info, PageInfo::last());
    }

    #[test]
    fn invalid_cursor_is_rejected() {
        assert_eq!(
            paginate_offset(vec![1], 5, Some("garbage!")),
            Err(CursorError::Invalid)
        );
    }
}
