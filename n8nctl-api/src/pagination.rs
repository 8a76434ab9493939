//! Cursor pagination with a repeated-cursor guard.

use std::collections::HashSet;

use n8nctl_core::{Tag, Workflow};

use crate::client::{Page, WorkflowApi};
use crate::error::ApiError;

/// Page size requested from listing endpoints.
pub const PAGE_LIMIT: usize = 100;

/// Drain a cursor-paginated listing into one ordered collection.
///
/// Stops when the server returns an absent or empty cursor. A cursor seen
/// twice fails with [`ApiError::PaginationCycle`], so at most
/// `distinct cursors + 1` pages are requested. Any page error aborts the
/// whole collection.
pub fn collect_pages<T, F>(mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    let mut items = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch_page(cursor.as_deref())?;
        items.extend(page.data);

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(ApiError::PaginationCycle { cursor: next });
                }
                tracing::debug!("following cursor {next} ({} items so far)", items.len());
                cursor = Some(next);
            }
        }
    }

    Ok(items)
}

/// Fetch every remote workflow.
pub fn fetch_all<A: WorkflowApi + ?Sized>(api: &A) -> Result<Vec<Workflow>, ApiError> {
    collect_pages(|cursor| api.list_workflows(cursor, PAGE_LIMIT))
}

/// Fetch every remote tag.
pub fn fetch_all_tags<A: WorkflowApi + ?Sized>(api: &A) -> Result<Vec<Tag>, ApiError> {
    collect_pages(|cursor| api.list_tags(cursor, PAGE_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn page(data: Vec<u32>, next: Option<&str>) -> Page<u32> {
        Page {
            data,
            next_cursor: next.map(str::to_owned),
        }
    }

    #[test]
    fn concatenates_pages_in_order() {
        let pages = vec![
            page(vec![1, 2], Some("a")),
            page(vec![3], Some("b")),
            page(vec![4], None),
        ];
        let mut iter = pages.into_iter();
        let items = collect_pages(|_| Ok(iter.next().unwrap())).unwrap();
        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_cursor_terminates() {
        let items = collect_pages(|_| Ok(page(vec![7], Some("")))).unwrap();
        assert_eq!(items, vec![7]);
    }

    #[test]
    fn repeated_cursor_is_a_cycle() {
        let calls = Cell::new(0);
        let err = collect_pages(|cursor| {
            calls.set(calls.get() + 1);
            match cursor {
                None => Ok(page(vec![1], Some("x"))),
                Some(_) => Ok(page(vec![2], Some("x"))),
            }
        })
        .unwrap_err();

        assert!(matches!(err, ApiError::PaginationCycle { ref cursor } if cursor == "x"));
        // one distinct cursor -> at most two requests
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn page_error_aborts() {
        let err = collect_pages::<u32, _>(|cursor| match cursor {
            None => Ok(page(vec![1], Some("next"))),
            Some(_) => Err(ApiError::Status {
                status: 500,
                url: "http://x/api/v1/workflows".to_string(),
                body: "boom".to_string(),
            }),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
