//! Integration tests for page arithmetic.

use pokedex_core::{PageQuery, PageResult};

#[test]
fn test_pages_cover_every_index_exactly_once() {
    for total in [0usize, 1, 19, 20, 21, 151] {
        let mut covered = Vec::new();
        let mut page = 0;
        loop {
            let query = PageQuery::new("", "", page, 20);
            covered.extend(query.page_bounds(total));
            if !query.has_more_after(total) {
                break;
            }
            page += 1;
        }
        assert_eq!(covered, (0..total).collect::<Vec<_>>(), "total = {total}");
    }
}

#[test]
fn test_empty_page_result() {
    let page = PageResult::empty();
    assert!(page.is_empty());
    assert_eq!(page.len(), 0);
    assert!(!page.has_more);
}
