//! Pagination footer for audit tables.

use eiam_client::Page;

/// Build the footer shown under an audit page.
///
/// Page numbers are 1-based and `total` is the server-reported match count.
pub fn build_pagination_footer<T>(page: &Page<T>) -> Option<String> {
    if page.page_size == 0 {
        return None;
    }

    let shown = page.list.len() as u64;
    let offset = u64::from(page.page.saturating_sub(1)) * u64::from(page.page_size);

    if shown == 0 {
        if page.total == 0 {
            return Some("No results.".to_string());
        }
        return Some(format!(
            "Showing 0 of {} (page {} out of range, last page is {})",
            page.total,
            page.page,
            page.page_count()
        ));
    }

    let start = offset.saturating_add(1);
    let end = offset.saturating_add(shown);
    Some(format!(
        "Showing {}-{} of {} (page {} of {})",
        start,
        end,
        page.total,
        page.page,
        page.page_count()
    ))
}
