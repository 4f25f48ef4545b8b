//! Compressed page links for paginated listings.

use log::debug;
use snafu::ensure;

pub use crate::config::*;

/// The inputs of a window of page links.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct PaginationWindow {
    pub current_page: u32,
    pub last_page: u32,
    pub on_each_side: u32,
}

impl PaginationWindow {
    pub fn new(current_page: u32, last_page: u32) -> PaginationWindow {
        PaginationWindow {
            current_page,
            last_page,
            on_each_side: DisplayRules::DEFAULT_ON_EACH_SIDE,
        }
    }

    pub fn on_each_side(self, on_each_side: u32) -> PaginationWindow {
        PaginationWindow {
            on_each_side,
            ..self
        }
    }

    pub fn markers(&self) -> Result<Vec<PageMarker>, TallyError> {
        markers(self.current_page, self.last_page, self.on_each_side)
    }
}

/// Builds the page links around the current page.
///
/// The first and the last page are always present. A gap between them and the
/// slider around the current page is collapsed into a single ellipsis.
pub fn markers(
    current_page: u32,
    last_page: u32,
    on_each_side: u32,
) -> Result<Vec<PageMarker>, TallyError> {
    ensure!(
        last_page >= 1,
        InvalidArgumentSnafu {
            message: "last page must be at least 1"
        }
    );
    ensure!(
        (1..=last_page).contains(&current_page),
        InvalidArgumentSnafu {
            message: format!("page {} is not in 1..={}", current_page, last_page)
        }
    );

    let start = current_page.saturating_sub(on_each_side).max(1);
    let end = current_page.saturating_add(on_each_side).min(last_page);

    let mut res: Vec<PageMarker> = Vec::new();
    if start > 1 {
        res.push(PageMarker::Page(1));
        if start > 2 {
            res.push(PageMarker::Ellipsis);
        }
    }
    res.extend((start..=end).map(PageMarker::Page));
    if end < last_page {
        if end + 1 < last_page {
            res.push(PageMarker::Ellipsis);
        }
        res.push(PageMarker::Page(last_page));
    }
    debug!(
        "markers: page {}/{} radius {}: {:?}",
        current_page, last_page, on_each_side, res
    );
    Ok(res)
}

/// The number of pages needed for `total_items`. An empty listing has one page.
pub fn last_page_for(total_items: usize, per_page: usize) -> Result<u32, TallyError> {
    ensure!(
        per_page > 0,
        InvalidArgumentSnafu {
            message: "per page must be at least 1"
        }
    );
    let pages = (total_items + per_page - 1) / per_page;
    Ok(pages.max(1) as u32)
}

/// The items shown on the given page, counted from 1.
pub fn page_slice<T>(items: &[T], page: u32, per_page: usize) -> Result<&[T], TallyError> {
    let last_page = last_page_for(items.len(), per_page)?;
    ensure!(
        (1..=last_page).contains(&page),
        InvalidArgumentSnafu {
            message: format!("page {} is not in 1..={}", page, last_page)
        }
    );
    let start = (page as usize - 1) * per_page;
    let end = (start + per_page).min(items.len());
    Ok(&items[start..end])
}
