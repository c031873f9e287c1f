//! Page index
//!
//! Keeps the page collection and the tiles' page assignments consistent.
//! Pages are addressed by id; `order` is a contiguous 1-based display
//! number that is rewritten whenever pages are removed.

use crate::error::LayoutError;
use crate::models::{Page, PageId, Tile};

/// Result of a successful page deletion
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedPage {
    pub page: Page,
    /// Tiles that lived on the page and were removed with it
    pub tiles: Vec<Tile>,
}

pub fn contains(pages: &[Page], page_id: &str) -> bool {
    pages.iter().any(|p| p.id == page_id)
}

pub fn find<'a>(pages: &'a [Page], page_id: &str) -> Result<&'a Page, LayoutError> {
    pages
        .iter()
        .find(|p| p.id == page_id)
        .ok_or_else(|| LayoutError::PageNotFound(page_id.to_string()))
}

/// First page in display order
pub fn first(pages: &[Page]) -> Option<&Page> {
    pages.iter().min_by_key(|p| p.order)
}

/// 1-based display number of a page
pub fn page_number(pages: &[Page], page_id: &str) -> Option<u32> {
    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by_key(|p| p.order);
    ordered
        .iter()
        .position(|p| p.id == page_id)
        .map(|i| i as u32 + 1)
}

/// Page shown at a 1-based display number
pub fn page_at_number(pages: &[Page], number: u32) -> Option<&Page> {
    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by_key(|p| p.order);
    let index = (number as usize).checked_sub(1)?;
    ordered.get(index).copied()
}

/// Sort by current order (stable for ties) and rewrite orders as 1..=N
pub fn renumber(pages: &mut [Page]) {
    pages.sort_by_key(|p| p.order);
    for (i, page) in pages.iter_mut().enumerate() {
        page.order = i as u32 + 1;
    }
}

/// Tiles assigned to `page_id`
pub fn tiles_on_page<'a>(
    tiles: &'a [Tile],
    page_id: &'a str,
) -> impl Iterator<Item = &'a Tile> + Clone + 'a {
    tiles.iter().filter(move |t| t.page_id == page_id)
}

/// Append a new page after the current last one. Existing tiles are not
/// touched.
pub fn add_page(pages: &mut Vec<Page>) -> Page {
    let order = pages.iter().map(|p| p.order).max().unwrap_or(0).saturating_add(1);
    let page = Page::fresh(order);
    log::debug!("added page {} ({})", page.order, page.id);
    pages.push(page.clone());
    page
}

/// Remove a page and every tile on it, then close the numbering gap.
///
/// Rejected with [`LayoutError::LastPage`] when only one page remains.
pub fn delete_page(
    pages: &mut Vec<Page>,
    tiles: &mut Vec<Tile>,
    page_id: &str,
) -> Result<DeletedPage, LayoutError> {
    let index = pages
        .iter()
        .position(|p| p.id == page_id)
        .ok_or_else(|| LayoutError::PageNotFound(page_id.to_string()))?;

    if pages.len() <= 1 {
        return Err(LayoutError::LastPage);
    }

    let page = pages.remove(index);
    let (removed, kept): (Vec<Tile>, Vec<Tile>) =
        std::mem::take(tiles).into_iter().partition(|t| t.page_id == page.id);
    *tiles = kept;
    renumber(pages);

    log::debug!("deleted page {} with {} tiles", page.id, removed.len());
    Ok(DeletedPage { page, tiles: removed })
}

pub fn rename_page(
    pages: &mut [Page],
    page_id: &str,
    title: impl Into<String>,
) -> Result<(), LayoutError> {
    let page = pages
        .iter_mut()
        .find(|p| p.id == page_id)
        .ok_or_else(|| LayoutError::PageNotFound(page_id.to_string()))?;
    page.title = title.into();
    Ok(())
}

/// Move any tile whose page is missing from `pages` onto `fallback`.
/// Returns how many tiles were moved.
pub fn reassign_orphans(pages: &[Page], tiles: &mut [Tile], fallback: &PageId) -> usize {
    let mut moved = 0;
    for tile in tiles.iter_mut().filter(|t| !contains(pages, &t.page_id)) {
        log::warn!(
            "tile {} referenced missing page {:?}, moving to {}",
            tile.id,
            tile.page_id,
            fallback
        );
        tile.page_id = fallback.clone();
        moved += 1;
    }
    moved
}
