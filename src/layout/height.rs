//! Canvas height policy

use crate::models::Tile;

/// Rows needed to show every tile on a page, never fewer than `minimum_rows`
pub fn calculate_canvas_height<'a, I>(tiles_on_page: I, minimum_rows: u32) -> u32
where
    I: IntoIterator<Item = &'a Tile>,
{
    tiles_on_page
        .into_iter()
        .map(|t| t.grid_position.bottom())
        .fold(minimum_rows, u32::max)
}
