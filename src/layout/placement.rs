//! Placement search
//!
//! Resolves a desired footprint to the nearest free one in scan order: rows
//! ascending from the desired row, columns ascending from 0 within each row.
//! The same desired footprint on the same page always resolves to the same
//! place.

use super::occupancy::Occupancy;
use crate::models::{CanvasSettings, GridPosition, Tile, MAX_GRID_EXTENT};

/// Nearest valid footprint for `desired` among `tiles_on_page`.
///
/// Returns `desired` untouched when it is already free. Spans are kept,
/// except that spans below 1 are raised to 1 and a column span wider than
/// the canvas is narrowed to the canvas width.
///
/// Always terminates: the scan stops at [`MAX_GRID_EXTENT`], and the first
/// row below every existing tile is free at column 0.
pub fn find_next_available_position<'a, I>(
    desired: &GridPosition,
    settings: &CanvasSettings,
    tiles_on_page: I,
) -> GridPosition
where
    I: IntoIterator<Item = &'a Tile>,
{
    let occupancy = Occupancy::from_tiles(tiles_on_page);
    find_in(desired, settings, &occupancy, None)
}

/// Same search against a prepared occupancy map, ignoring `exclude`
pub(crate) fn find_in(
    desired: &GridPosition,
    settings: &CanvasSettings,
    occupancy: &Occupancy<'_>,
    exclude: Option<&str>,
) -> GridPosition {
    if occupancy.is_valid(desired, settings, exclude) {
        return *desired;
    }

    let columns = settings.columns.max(1);
    let col_span = desired.col_span.clamp(1, columns);
    let row_span = desired.row_span.clamp(1, MAX_GRID_EXTENT);
    let last_col = columns - col_span;
    let last_row = MAX_GRID_EXTENT - row_span;
    let first_row = desired.row.min(last_row);
    let floor_row = occupancy.max_bottom().max(first_row).min(last_row);

    for row in first_row..=floor_row {
        for col in 0..=last_col {
            let candidate = GridPosition::new(col, row, col_span, row_span);
            if occupancy.is_valid(&candidate, settings, exclude) {
                return candidate;
            }
        }
    }

    // Only reached when the page is full down to the row limit
    log::warn!("placement scan exhausted at row {}, placing at column 0", floor_row);
    GridPosition::new(0, floor_row, col_span, row_span)
}
