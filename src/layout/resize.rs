//! Resize constraint solver
//!
//! Turns a pointer drag on one of the eight resize handles into a new
//! footprint for an existing tile. East/south handles grow or shrink the
//! span; west/north handles move the origin and adjust the span so the
//! opposite edge stays put. The result is validated as a single candidate:
//! if it collides or leaves the canvas nothing is applied.

use serde::{Deserialize, Serialize};

use super::coords::pixel_delta_to_cells;
use super::occupancy::Occupancy;
use crate::models::{CanvasSettings, GridPosition, PixelPosition, Tile, MAX_GRID_EXTENT};

/// Resize control point on a selected tile's border
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub fn moves_north(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    pub fn moves_south(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    pub fn moves_east(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    pub fn moves_west(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Parse the short handle name used by the UI ("n", "se", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "n" => Some(ResizeHandle::N),
            "s" => Some(ResizeHandle::S),
            "e" => Some(ResizeHandle::E),
            "w" => Some(ResizeHandle::W),
            "ne" => Some(ResizeHandle::Ne),
            "nw" => Some(ResizeHandle::Nw),
            "se" => Some(ResizeHandle::Se),
            "sw" => Some(ResizeHandle::Sw),
            _ => None,
        }
    }
}

fn to_u32(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

/// Grow or shrink the far edge; span stays ≥ 1 and `origin + span ≤ limit`
/// unless the origin is already past it.
fn stretch_far_edge(origin: u32, span: u32, delta: i64, limit: u32) -> u32 {
    let new_span = (span as i64)
        .saturating_add(delta)
        .min(limit as i64 - origin as i64)
        .max(1);
    to_u32(new_span)
}

/// Move the near edge by `delta`, keeping the far edge fixed. The origin
/// cannot pass 0 and the span cannot drop below 1.
fn stretch_near_edge(origin: u32, span: u32, delta: i64) -> (u32, u32) {
    let delta = delta.clamp(-(origin as i64), span as i64 - 1);
    (to_u32(origin as i64 + delta), to_u32(span as i64 - delta))
}

/// Candidate footprint for a drag of `pixel_delta` on `handle`, before any
/// occupancy check.
pub fn resize_candidate(
    handle: ResizeHandle,
    start: &GridPosition,
    pixel_delta: PixelPosition,
    settings: &CanvasSettings,
) -> GridPosition {
    let d_cols = pixel_delta_to_cells(pixel_delta.x, settings);
    let d_rows = pixel_delta_to_cells(pixel_delta.y, settings);
    let mut next = *start;

    if handle.moves_east() {
        next.col_span = stretch_far_edge(start.col, start.col_span, d_cols, settings.columns);
    } else if handle.moves_west() {
        (next.col, next.col_span) = stretch_near_edge(start.col, start.col_span, d_cols);
    }

    if handle.moves_south() {
        next.row_span = stretch_far_edge(start.row, start.row_span, d_rows, MAX_GRID_EXTENT);
    } else if handle.moves_north() {
        (next.row, next.row_span) = stretch_near_edge(start.row, start.row_span, d_rows);
    }

    next
}

/// Resolve a resize drag against the tiles on the page.
///
/// `start` is the footprint when the drag began and `pixel_delta` the total
/// pointer movement since then. Returns `None` when the candidate is
/// rejected; the caller keeps the tile's last valid footprint.
pub fn compute_resize<'a, I>(
    handle: ResizeHandle,
    start: &GridPosition,
    pixel_delta: PixelPosition,
    settings: &CanvasSettings,
    tiles_on_page: I,
    tile_id: &str,
) -> Option<GridPosition>
where
    I: IntoIterator<Item = &'a Tile>,
{
    let candidate = resize_candidate(handle, start, pixel_delta, settings);
    let occupancy = Occupancy::from_tiles(tiles_on_page);

    if occupancy.is_valid(&candidate, settings, Some(tile_id)) {
        Some(candidate)
    } else {
        log::debug!("resize of {} via {:?} to {:?} rejected", tile_id, handle, candidate);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TileKind;

    fn tile(id: &str, g: GridPosition) -> Tile {
        Tile::new(id, TileKind::Image, g, "p1", &CanvasSettings::default())
    }

    fn delta(cols: f64, rows: f64) -> PixelPosition {
        PixelPosition::new(cols * 88.0, rows * 88.0)
    }

    #[test]
    fn test_handle_names() {
        assert_eq!(ResizeHandle::from_name("SE"), Some(ResizeHandle::Se));
        assert_eq!(ResizeHandle::from_name("w"), Some(ResizeHandle::W));
        assert_eq!(ResizeHandle::from_name("x"), None);
        let json = serde_json::to_string(&ResizeHandle::Nw).unwrap();
        assert_eq!(json, "\"nw\"");
    }

    #[test]
    fn test_east_clamped_to_canvas_width() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(8, 0, 2, 1);
        let got = resize_candidate(ResizeHandle::E, &start, delta(11.0, 0.0), &s);
        assert_eq!(got, GridPosition::new(8, 0, 4, 1));
    }

    #[test]
    fn test_shrinking_never_below_one() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(3, 3, 2, 2);
        let got = resize_candidate(ResizeHandle::Se, &start, delta(-9.0, -9.0), &s);
        assert_eq!(got, GridPosition::new(3, 3, 1, 1));
    }

    #[test]
    fn test_south_grows_past_canvas_height() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(0, 0, 1, 1);
        let got = resize_candidate(ResizeHandle::S, &start, delta(0.0, 40.0), &s);
        assert_eq!(got.row_span, 41);
    }

    #[test]
    fn test_south_stops_at_row_limit() {
        let s = CanvasSettings::default();
        let tiles = vec![tile("a", GridPosition::new(0, 5, 2, 2))];
        let start = tiles[0].grid_position;
        let far = PixelPosition::new(0.0, 1e300);

        let got = resize_candidate(ResizeHandle::S, &start, far, &s);
        assert_eq!(got.row_span, MAX_GRID_EXTENT - 5);
        assert_eq!(got.bottom(), MAX_GRID_EXTENT);

        let resolved = compute_resize(ResizeHandle::Se, &start, far, &s, &tiles, "a");
        assert_eq!(resolved.map(|g| g.bottom()), Some(MAX_GRID_EXTENT));
    }

    #[test]
    fn test_west_moves_origin_and_keeps_right_edge() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(4, 2, 4, 2);

        let grown = resize_candidate(ResizeHandle::W, &start, delta(-2.0, 0.0), &s);
        assert_eq!(grown, GridPosition::new(2, 2, 6, 2));

        let shrunk = resize_candidate(ResizeHandle::W, &start, delta(5.0, 0.0), &s);
        assert_eq!(shrunk, GridPosition::new(7, 2, 1, 2));
        assert_eq!(shrunk.right(), start.right());
    }

    #[test]
    fn test_north_stops_at_row_zero() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(0, 1, 2, 2);
        let got = resize_candidate(ResizeHandle::N, &start, delta(0.0, -6.0), &s);
        assert_eq!(got, GridPosition::new(0, 0, 2, 3));
    }

    #[test]
    fn test_corner_handles_combine_axes() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(4, 4, 2, 2);

        assert_eq!(
            resize_candidate(ResizeHandle::Ne, &start, delta(1.0, -1.0), &s),
            GridPosition::new(4, 3, 3, 3)
        );
        assert_eq!(
            resize_candidate(ResizeHandle::Nw, &start, delta(-1.0, -1.0), &s),
            GridPosition::new(3, 3, 3, 3)
        );
        assert_eq!(
            resize_candidate(ResizeHandle::Sw, &start, delta(-1.0, 1.0), &s),
            GridPosition::new(3, 4, 3, 3)
        );
    }

    #[test]
    fn test_sub_half_cell_drag_rounds_to_zero() {
        let s = CanvasSettings::default();
        let start = GridPosition::new(0, 0, 2, 2);
        let got = resize_candidate(ResizeHandle::Se, &start, PixelPosition::new(40.0, -43.0), &s);
        assert_eq!(got, start);
    }

    #[test]
    fn test_collision_rejects_whole_candidate() {
        let s = CanvasSettings::default();
        let tiles = vec![
            tile("a", GridPosition::new(0, 0, 4, 2)),
            tile("b", GridPosition::new(5, 0, 2, 1)),
        ];
        let start = tiles[0].grid_position;

        // column growth hits b; row growth alone would have fit
        let got = compute_resize(ResizeHandle::Se, &start, delta(2.0, 1.0), &s, &tiles, "a");
        assert_eq!(got, None);

        let rows_only = compute_resize(ResizeHandle::S, &start, delta(2.0, 1.0), &s, &tiles, "a");
        assert_eq!(rows_only, Some(GridPosition::new(0, 0, 4, 3)));
    }
}
