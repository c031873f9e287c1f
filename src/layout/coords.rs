//! Pixel ↔ grid coordinate mapping
//!
//! Every conversion between canvas pixels and grid cells goes through this
//! module. The cell pitch is `cell_size + gap`: cell `n` starts at
//! `n * pitch` pixels.

use crate::models::{CanvasSettings, GridPosition, PixelPosition, PixelSize, MAX_GRID_EXTENT};

/// Tolerance (in cells) absorbing float error when a pixel value produced by
/// [`grid_to_pixel`] is mapped back to a cell index.
const CELL_EPSILON: f64 = 1e-6;

fn cell_index(value: f64, pitch: f64) -> u32 {
    // NaN and negatives collapse to 0
    (value / pitch + CELL_EPSILON)
        .floor()
        .clamp(0.0, MAX_GRID_EXTENT as f64) as u32
}

/// Map a pixel point to the grid cell containing it.
///
/// Spans default to 1×1; callers overwrite them before validating. The
/// column is clamped into the canvas, the row to [`MAX_GRID_EXTENT`].
pub fn pixel_to_grid(pixel: PixelPosition, settings: &CanvasSettings) -> GridPosition {
    let pitch = settings.pitch();
    let last_col = settings.columns.saturating_sub(1);
    GridPosition::cell(
        cell_index(pixel.x, pitch).min(last_col),
        cell_index(pixel.y, pitch),
    )
}

/// Pixel origin of a grid footprint
pub fn grid_to_pixel(grid: &GridPosition, settings: &CanvasSettings) -> PixelPosition {
    let pitch = settings.pitch();
    PixelPosition {
        x: grid.col as f64 * pitch,
        y: grid.row as f64 * pitch,
    }
}

/// Pixel extent of a grid footprint; inner gaps are included, outer ones not
pub fn grid_size_to_pixel(grid: &GridPosition, settings: &CanvasSettings) -> PixelSize {
    let extent = |span: u32| {
        let span = span.max(1);
        span as f64 * settings.cell_size + (span - 1) as f64 * settings.gap
    };
    PixelSize {
        width: extent(grid.col_span),
        height: extent(grid.row_span),
    }
}

/// Quantize a free pixel position to the nearest cell origin.
///
/// Pass-through when snapping is disabled.
pub fn snap_to_grid(pixel: PixelPosition, settings: &CanvasSettings) -> PixelPosition {
    if !settings.snap_to_grid {
        return pixel;
    }
    let pitch = settings.pitch();
    let snap = |v: f64| (v / pitch).round().max(0.0) * pitch;
    PixelPosition {
        x: snap(pixel.x),
        y: snap(pixel.y),
    }
}

/// Whole-cell equivalent of a pointer delta, rounded to nearest
pub fn pixel_delta_to_cells(delta: f64, settings: &CanvasSettings) -> i64 {
    let cells = (delta / settings.pitch()).round();
    if cells.is_finite() {
        cells as i64
    } else {
        0
    }
}

/// Smallest span count whose pixel extent is nearest to `extent`; at least 1
pub fn pixel_extent_to_span(extent: f64, settings: &CanvasSettings) -> u32 {
    ((extent + settings.gap) / settings.pitch())
        .round()
        .clamp(1.0, MAX_GRID_EXTENT as f64) as u32
}
