//! Grid and pixel geometry types
//!
//! A tile's footprint is always stored in grid cells (`GridPosition`). The
//! pixel-space types are derived from it through `layout::coords` and are
//! never edited on their own.

use serde::{Deserialize, Serialize};

/// Default number of grid columns on a canvas
pub const DEFAULT_COLUMNS: u32 = 12;

/// Default cell edge length in pixels
pub const DEFAULT_CELL_SIZE: f64 = 80.0;

/// Default spacing between cells in pixels
pub const DEFAULT_GAP: f64 = 8.0;

/// Default minimum canvas height in rows
pub const DEFAULT_MIN_ROWS: u32 = 6;

/// Row limit of every canvas: no tile's bottom edge may pass it. Also caps
/// the column count, so edge sums stay far below `u32::MAX`.
pub const MAX_GRID_EXTENT: u32 = 1 << 20;

/// A tile's footprint in grid cells
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub col: u32,
    pub row: u32,
    pub col_span: u32,
    pub row_span: u32,
}

impl GridPosition {
    pub fn new(col: u32, row: u32, col_span: u32, row_span: u32) -> Self {
        Self { col, row, col_span, row_span }
    }

    /// Single cell at the given origin
    pub fn cell(col: u32, row: u32) -> Self {
        Self::new(col, row, 1, 1)
    }

    /// Same footprint moved to a new origin
    pub fn with_origin(self, col: u32, row: u32) -> Self {
        Self { col, row, ..self }
    }

    /// Same origin with new spans
    pub fn with_spans(self, col_span: u32, row_span: u32) -> Self {
        Self { col_span, row_span, ..self }
    }

    /// Exclusive right edge (first column past the tile)
    pub fn right(&self) -> u32 {
        self.col.saturating_add(self.col_span)
    }

    /// Exclusive bottom edge (first row past the tile)
    pub fn bottom(&self) -> u32 {
        self.row.saturating_add(self.row_span)
    }

    /// Rectangle intersection test on half-open cell ranges
    pub fn overlaps(&self, other: &GridPosition) -> bool {
        !(self.right() <= other.col
            || other.right() <= self.col
            || self.bottom() <= other.row
            || other.bottom() <= self.row)
    }

    /// Clamp into a canvas of `columns` columns: spans at least 1, the
    /// column span no wider than the canvas, and the origin pulled left (or
    /// up) so the tile ends inside the columns and above [`MAX_GRID_EXTENT`].
    pub fn clamped(self, columns: u32) -> Self {
        let columns = columns.clamp(1, MAX_GRID_EXTENT);
        let col_span = self.col_span.clamp(1, columns);
        let row_span = self.row_span.clamp(1, MAX_GRID_EXTENT);
        let col = self.col.min(columns - col_span);
        let row = self.row.min(MAX_GRID_EXTENT - row_span);
        Self { col, row, col_span, row_span }
    }
}

/// Top-left corner of a tile in canvas pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Component-wise difference `self - other`
    pub fn delta_from(self, other: PixelPosition) -> PixelPosition {
        PixelPosition { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Tile extent in canvas pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

/// Canvas grid configuration
///
/// `height` is a cached row count maintained by the canvas height policy;
/// hosts may read it but it is recomputed on every layout change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    #[serde(default = "default_columns")]
    pub columns: u32,

    #[serde(default = "default_min_rows")]
    pub height: u32,

    #[serde(default = "default_cell_size")]
    pub cell_size: f64,

    #[serde(default = "default_gap")]
    pub gap: f64,

    #[serde(default = "default_snap")]
    pub snap_to_grid: bool,

    #[serde(default = "default_min_rows", alias = "minimumRows")]
    pub min_rows: u32,
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_gap() -> f64 {
    DEFAULT_GAP
}

fn default_snap() -> bool {
    true
}

fn default_min_rows() -> u32 {
    DEFAULT_MIN_ROWS
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            height: DEFAULT_MIN_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            gap: DEFAULT_GAP,
            snap_to_grid: true,
            min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

impl CanvasSettings {
    /// Distance in pixels from one cell origin to the next
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    /// Replace out-of-range values with defaults so every geometry function
    /// can assume `columns > 0`, `cell_size > 0` and `gap >= 0`.
    pub fn sanitized(mut self) -> Self {
        if self.columns == 0 {
            log::warn!("canvas columns was 0, using {}", DEFAULT_COLUMNS);
            self.columns = DEFAULT_COLUMNS;
        }
        if self.columns > MAX_GRID_EXTENT {
            log::warn!("canvas columns {} capped at {}", self.columns, MAX_GRID_EXTENT);
            self.columns = MAX_GRID_EXTENT;
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            log::warn!("canvas cellSize {} invalid, using {}", self.cell_size, DEFAULT_CELL_SIZE);
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            self.gap = 0.0;
        }
        self.min_rows = self.min_rows.clamp(1, MAX_GRID_EXTENT);
        self.height = self.height.max(self.min_rows);
        self
    }
}
