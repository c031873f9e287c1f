//! Grid layout engine
//!
//! Pure, synchronous geometry shared by every tile-manipulating operation:
//!
//! - `coords`: pixel ↔ grid mapping
//! - `occupancy`: bounds and overlap checks
//! - `placement`: nearest free footprint search
//! - `resize`: handle drags → new footprint
//! - `height`: canvas row count for a page

pub mod coords;
pub mod occupancy;
pub mod placement;
pub mod resize;
pub mod height;

pub use coords::{grid_size_to_pixel, grid_to_pixel, pixel_to_grid, snap_to_grid};
pub use occupancy::{is_valid_grid_position, Occupancy};
pub use placement::find_next_available_position;
pub use resize::{compute_resize, ResizeHandle};
pub use height::calculate_canvas_height;
