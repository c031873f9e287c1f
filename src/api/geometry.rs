//! Stateless layout functions
//!
//! Direct JS bindings for the pure geometry of the layout engine. They take
//! and return plain JS objects in the persisted camelCase shape and touch no
//! editor state, so rendering code can call them on any snapshot.
//!
//! `tiles` arguments only need an id and a footprint per tile; see
//! [`TileFootprint`] for the accepted shapes.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize};
use crate::api::types::TileFootprint;
use crate::layout::{self, ResizeHandle};
use crate::models::{CanvasSettings, GridPosition, PixelPosition, Tile};

fn settings_from(settings_js: JsValue) -> Result<CanvasSettings, JsValue> {
    let settings: CanvasSettings =
        deserialize(settings_js, "Failed to deserialize canvas settings")?;
    Ok(settings.sanitized())
}

fn tiles_from(tiles_js: JsValue, settings: &CanvasSettings) -> Result<Vec<Tile>, JsValue> {
    let footprints: Vec<TileFootprint> = deserialize(tiles_js, "Failed to deserialize tiles")?;
    Ok(footprints.into_iter().map(|f| f.into_tile(settings)).collect())
}

/// Grid cell under a pixel point (spans default to 1×1)
#[wasm_bindgen(js_name = pixelToGrid)]
pub fn pixel_to_grid(pixel_js: JsValue, settings_js: JsValue) -> Result<JsValue, JsValue> {
    let pixel: PixelPosition = deserialize(pixel_js, "Failed to deserialize pixel position")?;
    let settings = settings_from(settings_js)?;
    serialize(&layout::pixel_to_grid(pixel, &settings), "Failed to serialize grid position")
}

/// Pixel origin of a grid footprint
#[wasm_bindgen(js_name = gridToPixel)]
pub fn grid_to_pixel(grid_js: JsValue, settings_js: JsValue) -> Result<JsValue, JsValue> {
    let grid: GridPosition = deserialize(grid_js, "Failed to deserialize grid position")?;
    let settings = settings_from(settings_js)?;
    serialize(&layout::grid_to_pixel(&grid, &settings), "Failed to serialize pixel position")
}

/// Pixel size of a grid footprint
#[wasm_bindgen(js_name = gridSizeToPixel)]
pub fn grid_size_to_pixel(grid_js: JsValue, settings_js: JsValue) -> Result<JsValue, JsValue> {
    let grid: GridPosition = deserialize(grid_js, "Failed to deserialize grid position")?;
    let settings = settings_from(settings_js)?;
    serialize(&layout::grid_size_to_pixel(&grid, &settings), "Failed to serialize pixel size")
}

/// Nearest cell origin to a pixel point (pass-through with snapping off)
#[wasm_bindgen(js_name = snapToGrid)]
pub fn snap_to_grid(pixel_js: JsValue, settings_js: JsValue) -> Result<JsValue, JsValue> {
    let pixel: PixelPosition = deserialize(pixel_js, "Failed to deserialize pixel position")?;
    let settings = settings_from(settings_js)?;
    serialize(&layout::snap_to_grid(pixel, &settings), "Failed to serialize pixel position")
}

/// Whether a footprint is in bounds and free among `tiles` (one page)
#[wasm_bindgen(js_name = isValidGridPosition)]
pub fn is_valid_grid_position(
    candidate_js: JsValue,
    settings_js: JsValue,
    tiles_js: JsValue,
    exclude_tile_id: Option<String>,
) -> Result<bool, JsValue> {
    let candidate: GridPosition =
        deserialize(candidate_js, "Failed to deserialize grid position")?;
    let settings = settings_from(settings_js)?;
    let tiles = tiles_from(tiles_js, &settings)?;
    Ok(layout::is_valid_grid_position(
        &candidate,
        &settings,
        &tiles,
        exclude_tile_id.as_deref(),
    ))
}

/// Nearest free footprint to `desired` among `tiles` (one page)
#[wasm_bindgen(js_name = findNextAvailablePosition)]
pub fn find_next_available_position(
    desired_js: JsValue,
    settings_js: JsValue,
    tiles_js: JsValue,
) -> Result<JsValue, JsValue> {
    let desired: GridPosition = deserialize(desired_js, "Failed to deserialize grid position")?;
    let settings = settings_from(settings_js)?;
    let tiles = tiles_from(tiles_js, &settings)?;
    let found = layout::find_next_available_position(&desired, &settings, &tiles);
    serialize(&found, "Failed to serialize grid position")
}

/// New footprint for a resize drag, or `null` when the resize is rejected
#[wasm_bindgen(js_name = computeResize)]
pub fn compute_resize(
    handle: &str,
    start_js: JsValue,
    delta_js: JsValue,
    settings_js: JsValue,
    tiles_js: JsValue,
    tile_id: &str,
) -> Result<JsValue, JsValue> {
    let handle = ResizeHandle::from_name(handle)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown resize handle: {}", handle)))?;
    let start: GridPosition = deserialize(start_js, "Failed to deserialize grid position")?;
    let delta: PixelPosition = deserialize(delta_js, "Failed to deserialize pixel delta")?;
    let settings = settings_from(settings_js)?;
    let tiles = tiles_from(tiles_js, &settings)?;

    match layout::compute_resize(handle, &start, delta, &settings, &tiles, tile_id) {
        Some(next) => serialize(&next, "Failed to serialize grid position"),
        None => Ok(JsValue::NULL),
    }
}

/// Canvas rows needed for `tiles` (one page)
#[wasm_bindgen(js_name = calculateCanvasHeight)]
pub fn calculate_canvas_height(tiles_js: JsValue, minimum_rows: u32) -> Result<u32, JsValue> {
    let tiles = tiles_from(tiles_js, &CanvasSettings::default())?;
    Ok(layout::calculate_canvas_height(&tiles, minimum_rows))
}
