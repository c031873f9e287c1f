//! Editor API
//!
//! JS bindings over the WASM-owned `EditorState`. Mutating calls take their
//! timestamp from `performance.now()` so the auto-save debounce runs on one
//! monotonic clock.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, install_editor, layout_error, serialize, with_editor};
use crate::api::types::{AddTileRequest, DeletePageResult, EditorSnapshot};
use crate::autosave::SaveTicket;
use crate::layout::ResizeHandle;
use crate::models::{EditorConfig, EditorState, GridPosition, PixelPosition, Tile};
use crate::{wasm_info, wasm_log, wasm_warn};

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn pointer_from(pointer_js: JsValue) -> Result<PixelPosition, JsValue> {
    deserialize(pointer_js, "Failed to deserialize pointer position")
}

fn snapshot(editor: &EditorState) -> Result<JsValue, JsValue> {
    serialize(&EditorSnapshot::of(editor), "Failed to serialize editor snapshot")
}

// ============================================================================
// Lesson
// ============================================================================

/// Load a persisted lesson (any editor version) and display its first page
#[wasm_bindgen(js_name = loadLesson)]
pub fn load_lesson(lesson_json: &str, config_js: JsValue) -> Result<JsValue, JsValue> {
    let config: EditorConfig = if config_js.is_undefined() || config_js.is_null() {
        EditorConfig::default()
    } else {
        deserialize(config_js, "Failed to deserialize editor config")?
    };

    let editor = EditorState::from_json(lesson_json, &config).map_err(layout_error)?;
    wasm_info!(
        "loadLesson: {} tiles on {} pages",
        editor.lesson().tiles.len(),
        editor.lesson().pages.len()
    );

    let result = snapshot(&editor)?;
    install_editor(editor)?;
    Ok(result)
}

/// Current view of the displayed page
#[wasm_bindgen(js_name = getEditorSnapshot)]
pub fn get_editor_snapshot() -> Result<JsValue, JsValue> {
    with_editor(|editor| snapshot(editor))
}

/// The full lesson document in its persisted JSON form
#[wasm_bindgen(js_name = exportLesson)]
pub fn export_lesson() -> Result<String, JsValue> {
    with_editor(|editor| editor.lesson().to_json().map_err(layout_error))
}

// ============================================================================
// Tiles
// ============================================================================

#[wasm_bindgen(js_name = addTile)]
pub fn add_tile(request_js: JsValue) -> Result<JsValue, JsValue> {
    let request: AddTileRequest = deserialize(request_js, "Failed to deserialize tile request")?;

    with_editor(|editor| {
        let id = request.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut tile = Tile::new(id, request.kind, request.grid_position, "", editor.settings());
        tile.content = request.content;

        let placed = editor.add_tile(tile, request.drop_point, now_ms()).map_err(layout_error)?;
        wasm_log!("addTile: placed at {:?}", placed);
        snapshot(editor)
    })
}

/// Move a tile to an exact footprint; returns `null` when it does not fit
#[wasm_bindgen(js_name = moveTile)]
pub fn move_tile(tile_id: &str, target_js: JsValue) -> Result<JsValue, JsValue> {
    let target: GridPosition = deserialize(target_js, "Failed to deserialize grid position")?;

    with_editor(|editor| match editor.move_tile(tile_id, target, now_ms()).map_err(layout_error)? {
        Some(placed) => serialize(&placed, "Failed to serialize grid position"),
        None => {
            wasm_log!("moveTile: {:?} rejected for {}", target, tile_id);
            Ok(JsValue::NULL)
        }
    })
}

#[wasm_bindgen(js_name = setTileContent)]
pub fn set_tile_content(tile_id: &str, content_js: JsValue) -> Result<(), JsValue> {
    let content: serde_json::Value = deserialize(content_js, "Failed to deserialize tile content")?;
    with_editor(|editor| editor.set_tile_content(tile_id, content, now_ms()).map_err(layout_error))
}

#[wasm_bindgen(js_name = deleteTile)]
pub fn delete_tile(tile_id: &str) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        editor.delete_tile(tile_id, now_ms()).map_err(layout_error)?;
        snapshot(editor)
    })
}

/// Select a tile, or clear the selection with `null`/`undefined`
#[wasm_bindgen(js_name = selectTile)]
pub fn select_tile(tile_id: Option<String>) -> Result<(), JsValue> {
    with_editor(|editor| editor.select_tile(tile_id.as_deref()).map_err(layout_error))
}

#[wasm_bindgen(js_name = setEditing)]
pub fn set_editing(tile_id: Option<String>) -> Result<(), JsValue> {
    with_editor(|editor| editor.set_editing(tile_id.as_deref()).map_err(layout_error))
}

// ============================================================================
// Pointer interactions
// ============================================================================

#[wasm_bindgen(js_name = beginDrag)]
pub fn begin_drag(tile_id: &str, pointer_js: JsValue) -> Result<(), JsValue> {
    let pointer = pointer_from(pointer_js)?;
    with_editor(|editor| editor.begin_drag(tile_id, pointer).map_err(layout_error))
}

/// Start a resize from one of `n`, `s`, `e`, `w`, `ne`, `nw`, `se`, `sw`
#[wasm_bindgen(js_name = beginResize)]
pub fn begin_resize(tile_id: &str, handle: &str, pointer_js: JsValue) -> Result<(), JsValue> {
    let handle = ResizeHandle::from_name(handle).ok_or_else(|| {
        wasm_warn!("beginResize: unknown handle {}", handle);
        JsValue::from_str(&format!("Unknown resize handle: {}", handle))
    })?;
    let pointer = pointer_from(pointer_js)?;
    with_editor(|editor| editor.begin_resize(tile_id, handle, pointer).map_err(layout_error))
}

#[wasm_bindgen(js_name = beginImagePan)]
pub fn begin_image_pan(
    tile_id: &str,
    pointer_js: JsValue,
    offset_js: JsValue,
) -> Result<(), JsValue> {
    let pointer = pointer_from(pointer_js)?;
    let offset: PixelPosition = deserialize(offset_js, "Failed to deserialize image offset")?;
    with_editor(|editor| editor.begin_image_pan(tile_id, pointer, offset).map_err(layout_error))
}

/// Feed a pointer-move; returns what changed
#[wasm_bindgen(js_name = pointerMove)]
pub fn pointer_move(pointer_js: JsValue) -> Result<JsValue, JsValue> {
    let pointer = pointer_from(pointer_js)?;
    with_editor(|editor| {
        let update = editor.pointer_move(pointer, now_ms());
        serialize(&update, "Failed to serialize interaction update")
    })
}

#[wasm_bindgen(js_name = pointerUp)]
pub fn pointer_up(pointer_js: JsValue) -> Result<JsValue, JsValue> {
    let pointer = pointer_from(pointer_js)?;
    with_editor(|editor| {
        let update = editor.pointer_up(pointer, now_ms());
        serialize(&update, "Failed to serialize interaction update")
    })
}

#[wasm_bindgen(js_name = cancelInteraction)]
pub fn cancel_interaction() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let ended = editor.cancel_interaction();
        serialize(&ended, "Failed to serialize interaction")
    })
}

// ============================================================================
// Pages
// ============================================================================

#[wasm_bindgen(js_name = addPage)]
pub fn add_page() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let page = editor.add_page(now_ms());
        wasm_log!("addPage: {} ({})", page.id, page.title);
        serialize(&page, "Failed to serialize page")
    })
}

#[wasm_bindgen(js_name = deletePage)]
pub fn delete_page(page_id: &str) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let deleted = editor.delete_page(page_id, now_ms()).map_err(layout_error)?;
        let result = DeletePageResult {
            removed_tile_ids: deleted.tiles.iter().map(|t| t.id.clone()).collect(),
            deleted_page: deleted.page,
            active_page: editor.active_page().to_string(),
        };
        wasm_info!(
            "deletePage: {} removed with {} tiles",
            result.deleted_page.id,
            result.removed_tile_ids.len()
        );
        serialize(&result, "Failed to serialize page deletion")
    })
}

#[wasm_bindgen(js_name = renamePage)]
pub fn rename_page(page_id: &str, title: &str) -> Result<(), JsValue> {
    with_editor(|editor| editor.rename_page(page_id, title, now_ms()).map_err(layout_error))
}

#[wasm_bindgen(js_name = selectPage)]
pub fn select_page(page_id: &str) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        editor.select_page(page_id).map_err(layout_error)?;
        snapshot(editor)
    })
}

/// 1-based display number of a page, or `undefined` if it does not exist
#[wasm_bindgen(js_name = pageNumber)]
pub fn page_number(page_id: &str) -> Result<Option<u32>, JsValue> {
    with_editor(|editor| Ok(editor.page_number(page_id)))
}

// ============================================================================
// Auto-save
// ============================================================================

/// A save request when the debounce has elapsed, else `null`
#[wasm_bindgen(js_name = pollAutosave)]
pub fn poll_autosave() -> Result<JsValue, JsValue> {
    with_editor(|editor| match editor.poll_autosave(now_ms()) {
        Some(request) => serialize(&request, "Failed to serialize save request"),
        None => Ok(JsValue::NULL),
    })
}

/// A save request for any unsaved edits right now (page unload, explicit save)
#[wasm_bindgen(js_name = flushAutosave)]
pub fn flush_autosave() -> Result<JsValue, JsValue> {
    with_editor(|editor| match editor.flush_autosave() {
        Some(request) => serialize(&request, "Failed to serialize save request"),
        None => Ok(JsValue::NULL),
    })
}

/// Report the outcome of a save; returns whether the ticket was current
#[wasm_bindgen(js_name = completeAutosave)]
pub fn complete_autosave(ticket_js: JsValue, ok: bool) -> Result<bool, JsValue> {
    let ticket: SaveTicket = deserialize(ticket_js, "Failed to deserialize save ticket")?;
    with_editor(|editor| {
        let current = editor.complete_autosave(ticket, ok, now_ms());
        if !ok {
            wasm_warn!("completeAutosave: save {} failed, retrying after debounce", ticket.id);
        }
        Ok(current)
    })
}
