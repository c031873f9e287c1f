//! WASM build test
//!
//! Exercises the JS-facing API through `JsValue` round trips. Only runs
//! under wasm-bindgen-test.

#![cfg(target_arch = "wasm32")]

use lesson_layout_wasm::api::*;
use lesson_layout_wasm::models::GridPosition;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js<T: Serialize>(value: &T) -> JsValue {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

fn settings() -> JsValue {
    js(&serde_json::json!({"columns": 12, "cellSize": 80, "gap": 8}))
}

#[wasm_bindgen_test]
fn test_pixel_to_grid_binding() {
    let grid = pixel_to_grid(js(&serde_json::json!({"x": 180.0, "y": 90.0})), settings()).unwrap();
    let grid: GridPosition = serde_wasm_bindgen::from_value(grid).unwrap();
    assert_eq!(grid, GridPosition::new(2, 1, 1, 1));
}

#[wasm_bindgen_test]
fn test_find_next_available_position_binding() {
    let tiles = js(&serde_json::json!([{
        "id": "a", "type": "text", "pageId": "p",
        "gridPosition": {"col": 0, "row": 0, "colSpan": 4, "rowSpan": 2},
        "position": {"x": 0, "y": 0}, "size": {"width": 344, "height": 168},
        "zIndex": 0, "content": null, "createdAt": "", "updatedAt": ""
    }]));
    let desired = js(&GridPosition::new(0, 0, 4, 2));
    let placed = find_next_available_position(desired, settings(), tiles).unwrap();
    let placed: GridPosition = serde_wasm_bindgen::from_value(placed).unwrap();
    assert_eq!(placed, GridPosition::new(4, 0, 4, 2));
}

#[wasm_bindgen_test]
fn test_unknown_resize_handle_is_an_error() {
    let result = compute_resize(
        "middle",
        js(&GridPosition::new(0, 0, 1, 1)),
        js(&serde_json::json!({"x": 0, "y": 0})),
        settings(),
        js(&serde_json::json!([])),
        "a",
    );
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_editor_session() {
    load_lesson(r#"{"total_pages": 2}"#, JsValue::UNDEFINED).unwrap();

    add_tile(js(&serde_json::json!({
        "type": "quiz",
        "gridPosition": {"col": 0, "row": 0, "colSpan": 4, "rowSpan": 2}
    })))
    .unwrap();

    assert_eq!(page_number("page-2").unwrap(), Some(2));
    assert!(delete_page("page-1").is_ok());
    assert!(delete_page("page-2").is_err());

    let flushed = flush_autosave().unwrap();
    assert!(!flushed.is_null());
    let exported = export_lesson().unwrap();
    assert!(exported.contains("\"page-2\""));
}
