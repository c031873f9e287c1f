// Loading persisted lessons written by any editor version

use lesson_layout_wasm::models::{GridPosition, LessonContent, PixelPosition, TileKind};

#[test]
fn test_page_id_document_round_trips() {
    let json = r#"{
        "pages": [
            {"id": "intro", "title": "Intro", "order": 1},
            {"id": "drill", "title": "Drill", "order": 2}
        ],
        "canvas_settings": {
            "columns": 12, "height": 6, "cellSize": 80, "gap": 8, "snapToGrid": true
        },
        "tiles": [
            {"id": "t1", "type": "text", "pageId": "drill", "zIndex": 3,
             "gridPosition": {"col": 1, "row": 2, "colSpan": 3, "rowSpan": 2},
             "content": {"richText": "<p>Hello</p>"}}
        ]
    }"#;

    let lesson = LessonContent::from_json(json).unwrap();
    let tile = lesson.tile("t1").unwrap();

    assert_eq!(tile.page_id, "drill");
    assert_eq!(tile.kind, TileKind::Text);
    assert_eq!(tile.z_index, 3);
    assert_eq!(tile.grid_position, GridPosition::new(1, 2, 3, 2));
    assert_eq!(tile.position, PixelPosition::new(88.0, 176.0));
    assert_eq!(tile.size.width, 256.0);
    assert_eq!(tile.content["richText"], "<p>Hello</p>");

    let reloaded = LessonContent::from_json(&lesson.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, lesson);
}

#[test]
fn test_unknown_tile_type_is_kept() {
    let json = r#"{"tiles": [{"id": "x", "type": "hologram",
        "gridPosition": {"col": 0, "row": 0, "colSpan": 1, "rowSpan": 1}}]}"#;
    let lesson = LessonContent::from_json(json).unwrap();
    assert_eq!(lesson.tile("x").unwrap().kind, TileKind::Unknown);
}

#[test]
fn test_tile_without_page_goes_to_first_page() {
    let json = r#"{
        "pages": [{"id": "p2", "order": 2}, {"id": "p1", "order": 1}],
        "tiles": [{"id": "x", "type": "quiz", "pageId": "missing"}]
    }"#;
    let lesson = LessonContent::from_json(json).unwrap();
    assert_eq!(lesson.tile("x").unwrap().page_id, "p1");
    assert_eq!(lesson.pages.iter().find(|p| p.id == "p2").unwrap().title, "Page 2");
}

#[test]
fn test_overlaps_from_storage_are_repaired() {
    let json = r#"{"tiles": [
        {"id": "a", "type": "text",
         "gridPosition": {"col": 0, "row": 0, "colSpan": 6, "rowSpan": 2}},
        {"id": "b", "type": "text",
         "gridPosition": {"col": 2, "row": 0, "colSpan": 6, "rowSpan": 2}},
        {"id": "c", "type": "text",
         "gridPosition": {"col": 10, "row": 0, "colSpan": 6, "rowSpan": 1}}
    ]}"#;
    let lesson = LessonContent::from_json(json).unwrap();

    assert_eq!(lesson.tile("a").unwrap().grid_position, GridPosition::new(0, 0, 6, 2));
    assert_eq!(lesson.tile("b").unwrap().grid_position, GridPosition::new(6, 0, 6, 2));
    assert_eq!(lesson.tile("c").unwrap().grid_position.row, 2);
    assert!(lesson.invariant_violations().is_empty());
}

#[test]
fn test_height_reflects_tiles_on_first_page() {
    let json = r#"{"tiles": [
        {"id": "a", "type": "text",
         "gridPosition": {"col": 0, "row": 5, "colSpan": 1, "rowSpan": 2}}
    ]}"#;
    let lesson = LessonContent::from_json(json).unwrap();
    assert_eq!(lesson.canvas_settings.height, 7);
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(LessonContent::from_json("{\"tiles\": [").is_err());
}
