// Page index: numbering, deletion and migration of numeric page documents

use lesson_layout_wasm::models::{EditorConfig, EditorState, LessonContent};
use lesson_layout_wasm::page_index;
use lesson_layout_wasm::LayoutError;

fn numeric_lesson() -> &'static str {
    r#"{
        "total_pages": 3,
        "tiles": [
            {"id": "a", "type": "text", "page": 1,
             "gridPosition": {"col": 0, "row": 0, "colSpan": 4, "rowSpan": 2}},
            {"id": "b", "type": "quiz", "page": 2,
             "gridPosition": {"col": 0, "row": 0, "colSpan": 4, "rowSpan": 2}},
            {"id": "c", "type": "image", "page": 3,
             "gridPosition": {"col": 2, "row": 1, "colSpan": 3, "rowSpan": 3}}
        ]
    }"#
}

fn orders(lesson: &LessonContent) -> Vec<u32> {
    let mut orders: Vec<u32> = lesson.pages.iter().map(|p| p.order).collect();
    orders.sort_unstable();
    orders
}

#[test]
fn test_deleting_middle_page_shifts_later_pages_down() {
    let mut lesson = LessonContent::from_json(numeric_lesson()).unwrap();

    let deleted = page_index::delete_page(&mut lesson.pages, &mut lesson.tiles, "page-2").unwrap();

    assert_eq!(deleted.page.id, "page-2");
    assert_eq!(deleted.tiles.len(), 1);
    assert_eq!(lesson.pages.len(), 2);
    assert_eq!(orders(&lesson), vec![1, 2]);

    let c = lesson.tile("c").unwrap();
    assert_eq!(page_index::page_number(&lesson.pages, &c.page_id), Some(2));
    assert!(lesson.tile("b").is_none());
    assert!(lesson.invariant_violations().is_empty());
}

#[test]
fn test_last_page_cannot_be_deleted() {
    let mut lesson = LessonContent::default();
    let only = lesson.pages[0].id.clone();
    assert_eq!(
        page_index::delete_page(&mut lesson.pages, &mut lesson.tiles, &only),
        Err(LayoutError::LastPage)
    );
    assert_eq!(lesson.pages.len(), 1);
}

#[test]
fn test_added_page_is_numbered_last() {
    let mut lesson = LessonContent::from_json(numeric_lesson()).unwrap();
    let page = page_index::add_page(&mut lesson.pages);
    assert_eq!(page.order, 4);
    assert_eq!(page.title, "Page 4");
    assert_eq!(page_index::page_number(&lesson.pages, &page.id), Some(4));
    assert_eq!(lesson.tiles.len(), 3);
}

#[test]
fn test_editor_delete_keeps_numbering_contiguous() {
    let mut editor = EditorState::from_json(numeric_lesson(), &EditorConfig::default()).unwrap();
    let extra = editor.add_page(0.0);

    editor.delete_page("page-1", 1.0).unwrap();
    editor.delete_page("page-3", 2.0).unwrap();

    assert_eq!(orders(editor.lesson()), vec![1, 2]);
    assert_eq!(editor.page_number("page-2"), Some(1));
    assert_eq!(editor.page_number(&extra.id), Some(2));
    assert!(editor.lesson().invariant_violations().is_empty());
}

#[test]
fn test_tiles_on_page_are_independent_canvases() {
    let lesson = LessonContent::from_json(numeric_lesson()).unwrap();
    // "a" and "b" share a footprint but live on different pages
    assert_eq!(
        lesson.tile("a").unwrap().grid_position,
        lesson.tile("b").unwrap().grid_position
    );
    assert_eq!(lesson.tiles_on_page("page-1").count(), 1);
    assert_eq!(lesson.tiles_on_page("page-2").count(), 1);
}
