//! Shared types for the WASM API
//!
//! Request and result shapes exchanged with the host. Field names are
//! camelCase to match the persisted lesson format.

use serde::{Deserialize, Serialize};

use crate::interaction::Interaction;
use crate::models::lesson::RawGridPosition;
use crate::models::{CanvasSettings, EditorState, GridPosition, Page, PixelPosition, Tile, TileKind};

/// A tile to be placed on the displayed page
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddTileRequest {
    /// Generated when omitted
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TileKind,
    /// Desired footprint; also supplies the spans for a drop
    pub grid_position: GridPosition,
    /// Pointer location of a palette drop, in canvas pixels
    #[serde(default)]
    pub drop_point: Option<PixelPosition>,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// View of the editor the host needs to re-render the canvas
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub active_page: String,
    pub active_page_number: u32,
    pub canvas_height: u32,
    pub selected_tile: Option<String>,
    pub editing_tile: Option<String>,
    pub interaction: Interaction,
    pub pages: Vec<Page>,
    /// Tiles of the displayed page only
    pub tiles: Vec<Tile>,
}

impl EditorSnapshot {
    pub fn of(editor: &EditorState) -> Self {
        Self {
            active_page: editor.active_page().to_string(),
            active_page_number: editor.page_number(editor.active_page()).unwrap_or(1),
            canvas_height: editor.canvas_height(),
            selected_tile: editor.selected_tile().map(str::to_string),
            editing_tile: editor.editing_tile().map(str::to_string),
            interaction: editor.interaction().clone(),
            pages: editor.lesson().pages.clone(),
            tiles: editor.tiles_on_active_page().into_iter().cloned().collect(),
        }
    }
}

/// Result of deleting a page
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeletePageResult {
    pub deleted_page: Page,
    pub removed_tile_ids: Vec<String>,
    pub active_page: String,
}

/// Tile as accepted by the stateless geometry functions. Only the id and the
/// footprint matter: a full persisted tile works, and so does
/// `{ id, gridPosition }` or a flat `{ id, col, row, colSpan, rowSpan }`.
/// Missing values default like a persisted document's.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TileFootprint {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "grid_position")]
    pub grid_position: Option<RawGridPosition>,
    #[serde(default)]
    pub col: i64,
    #[serde(default)]
    pub row: i64,
    #[serde(default = "one", alias = "col_span")]
    pub col_span: i64,
    #[serde(default = "one", alias = "row_span")]
    pub row_span: i64,
}

fn one() -> i64 {
    1
}

impl TileFootprint {
    pub fn into_tile(self, settings: &CanvasSettings) -> Tile {
        let raw = self.grid_position.unwrap_or(RawGridPosition {
            col: self.col,
            row: self.row,
            col_span: self.col_span,
            row_span: self.row_span,
        });
        Tile::new(self.id, TileKind::Unknown, raw.to_grid(), "", settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{calculate_canvas_height, is_valid_grid_position};

    fn tiles(json: &str) -> Vec<Tile> {
        let footprints: Vec<TileFootprint> = serde_json::from_str(json).unwrap();
        let settings = CanvasSettings::default();
        footprints.into_iter().map(|f| f.into_tile(&settings)).collect()
    }

    #[test]
    fn test_flat_footprint_is_enough_for_height() {
        let got = tiles(r#"[{"row": 5, "rowSpan": 2}]"#);
        assert_eq!(got[0].grid_position, GridPosition::new(0, 5, 1, 2));
        assert_eq!(calculate_canvas_height(&got, 6), 7);
    }

    #[test]
    fn test_nested_footprint_and_full_tile_shapes() {
        let got = tiles(
            r#"[
                {"id": "a", "gridPosition": {"col": 2, "row": 0, "colSpan": 3}},
                {"id": "b", "type": "quiz", "pageId": "p1", "zIndex": 4,
                 "gridPosition": {"col": 6, "row": 1, "colSpan": 2, "rowSpan": 2},
                 "position": {"x": 528, "y": 88}, "size": {"width": 168, "height": 168}}
            ]"#,
        );
        assert_eq!(got[0].grid_position, GridPosition::new(2, 0, 3, 1));
        assert_eq!(got[1].grid_position, GridPosition::new(6, 1, 2, 2));

        let s = CanvasSettings::default();
        assert!(!is_valid_grid_position(&GridPosition::new(4, 0, 1, 1), &s, &got, None));
        assert!(is_valid_grid_position(&GridPosition::new(4, 0, 1, 1), &s, &got, Some("a")));
    }
}
