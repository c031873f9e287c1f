//! Lesson tiles
//!
//! A tile is one block of lesson content placed on a page. Its layout is
//! owned by `grid_position`; `position` and `size` are the pixel image of
//! that footprint and are refreshed with [`Tile::sync_pixels`].

use serde::{Deserialize, Serialize};

use super::grid::{CanvasSettings, GridPosition, PixelPosition, PixelSize};
use super::page::PageId;
use super::serde_helpers::deserialize_id;
use crate::layout::coords::{grid_size_to_pixel, grid_to_pixel};

pub type TileId = String;

/// Kind of lesson content carried by a tile
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Text,
    Image,
    Quiz,
    Programming,
    Sequencing,
    Matching,
    #[serde(alias = "fill_blanks", alias = "fillBlanks")]
    Blanks,
    Pairing,
    /// Tile type written by a newer editor; kept and laid out like any other
    #[serde(other)]
    Unknown,
}

impl TileKind {
    pub fn is_image(&self) -> bool {
        matches!(self, TileKind::Image)
    }
}

/// A tile as committed to the lesson
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: TileId,

    #[serde(rename = "type")]
    pub kind: TileKind,

    pub grid_position: GridPosition,

    /// Derived from `grid_position`
    #[serde(default)]
    pub position: PixelPosition,

    /// Derived from `grid_position`
    #[serde(default)]
    pub size: PixelSize,

    #[serde(deserialize_with = "deserialize_id")]
    pub page_id: PageId,

    #[serde(default)]
    pub z_index: i32,

    /// Type-specific payload, opaque to the layout engine
    #[serde(default)]
    pub content: serde_json::Value,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Tile {
    /// Build a tile with the given footprint; pixel fields start in sync
    pub fn new(
        id: impl Into<TileId>,
        kind: TileKind,
        grid_position: GridPosition,
        page_id: impl Into<PageId>,
        settings: &CanvasSettings,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tile = Self {
            id: id.into(),
            kind,
            grid_position,
            position: PixelPosition::default(),
            size: PixelSize::default(),
            page_id: page_id.into(),
            z_index: 0,
            content: serde_json::Value::Null,
            created_at: now.clone(),
            updated_at: now,
        };
        tile.sync_pixels(settings);
        tile
    }

    /// Recompute `position` and `size` from `grid_position`
    pub fn sync_pixels(&mut self, settings: &CanvasSettings) {
        self.position = grid_to_pixel(&self.grid_position, settings);
        self.size = grid_size_to_pixel(&self.grid_position, settings);
    }

    /// Commit a new footprint: grid and pixel fields change together
    pub fn set_grid_position(&mut self, grid_position: GridPosition, settings: &CanvasSettings) {
        self.grid_position = grid_position;
        self.sync_pixels(settings);
        self.touch();
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_pixels_follow_grid() {
        let settings = CanvasSettings::default();
        let tile = Tile::new("t1", TileKind::Text, GridPosition::new(2, 1, 3, 2), "p1", &settings);

        assert_eq!(tile.position, PixelPosition::new(176.0, 88.0));
        assert_eq!(tile.size, PixelSize { width: 256.0, height: 168.0 });
        assert_eq!(tile.created_at, tile.updated_at);
    }

    #[test]
    fn test_tile_json_shape() {
        let json = r#"{
            "id": 7,
            "type": "blanks",
            "gridPosition": {"col": 1, "row": 0, "colSpan": 2, "rowSpan": 1},
            "pageId": "page-1",
            "content": {"text": "The ___ is blue"}
        }"#;
        let tile: Tile = serde_json::from_str(json).unwrap();

        assert_eq!(tile.id, "7");
        assert_eq!(tile.kind, TileKind::Blanks);
        assert_eq!(tile.grid_position, GridPosition::new(1, 0, 2, 1));
        assert_eq!(tile.z_index, 0);
        assert_eq!(tile.content["text"], "The ___ is blue");
    }

    #[test]
    fn test_unknown_tile_type_is_kept() {
        let json = r#"{
            "id": "x",
            "type": "video",
            "gridPosition": {"col": 0, "row": 0, "colSpan": 1, "rowSpan": 1},
            "pageId": "p"
        }"#;
        let tile: Tile = serde_json::from_str(json).unwrap();
        assert_eq!(tile.kind, TileKind::Unknown);
    }
}
