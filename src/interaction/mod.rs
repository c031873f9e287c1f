//! Pointer interaction state
//!
//! At most one interaction is live at a time. Starting a new one replaces
//! whatever was active; ending one returns to `Idle`. Hosts attach global
//! pointer-move/up listeners only while [`Interaction::is_active`] holds.

use serde::{Deserialize, Serialize};

use crate::layout::ResizeHandle;
use crate::models::{GridPosition, PixelPosition, TileId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Interaction {
    #[default]
    Idle,

    /// Moving a tile; `pointer_offset` is the pointer's distance from the
    /// tile's top-left corner when the drag began
    Dragging {
        tile_id: TileId,
        pointer_offset: PixelPosition,
    },

    /// Dragging a resize handle; deltas are measured from `pointer_start`
    Resizing {
        tile_id: TileId,
        handle: ResizeHandle,
        start: GridPosition,
        pointer_start: PixelPosition,
    },

    /// Panning the picture inside an image tile; layout is not affected
    ImagePanning {
        tile_id: TileId,
        pointer_start: PixelPosition,
        offset_start: PixelPosition,
    },
}

impl Interaction {
    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }

    /// Tile the interaction is operating on
    pub fn tile_id(&self) -> Option<&str> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { tile_id, .. }
            | Interaction::Resizing { tile_id, .. }
            | Interaction::ImagePanning { tile_id, .. } => Some(tile_id),
        }
    }

    /// Install `next` and return the interaction it replaced
    pub fn replace(&mut self, next: Interaction) -> Interaction {
        std::mem::replace(self, next)
    }

    /// Return to idle, handing back the interaction that was live
    pub fn finish(&mut self) -> Interaction {
        self.replace(Interaction::Idle)
    }
}

/// What a pointer event did to the committed layout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InteractionUpdate {
    /// No interaction live, or the pointer stayed within the same cell
    Unchanged,

    Moved {
        tile_id: TileId,
        grid_position: GridPosition,
    },

    Resized {
        tile_id: TileId,
        grid_position: GridPosition,
    },

    /// New pan offset for the image inside the tile
    Panned {
        tile_id: TileId,
        offset: PixelPosition,
    },

    /// The candidate collided or left the canvas; the tile keeps its last
    /// valid footprint
    Rejected {
        tile_id: TileId,
        candidate: GridPosition,
    },
}
