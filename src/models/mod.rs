//! Models module for the lesson canvas editor
//!
//! This module contains the data models of a lesson layout: grid and
//! pixel geometry, tiles, pages, the lesson document and the editor
//! state that owns it.

pub mod grid;
pub mod tile;
pub mod page;
pub mod lesson;
pub mod serde_helpers;
pub mod editor_state;

// Re-export commonly used types
pub use grid::*;
pub use tile::{Tile, TileId, TileKind};
pub use page::{Page, PageId};
pub use lesson::{LessonContent, RawLessonContent};
pub use editor_state::{EditorConfig, EditorState, SaveRequest};
