//! Error types for lesson layout operations
//!
//! Placement and resize rejections are not errors; they surface as `None`
//! or `false` and leave the committed layout untouched. The variants here
//! cover lookups and page-collection guards.

use thiserror::Error;

use crate::models::{PageId, TileId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A lesson must keep at least one page
    #[error("Cannot delete the last remaining page")]
    LastPage,

    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Tile not found: {0}")]
    TileNotFound(TileId),

    #[error("Tile id already in use: {0}")]
    DuplicateTile(TileId),

    /// Tile exists but lives on a page other than the one displayed
    #[error("Tile {0} is not on the active page")]
    TileNotOnActivePage(TileId),

    #[error("Tile {0} is not an image tile")]
    NotAnImage(TileId),

    /// Input could not be read as a lesson document at all
    #[error("Invalid lesson document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::InvalidDocument(e.to_string())
    }
}
