//! Editor state management
//!
//! `EditorState` owns the committed lesson layout together with the view
//! state around it: the page on display, the selected and text-edited tile,
//! the live pointer interaction and the auto-save schedule. Every tile or
//! page mutation goes through it so the layout invariants hold after each
//! call, the cached canvas height follows the displayed page, and auto-save
//! sees every edit.
//!
//! This is the WASM-owned source of truth for the lesson canvas.

use serde::{Deserialize, Serialize};

use super::grid::{CanvasSettings, GridPosition, PixelPosition, MAX_GRID_EXTENT};
use super::lesson::LessonContent;
use super::page::{Page, PageId};
use super::tile::{Tile, TileId};
use crate::autosave::{AutoSave, SaveTicket, DEFAULT_DEBOUNCE_MS};
use crate::error::LayoutError;
use crate::interaction::{Interaction, InteractionUpdate};
use crate::layout::coords::{pixel_to_grid, snap_to_grid};
use crate::layout::occupancy::Occupancy;
use crate::layout::placement::find_in;
use crate::layout::resize::{compute_resize, resize_candidate, ResizeHandle};
use crate::page_index::{self, DeletedPage};

/// Host-supplied editor configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default = "default_debounce")]
    pub autosave_debounce_ms: f64,

    /// Overrides the lesson's own minimum canvas rows when set
    #[serde(default)]
    pub min_rows: Option<u32>,
}

fn default_debounce() -> f64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_rows: None,
        }
    }
}

/// A save the host should perform: the ticket to report back and the
/// lesson snapshot taken when the save was issued
#[derive(Serialize, Clone, Debug)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub lesson: LessonContent,
}

/// Complete editor state (WASM-owned source of truth)
#[derive(Debug, Clone)]
pub struct EditorState {
    lesson: LessonContent,
    active_page: PageId,
    selected_tile: Option<TileId>,
    editing_tile: Option<TileId>,
    interaction: Interaction,
    autosave: AutoSave,
}

impl EditorState {
    /// Wrap an already-normalized lesson; the first page is displayed
    pub fn new(mut lesson: LessonContent, config: &EditorConfig) -> Self {
        if let Some(min_rows) = config.min_rows {
            lesson.canvas_settings.min_rows = min_rows.clamp(1, MAX_GRID_EXTENT);
        }
        if lesson.pages.is_empty() {
            page_index::add_page(&mut lesson.pages);
        }
        let active_page = page_index::first(&lesson.pages)
            .map(|p| p.id.clone())
            .unwrap_or_default();
        page_index::reassign_orphans(&lesson.pages, &mut lesson.tiles, &active_page);
        lesson.refresh_height(&active_page);

        Self {
            lesson,
            active_page,
            selected_tile: None,
            editing_tile: None,
            interaction: Interaction::Idle,
            autosave: AutoSave::new(config.autosave_debounce_ms),
        }
    }

    /// Parse and normalize a persisted lesson of any editor version
    pub fn from_json(json: &str, config: &EditorConfig) -> Result<Self, LayoutError> {
        Ok(Self::new(LessonContent::from_json(json)?, config))
    }

    pub fn lesson(&self) -> &LessonContent {
        &self.lesson
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.lesson.canvas_settings
    }

    pub fn active_page(&self) -> &str {
        &self.active_page
    }

    /// Canvas rows for the displayed page
    pub fn canvas_height(&self) -> u32 {
        self.lesson.canvas_settings.height
    }

    pub fn selected_tile(&self) -> Option<&str> {
        self.selected_tile.as_deref()
    }

    pub fn editing_tile(&self) -> Option<&str> {
        self.editing_tile.as_deref()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    pub fn tiles_on_active_page(&self) -> Vec<&Tile> {
        self.lesson.tiles_on_page(&self.active_page).collect()
    }

    /// 1-based display number of a page
    pub fn page_number(&self, page_id: &str) -> Option<u32> {
        page_index::page_number(&self.lesson.pages, page_id)
    }

    fn tile_on_active_page(&self, tile_id: &str) -> Result<&Tile, LayoutError> {
        let tile = self
            .lesson
            .tile(tile_id)
            .ok_or_else(|| LayoutError::TileNotFound(tile_id.to_string()))?;
        if tile.page_id != self.active_page {
            return Err(LayoutError::TileNotOnActivePage(tile_id.to_string()));
        }
        Ok(tile)
    }

    /// Whether `candidate` is free on the tile's page, ignoring the tile itself
    fn fits(&self, tile_id: &str, page_id: &str, candidate: &GridPosition) -> bool {
        let occupancy = Occupancy::from_tiles(self.lesson.tiles_on_page(page_id));
        occupancy.is_valid(candidate, &self.lesson.canvas_settings, Some(tile_id))
    }

    /// Write a footprint that has already been validated
    fn commit_position(&mut self, tile_id: &str, grid_position: GridPosition) {
        let LessonContent { tiles, canvas_settings, .. } = &mut self.lesson;
        if let Some(tile) = tiles.iter_mut().find(|t| t.id == tile_id) {
            tile.set_grid_position(grid_position, canvas_settings);
        }
    }

    fn after_edit(&mut self, now_ms: f64) {
        self.lesson.refresh_height(&self.active_page);
        self.autosave.mark_dirty(now_ms);
    }

    // ------------------------------------------------------------------
    // Tiles
    // ------------------------------------------------------------------

    /// Place a factory-built tile on the displayed page.
    ///
    /// With a `drop_point` the tile's origin is the cell under that point;
    /// otherwise its own `grid_position` is the desired spot. Either way the
    /// nearest free footprint is used. The new tile is selected and stacked
    /// above the others on the page.
    pub fn add_tile(
        &mut self,
        mut tile: Tile,
        drop_point: Option<PixelPosition>,
        now_ms: f64,
    ) -> Result<GridPosition, LayoutError> {
        if self.lesson.tile(&tile.id).is_some() {
            return Err(LayoutError::DuplicateTile(tile.id));
        }

        let settings = &self.lesson.canvas_settings;
        let desired = match drop_point {
            Some(point) => {
                let cell = pixel_to_grid(snap_to_grid(point, settings), settings);
                cell.with_spans(tile.grid_position.col_span, tile.grid_position.row_span)
            }
            None => tile.grid_position,
        };
        let desired = desired.clamped(settings.columns);

        let page_tiles = self.lesson.tiles_on_page(&self.active_page);
        let top_z = page_tiles.clone().map(|t| t.z_index).max();
        let placed = find_in(&desired, settings, &Occupancy::from_tiles(page_tiles), None);

        tile.page_id = self.active_page.clone();
        tile.z_index = top_z.map_or(0, |z| z.saturating_add(1));
        tile.set_grid_position(placed, settings);

        log::debug!("placed tile {} at {:?} (desired {:?})", tile.id, placed, desired);
        self.selected_tile = Some(tile.id.clone());
        self.lesson.tiles.push(tile);
        self.after_edit(now_ms);
        Ok(placed)
    }

    /// Move a tile to an exact footprint (keyboard nudge, inspector edit).
    ///
    /// Returns `Ok(None)` when the target is taken or out of bounds; the
    /// tile is left where it was.
    pub fn move_tile(
        &mut self,
        tile_id: &str,
        target: GridPosition,
        now_ms: f64,
    ) -> Result<Option<GridPosition>, LayoutError> {
        let page_id = self
            .lesson
            .tile(tile_id)
            .map(|t| t.page_id.clone())
            .ok_or_else(|| LayoutError::TileNotFound(tile_id.to_string()))?;

        if !self.fits(tile_id, &page_id, &target) {
            return Ok(None);
        }
        self.commit_position(tile_id, target);
        self.after_edit(now_ms);
        Ok(Some(target))
    }

    /// Replace a tile's type-specific content
    pub fn set_tile_content(
        &mut self,
        tile_id: &str,
        content: serde_json::Value,
        now_ms: f64,
    ) -> Result<(), LayoutError> {
        let tile = self
            .lesson
            .tile_mut(tile_id)
            .ok_or_else(|| LayoutError::TileNotFound(tile_id.to_string()))?;
        tile.content = content;
        tile.touch();
        self.autosave.mark_dirty(now_ms);
        Ok(())
    }

    pub fn delete_tile(&mut self, tile_id: &str, now_ms: f64) -> Result<Tile, LayoutError> {
        let index = self
            .lesson
            .tiles
            .iter()
            .position(|t| t.id == tile_id)
            .ok_or_else(|| LayoutError::TileNotFound(tile_id.to_string()))?;
        let removed = self.lesson.tiles.remove(index);

        self.forget_tile(tile_id);
        self.after_edit(now_ms);
        Ok(removed)
    }

    /// Drop any view state pointing at a tile that no longer exists
    fn forget_tile(&mut self, tile_id: &str) {
        if self.selected_tile.as_deref() == Some(tile_id) {
            self.selected_tile = None;
        }
        if self.editing_tile.as_deref() == Some(tile_id) {
            self.editing_tile = None;
        }
        if self.interaction.tile_id() == Some(tile_id) {
            self.interaction.finish();
        }
    }

    /// Select a tile on the displayed page, or clear the selection.
    /// Selecting a different tile ends text editing of the previous one.
    pub fn select_tile(&mut self, tile_id: Option<&str>) -> Result<(), LayoutError> {
        if let Some(id) = tile_id {
            self.tile_on_active_page(id)?;
        }
        if self.editing_tile.as_deref() != tile_id {
            self.editing_tile = None;
        }
        self.selected_tile = tile_id.map(str::to_string);
        Ok(())
    }

    /// Start or stop content editing; an edited tile is also selected
    pub fn set_editing(&mut self, tile_id: Option<&str>) -> Result<(), LayoutError> {
        if let Some(id) = tile_id {
            self.tile_on_active_page(id)?;
            self.selected_tile = Some(id.to_string());
        }
        self.editing_tile = tile_id.map(str::to_string);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pointer interactions
    // ------------------------------------------------------------------

    /// Start dragging a tile from `pointer`; replaces any live interaction
    pub fn begin_drag(&mut self, tile_id: &str, pointer: PixelPosition) -> Result<(), LayoutError> {
        let tile = self.tile_on_active_page(tile_id)?;
        let next = Interaction::Dragging {
            tile_id: tile.id.clone(),
            pointer_offset: pointer.delta_from(tile.position),
        };
        self.interaction.replace(next);
        self.selected_tile = Some(tile_id.to_string());
        Ok(())
    }

    /// Start dragging a resize handle; replaces any live interaction
    pub fn begin_resize(
        &mut self,
        tile_id: &str,
        handle: ResizeHandle,
        pointer: PixelPosition,
    ) -> Result<(), LayoutError> {
        let tile = self.tile_on_active_page(tile_id)?;
        let next = Interaction::Resizing {
            tile_id: tile.id.clone(),
            handle,
            start: tile.grid_position,
            pointer_start: pointer,
        };
        self.interaction.replace(next);
        self.selected_tile = Some(tile_id.to_string());
        Ok(())
    }

    /// Start panning the picture of an image tile whose current pan offset
    /// is `offset`; replaces any live interaction
    pub fn begin_image_pan(
        &mut self,
        tile_id: &str,
        pointer: PixelPosition,
        offset: PixelPosition,
    ) -> Result<(), LayoutError> {
        let tile = self.tile_on_active_page(tile_id)?;
        if !tile.kind.is_image() {
            return Err(LayoutError::NotAnImage(tile_id.to_string()));
        }
        let next = Interaction::ImagePanning {
            tile_id: tile.id.clone(),
            pointer_start: pointer,
            offset_start: offset,
        };
        self.interaction.replace(next);
        Ok(())
    }

    /// Apply a pointer-move to the live interaction.
    ///
    /// Valid drag/resize candidates are committed immediately; invalid ones
    /// leave the tile at its last valid footprint.
    pub fn pointer_move(&mut self, pointer: PixelPosition, now_ms: f64) -> InteractionUpdate {
        match self.interaction.clone() {
            Interaction::Idle => InteractionUpdate::Unchanged,
            Interaction::Dragging { tile_id, pointer_offset } => {
                self.drag_to(tile_id, pointer.delta_from(pointer_offset), now_ms)
            }
            Interaction::Resizing { tile_id, handle, start, pointer_start } => {
                self.resize_to(tile_id, handle, start, pointer.delta_from(pointer_start), now_ms)
            }
            Interaction::ImagePanning { tile_id, pointer_start, offset_start } => {
                let delta = pointer.delta_from(pointer_start);
                InteractionUpdate::Panned {
                    tile_id,
                    offset: offset_start.offset_by(delta.x, delta.y),
                }
            }
        }
    }

    /// Apply the final pointer position and end the interaction
    pub fn pointer_up(&mut self, pointer: PixelPosition, now_ms: f64) -> InteractionUpdate {
        let update = self.pointer_move(pointer, now_ms);
        self.interaction.finish();
        update
    }

    /// End the live interaction without applying anything further
    pub fn cancel_interaction(&mut self) -> Interaction {
        self.interaction.finish()
    }

    fn drag_to(
        &mut self,
        tile_id: TileId,
        top_left: PixelPosition,
        now_ms: f64,
    ) -> InteractionUpdate {
        let Some(tile) = self.lesson.tile(&tile_id) else {
            self.interaction.finish();
            return InteractionUpdate::Unchanged;
        };
        let settings = &self.lesson.canvas_settings;
        let current = tile.grid_position;
        let page_id = tile.page_id.clone();

        let cell = pixel_to_grid(snap_to_grid(top_left, settings), settings);
        let candidate = cell.with_spans(current.col_span, current.row_span);

        if candidate == current {
            return InteractionUpdate::Unchanged;
        }
        if !self.fits(&tile_id, &page_id, &candidate) {
            return InteractionUpdate::Rejected { tile_id, candidate };
        }
        self.commit_position(&tile_id, candidate);
        self.after_edit(now_ms);
        InteractionUpdate::Moved { tile_id, grid_position: candidate }
    }

    fn resize_to(
        &mut self,
        tile_id: TileId,
        handle: ResizeHandle,
        start: GridPosition,
        delta: PixelPosition,
        now_ms: f64,
    ) -> InteractionUpdate {
        let Some(tile) = self.lesson.tile(&tile_id) else {
            self.interaction.finish();
            return InteractionUpdate::Unchanged;
        };
        let current = tile.grid_position;
        let resolved = compute_resize(
            handle,
            &start,
            delta,
            &self.lesson.canvas_settings,
            self.lesson.tiles_on_page(&tile.page_id),
            &tile_id,
        );

        match resolved {
            Some(next) if next == current => InteractionUpdate::Unchanged,
            Some(next) => {
                self.commit_position(&tile_id, next);
                self.after_edit(now_ms);
                InteractionUpdate::Resized { tile_id, grid_position: next }
            }
            None => {
                let candidate =
                    resize_candidate(handle, &start, delta, &self.lesson.canvas_settings);
                InteractionUpdate::Rejected { tile_id, candidate }
            }
        }
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Append a page; the displayed page does not change
    pub fn add_page(&mut self, now_ms: f64) -> Page {
        let page = page_index::add_page(&mut self.lesson.pages);
        self.autosave.mark_dirty(now_ms);
        page
    }

    /// Delete a page and its tiles. When the displayed page is deleted, the
    /// page that takes over its number is shown (or the new last page).
    pub fn delete_page(&mut self, page_id: &str, now_ms: f64) -> Result<DeletedPage, LayoutError> {
        let number = self.page_number(page_id);
        let deleted =
            page_index::delete_page(&mut self.lesson.pages, &mut self.lesson.tiles, page_id)?;

        for tile in &deleted.tiles {
            self.forget_tile(&tile.id);
        }

        if self.active_page == page_id {
            let replacement = number
                .and_then(|n| page_index::page_at_number(&self.lesson.pages, n))
                .or_else(|| self.lesson.pages.iter().max_by_key(|p| p.order))
                .map(|p| p.id.clone());
            if let Some(id) = replacement {
                self.show_page(id);
            }
        }

        self.after_edit(now_ms);
        Ok(deleted)
    }

    pub fn rename_page(
        &mut self,
        page_id: &str,
        title: &str,
        now_ms: f64,
    ) -> Result<(), LayoutError> {
        page_index::rename_page(&mut self.lesson.pages, page_id, title)?;
        self.autosave.mark_dirty(now_ms);
        Ok(())
    }

    /// Display another page. Selection, text editing and any live
    /// interaction belonging to a tile on a different page are cancelled.
    pub fn select_page(&mut self, page_id: &str) -> Result<(), LayoutError> {
        page_index::find(&self.lesson.pages, page_id)?;
        self.show_page(page_id.to_string());
        Ok(())
    }

    fn show_page(&mut self, page_id: PageId) {
        let on_page = |lesson: &LessonContent, tile_id: Option<&str>| {
            tile_id
                .and_then(|id| lesson.tile(id))
                .is_some_and(|t| t.page_id == page_id)
        };

        if !on_page(&self.lesson, self.selected_tile.as_deref()) {
            self.selected_tile = None;
        }
        if !on_page(&self.lesson, self.editing_tile.as_deref()) {
            self.editing_tile = None;
        }
        if !on_page(&self.lesson, self.interaction.tile_id()) {
            self.interaction.finish();
        }

        self.lesson.refresh_height(&page_id);
        self.active_page = page_id;
    }

    // ------------------------------------------------------------------
    // Auto-save
    // ------------------------------------------------------------------

    /// Snapshot for a due save, if one is due
    pub fn poll_autosave(&mut self, now_ms: f64) -> Option<SaveRequest> {
        let ticket = self.autosave.poll(now_ms)?;
        Some(SaveRequest { ticket, lesson: self.lesson.clone() })
    }

    /// Snapshot for an immediate save, if the lesson is dirty
    pub fn flush_autosave(&mut self) -> Option<SaveRequest> {
        let ticket = self.autosave.flush()?;
        Some(SaveRequest { ticket, lesson: self.lesson.clone() })
    }

    /// Report a save outcome; the in-memory layout is never altered by it
    pub fn complete_autosave(&mut self, ticket: SaveTicket, ok: bool, now_ms: f64) -> bool {
        self.autosave.complete(ticket, ok, now_ms)
    }
}
