//! Lesson documents
//!
//! `LessonContent` is the canonical, page-id addressed layout document.
//! Documents written by older editors arrive as [`RawLessonContent`]: they
//! may lack canvas settings, use a numeric page count (`total_pages` plus a
//! 1-based `tile.page`), or carry tiles without a page or grid footprint.
//! [`LessonContent::from_raw`] normalizes all of those into a state where
//! every layout invariant holds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::grid::{CanvasSettings, GridPosition, PixelPosition, PixelSize, MAX_GRID_EXTENT};
use super::page::{default_title, Page, PageId};
use super::serde_helpers::{deserialize_id, deserialize_opt_id};
use super::tile::{Tile, TileKind};
use crate::error::LayoutError;
use crate::layout::coords::{pixel_extent_to_span, pixel_to_grid};
use crate::layout::height::calculate_canvas_height;
use crate::layout::occupancy::{is_in_bounds, Occupancy};
use crate::layout::placement::find_in;
use crate::page_index;

/// Canonical lesson layout document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LessonContent {
    pub tiles: Vec<Tile>,
    pub pages: Vec<Page>,
    pub canvas_settings: CanvasSettings,
}

impl Default for LessonContent {
    fn default() -> Self {
        Self {
            tiles: Vec::new(),
            pages: vec![Page::new(migrated_page_id(1), default_title(1), 1)],
            canvas_settings: CanvasSettings::default(),
        }
    }
}

/// Lesson document as persisted by any editor version
#[derive(Deserialize, Debug, Default)]
pub struct RawLessonContent {
    #[serde(default)]
    pub tiles: Vec<RawTile>,

    #[serde(default)]
    pub pages: Option<Vec<Page>>,

    #[serde(default, alias = "totalPages")]
    pub total_pages: Option<u32>,

    #[serde(default, alias = "canvasSettings")]
    pub canvas_settings: Option<CanvasSettings>,
}

/// Tile as persisted by any editor version
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RawTile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: TileKind,

    #[serde(default, alias = "grid_position")]
    pub grid_position: Option<RawGridPosition>,

    #[serde(default)]
    pub position: Option<PixelPosition>,

    #[serde(default)]
    pub size: Option<PixelSize>,

    #[serde(default, alias = "page_id", deserialize_with = "deserialize_opt_id")]
    pub page_id: Option<String>,

    /// Legacy 1-based page number
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default, alias = "z_index")]
    pub z_index: i32,

    #[serde(default)]
    pub content: serde_json::Value,

    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,

    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<String>,
}

/// Grid footprint that may hold negative or missing values
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct RawGridPosition {
    #[serde(default)]
    pub col: i64,
    #[serde(default)]
    pub row: i64,
    #[serde(default = "one", alias = "col_span")]
    pub col_span: i64,
    #[serde(default = "one", alias = "row_span")]
    pub row_span: i64,
}

fn unknown_kind() -> TileKind {
    TileKind::Unknown
}

fn one() -> i64 {
    1
}

fn non_negative(v: i64) -> u32 {
    v.clamp(0, MAX_GRID_EXTENT as i64) as u32
}

impl RawGridPosition {
    /// Footprint with negatives raised to 0, spans at least 1 and every
    /// value capped at [`MAX_GRID_EXTENT`]
    pub fn to_grid(self) -> GridPosition {
        GridPosition::new(
            non_negative(self.col),
            non_negative(self.row),
            non_negative(self.col_span).max(1),
            non_negative(self.row_span).max(1),
        )
    }
}

/// Id given to pages created from a legacy numeric page count
pub fn migrated_page_id(number: u32) -> PageId {
    format!("page-{}", number)
}

impl LessonContent {
    /// Parse a persisted document of any editor version and normalize it
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let raw: RawLessonContent = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Normalize a persisted document into the canonical model.
    ///
    /// Missing settings get defaults; a numeric page count becomes a page
    /// collection; tiles are assigned to an existing page, clamped into the
    /// canvas, moved off earlier tiles they overlap, and given pixel fields
    /// derived from their footprint.
    pub fn from_raw(raw: RawLessonContent) -> Self {
        let settings = raw.canvas_settings.unwrap_or_default().sanitized();
        let pages = normalize_pages(raw.pages, raw.total_pages);
        let fallback = page_index::first(&pages)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| migrated_page_id(1));

        let mut seen_ids = HashSet::new();
        let mut tiles: Vec<Tile> = Vec::with_capacity(raw.tiles.len());

        for raw_tile in raw.tiles {
            let page_id = resolve_page(&pages, &raw_tile, &fallback);
            let desired = resolve_grid(&raw_tile, &settings).clamped(settings.columns);

            let id = if seen_ids.contains(&raw_tile.id) {
                let fresh = uuid::Uuid::new_v4().to_string();
                log::warn!("duplicate tile id {}, renamed to {}", raw_tile.id, fresh);
                fresh
            } else {
                raw_tile.id.clone()
            };
            seen_ids.insert(id.clone());

            let grid_position = {
                let occupancy = Occupancy::from_tiles(page_index::tiles_on_page(&tiles, &page_id));
                let placed = find_in(&desired, &settings, &occupancy, None);
                if placed != desired {
                    log::warn!("tile {} overlapped at {:?}, moved to {:?}", id, desired, placed);
                }
                placed
            };

            let now = chrono::Utc::now().to_rfc3339();
            let created_at = raw_tile.created_at.unwrap_or_else(|| now.clone());
            let updated_at = raw_tile.updated_at.unwrap_or_else(|| created_at.clone());

            let mut tile = Tile {
                id,
                kind: raw_tile.kind,
                grid_position,
                position: PixelPosition::default(),
                size: PixelSize::default(),
                page_id,
                z_index: raw_tile.z_index,
                content: raw_tile.content,
                created_at,
                updated_at,
            };
            tile.sync_pixels(&settings);
            tiles.push(tile);
        }

        let mut lesson = Self { tiles, pages, canvas_settings: settings };
        lesson.refresh_height(&fallback);
        lesson
    }

    pub fn tile(&self, tile_id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    pub fn tile_mut(&mut self, tile_id: &str) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == tile_id)
    }

    pub fn tiles_on_page<'a>(
        &'a self,
        page_id: &'a str,
    ) -> impl Iterator<Item = &'a Tile> + Clone + 'a {
        page_index::tiles_on_page(&self.tiles, page_id)
    }

    /// Recompute the cached canvas height for the page being displayed
    pub fn refresh_height(&mut self, page_id: &str) -> u32 {
        let height = calculate_canvas_height(
            page_index::tiles_on_page(&self.tiles, page_id),
            self.canvas_settings.min_rows,
        );
        self.canvas_settings.height = height;
        height
    }

    /// Descriptions of every broken layout invariant; empty when consistent
    pub fn invariant_violations(&self) -> Vec<String> {
        let settings = &self.canvas_settings;
        let mut problems = Vec::new();

        if self.pages.is_empty() {
            problems.push("lesson has no pages".to_string());
        }
        let mut orders: Vec<u32> = self.pages.iter().map(|p| p.order).collect();
        orders.sort_unstable();
        if orders.iter().enumerate().any(|(i, o)| *o != i as u32 + 1) {
            problems.push(format!("page orders not contiguous: {:?}", orders));
        }

        for (i, tile) in self.tiles.iter().enumerate() {
            if !is_in_bounds(&tile.grid_position, settings) {
                problems.push(format!("tile {} out of bounds: {:?}", tile.id, tile.grid_position));
            }
            if !page_index::contains(&self.pages, &tile.page_id) {
                problems.push(format!("tile {} on missing page {}", tile.id, tile.page_id));
            }
            let mut synced = tile.clone();
            synced.sync_pixels(settings);
            if synced.position != tile.position || synced.size != tile.size {
                problems.push(format!("tile {} pixel fields out of sync", tile.id));
            }
            for other in &self.tiles[i + 1..] {
                if other.page_id == tile.page_id
                    && other.grid_position.overlaps(&tile.grid_position)
                {
                    problems.push(format!("tiles {} and {} overlap", tile.id, other.id));
                }
            }
        }

        problems
    }
}

fn normalize_pages(pages: Option<Vec<Page>>, total_pages: Option<u32>) -> Vec<Page> {
    let mut seen = HashSet::new();
    let mut normalized: Vec<Page> = pages
        .unwrap_or_default()
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();

    if normalized.is_empty() {
        let count = total_pages.unwrap_or(1).max(1);
        log::debug!("building {} pages from numeric page count", count);
        normalized = (1..=count)
            .map(|n| Page::new(migrated_page_id(n), default_title(n), n))
            .collect();
    }

    page_index::renumber(&mut normalized);
    for page in normalized.iter_mut().filter(|p| p.title.trim().is_empty()) {
        page.title = default_title(page.order);
    }
    normalized
}

fn resolve_page(pages: &[Page], raw: &RawTile, fallback: &PageId) -> PageId {
    if let Some(id) = raw.page_id.as_deref().filter(|id| page_index::contains(pages, id)) {
        return id.to_string();
    }
    if let Some(page) = raw.page.and_then(|n| page_index::page_at_number(pages, n)) {
        return page.id.clone();
    }
    log::warn!(
        "tile {} has no valid page (pageId {:?}, page {:?}), assigning {}",
        raw.id,
        raw.page_id,
        raw.page,
        fallback
    );
    fallback.clone()
}

fn resolve_grid(raw: &RawTile, settings: &CanvasSettings) -> GridPosition {
    if let Some(grid) = raw.grid_position {
        return grid.to_grid();
    }
    let origin = raw
        .position
        .map(|p| pixel_to_grid(p, settings))
        .unwrap_or_else(|| GridPosition::cell(0, 0));
    let (col_span, row_span) = raw
        .size
        .map(|s| {
            (
                pixel_extent_to_span(s.width, settings),
                pixel_extent_to_span(s.height, settings),
            )
        })
        .unwrap_or((1, 1));
    origin.with_spans(col_span, row_span)
}
