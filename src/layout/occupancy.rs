//! Occupancy checks for candidate tile footprints
//!
//! Callers pass the tiles of a single page; tiles on other pages never
//! collide.

use crate::models::{CanvasSettings, GridPosition, Tile, MAX_GRID_EXTENT};

/// Whether `candidate` lies inside the canvas columns and above the row limit
pub fn is_in_bounds(candidate: &GridPosition, settings: &CanvasSettings) -> bool {
    candidate.col_span >= 1
        && candidate.row_span >= 1
        && candidate.right() <= settings.columns
        && candidate.bottom() <= MAX_GRID_EXTENT
}

/// Footprints of every tile on one page, snapshotted once so repeated
/// queries during a search don't re-walk the tile list.
#[derive(Debug, Clone, Default)]
pub struct Occupancy<'a> {
    footprints: Vec<(&'a str, GridPosition)>,
}

impl<'a> Occupancy<'a> {
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = &'a Tile>,
    {
        Self {
            footprints: tiles
                .into_iter()
                .map(|t| (t.id.as_str(), t.grid_position))
                .collect(),
        }
    }

    /// Largest exclusive bottom edge among all footprints (0 when empty)
    pub fn max_bottom(&self) -> u32 {
        self.footprints.iter().map(|(_, g)| g.bottom()).max().unwrap_or(0)
    }

    /// Id of the first tile overlapping `candidate`, skipping `exclude`
    pub fn first_collision(
        &self,
        candidate: &GridPosition,
        exclude: Option<&str>,
    ) -> Option<&'a str> {
        self.footprints
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .find(|(_, g)| g.overlaps(candidate))
            .map(|(id, _)| *id)
    }

    /// Bounds check plus overlap check
    pub fn is_valid(
        &self,
        candidate: &GridPosition,
        settings: &CanvasSettings,
        exclude: Option<&str>,
    ) -> bool {
        is_in_bounds(candidate, settings) && self.first_collision(candidate, exclude).is_none()
    }
}

/// Whether `candidate` is inside the canvas and overlaps no tile in
/// `tiles` other than `exclude_tile_id`.
pub fn is_valid_grid_position<'a, I>(
    candidate: &GridPosition,
    settings: &CanvasSettings,
    tiles: I,
    exclude_tile_id: Option<&str>,
) -> bool
where
    I: IntoIterator<Item = &'a Tile>,
{
    is_in_bounds(candidate, settings)
        && !tiles
            .into_iter()
            .filter(|t| Some(t.id.as_str()) != exclude_tile_id)
            .any(|t| t.grid_position.overlaps(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TileKind;

    const NO_TILES: &[Tile] = &[];

    fn tile(id: &str, g: GridPosition) -> Tile {
        Tile::new(id, TileKind::Text, g, "p1", &CanvasSettings::default())
    }

    #[test]
    fn test_out_of_bounds_right_edge() {
        let s = CanvasSettings::default();
        assert!(is_valid_grid_position(&GridPosition::new(8, 0, 4, 1), &s, NO_TILES, None));
        assert!(!is_valid_grid_position(&GridPosition::new(9, 0, 4, 1), &s, NO_TILES, None));
    }

    #[test]
    fn test_zero_span_is_invalid() {
        let s = CanvasSettings::default();
        assert!(!is_valid_grid_position(&GridPosition::new(0, 0, 0, 1), &s, NO_TILES, None));
        assert!(!is_valid_grid_position(&GridPosition::new(0, 0, 1, 0), &s, NO_TILES, None));
    }

    #[test]
    fn test_overlap_rejected_unless_excluded() {
        let s = CanvasSettings::default();
        let tiles = vec![tile("a", GridPosition::new(0, 0, 4, 2))];
        let candidate = GridPosition::new(2, 1, 4, 2);

        assert!(!is_valid_grid_position(&candidate, &s, &tiles, None));
        assert!(is_valid_grid_position(&candidate, &s, &tiles, Some("a")));
    }

    #[test]
    fn test_occupancy_reports_collision_and_bottom() {
        let s = CanvasSettings::default();
        let tiles = vec![
            tile("a", GridPosition::new(0, 0, 4, 2)),
            tile("b", GridPosition::new(6, 3, 2, 2)),
        ];
        let occ = Occupancy::from_tiles(&tiles);

        assert_eq!(occ.max_bottom(), 5);
        assert_eq!(occ.first_collision(&GridPosition::new(7, 4, 1, 1), None), Some("b"));
        assert!(occ.is_valid(&GridPosition::new(4, 0, 2, 3), &s, None));
    }
}
