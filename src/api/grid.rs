use crate::api::cell::GridCell;
use crate::api::config::GridLayerConfig;
use crate::core::constants::{CELL_NUDGE_FRACTION, MAX_CELLS};
use crate::core::locator::{cell_step, encode};
use crate::util::coord::{Coordinate, Projection, WebMercator};
use crate::util::error::BotaGridError;
use geo_types::{Polygon, Rect};
use tracing::debug;

/// Enumerates every grid cell at `level` that intersects a working-system
/// extent.
///
/// The extent is converted to geographic coordinates, clamped to the world
/// and snapped outward to whole cells, so partially visible cells on the
/// edges are included.
///
/// # Example
/// ```
/// use bota_grid_rs::{Geographic, enumerate_cells};
/// use geo_types::{Rect, coord};
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// let extent = Rect::new(coord! { x: 1.0, y: 51.0 }, coord! { x: 3.0, y: 54.0 });
/// let cells = enumerate_cells(&extent, 1, &Geographic)?;
/// assert_eq!(cells.len(), 1);
/// assert_eq!(cells[0].id, "JO");
/// # Ok(())
/// # }
/// ```
pub fn enumerate_cells<P: Projection + ?Sized>(
    extent: &Rect<f64>,
    level: u8,
    projection: &P,
) -> Result<Vec<GridCell>, BotaGridError> {
    generate_cells_for_extent(
        extent.min().x,
        extent.min().y,
        extent.max().x,
        extent.max().y,
        level,
        MAX_CELLS,
        projection,
    )
}

fn generate_cells_for_extent<P: Projection + ?Sized>(
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    level: u8,
    max_cells: usize,
    projection: &P,
) -> Result<Vec<GridCell>, BotaGridError> {
    let step = cell_step(level)?;

    if !(min_x <= max_x && min_y <= max_y) {
        return Ok(Vec::new());
    }

    let geo = projection.extent_to_geographic(&Rect::new(
        geo_types::coord! { x: min_x, y: min_y },
        geo_types::coord! { x: max_x, y: max_y },
    ))?;
    let lon_min = geo.min().x.clamp(-180.0, 180.0);
    let lon_max = geo.max().x.clamp(-180.0, 180.0);
    let lat_min = geo.min().y.clamp(-90.0, 90.0);
    let lat_max = geo.max().y.clamp(-90.0, 90.0);

    let width = 2.0 * step;
    let min_col = (lon_min / width).floor() as i64;
    let max_col = (lon_max / width).ceil() as i64;
    let min_row = (lat_min / step).floor() as i64;
    let max_row = (lat_max / step).ceil() as i64;

    let nudge = step * CELL_NUDGE_FRACTION;
    let count = (max_col - min_col)
        .max(0)
        .checked_mul((max_row - min_row).max(0))
        .and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n <= max_cells)
        .ok_or(BotaGridError::TooManyCells { level, limit: max_cells })?;
    let mut cells = Vec::with_capacity(count);

    for col in min_col..max_col {
        for row in min_row..max_row {
            cells.push(GridCell::at(col, row, level, step, nudge, projection)?);
        }
    }

    debug!(
        grid_level = level,
        cells = cells.len(),
        lon_min,
        lat_min,
        lon_max,
        lat_max,
        "enumerated grid cells"
    );
    Ok(cells)
}

/// A set of grid cells at one level covering an extent.
pub struct MaidenheadGrid {
    cells: Vec<GridCell>,
    level: u8,
}

impl MaidenheadGrid {
    pub fn builder() -> MaidenheadGridBuilder {
        MaidenheadGridBuilder::new()
    }

    pub fn from_extent(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        level: u8,
        projection: &impl Projection,
    ) -> Result<Self, BotaGridError> {
        let cells =
            generate_cells_for_extent(min_x, min_y, max_x, max_y, level, MAX_CELLS, projection)?;
        Ok(Self { cells, level })
    }

    pub fn from_rect(
        rect: &Rect<f64>,
        level: u8,
        projection: &impl Projection,
    ) -> Result<Self, BotaGridError> {
        let cells = enumerate_cells(rect, level, projection)?;
        Ok(Self { cells, level })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<GridCell> {
        self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Finds the cell containing a lon/lat point, if it was enumerated.
    pub fn get_cell_at(&self, coord: &impl Coordinate) -> Option<&GridCell> {
        let id = encode(coord.x(), coord.y(), self.level).ok()?;
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Cell boundaries in working coordinates.
    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.boundary.clone()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&GridCell>
    where
        F: Fn(&GridCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }
}

pub struct MaidenheadGridBuilder {
    level: Option<u8>,
    extent: Option<(f64, f64, f64, f64)>,
    max_cells: usize,
    projection: Box<dyn Projection>,
}

impl Default for MaidenheadGridBuilder {
    fn default() -> Self {
        Self {
            level: None,
            extent: None,
            max_cells: MAX_CELLS,
            projection: Box::new(WebMercator),
        }
    }
}

impl MaidenheadGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn extent(mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        self.extent = Some((min_x, min_y, max_x, max_y));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.extent = Some((rect.min().x, rect.min().y, rect.max().x, rect.max().y));
        self
    }

    /// Upper bound on the number of cells `build` will generate.
    pub fn max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Working coordinate system of the extent and of the produced
    /// boundaries. Defaults to Web Mercator.
    pub fn projection(mut self, projection: impl Projection + 'static) -> Self {
        self.projection = Box::new(projection);
        self
    }

    pub fn build(self) -> Result<MaidenheadGrid, BotaGridError> {
        let level = self
            .level
            .ok_or_else(|| BotaGridError::ConfigError("level must be set".to_string()))?;
        let (min_x, min_y, max_x, max_y) = self
            .extent
            .ok_or_else(|| BotaGridError::ConfigError("extent must be set".to_string()))?;

        let cells = generate_cells_for_extent(
            min_x,
            min_y,
            max_x,
            max_y,
            level,
            self.max_cells,
            self.projection.as_ref(),
        )?;
        Ok(MaidenheadGrid { cells, level })
    }
}

/// Overlay layers binding zoom ranges to grid levels.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayers {
    layers: Vec<GridLayerConfig>,
}

impl Default for GridLayers {
    fn default() -> Self {
        Self::new(GridLayerConfig::defaults())
    }
}

impl GridLayers {
    pub fn new(layers: Vec<GridLayerConfig>) -> Self {
        Self { layers }
    }

    /// Level of the first layer visible at `zoom`, if any.
    pub fn level_for_zoom(&self, zoom: f64) -> Option<u8> {
        self.layers
            .iter()
            .find(|layer| layer.is_visible(zoom))
            .map(|layer| layer.level)
    }

    /// Cells to draw for a viewport, or `None` when no layer covers `zoom`.
    pub fn overlay(
        &self,
        extent: &Rect<f64>,
        zoom: f64,
        projection: &impl Projection,
    ) -> Result<Option<MaidenheadGrid>, BotaGridError> {
        match self.level_for_zoom(zoom) {
            Some(level) => Ok(Some(MaidenheadGrid::from_rect(extent, level, projection)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::coord::Geographic;
    use geo_types::coord;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
        Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
    }

    #[test]
    fn test_single_cell_inside_field() -> Result<(), BotaGridError> {
        let cells = enumerate_cells(&rect(1.0, 51.0, 3.0, 54.0), 1, &Geographic)?;
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].id, "JO");
        Ok(())
    }

    #[test]
    fn test_edges_snap_outward() -> Result<(), BotaGridError> {
        // Straddles the JO/IO and JO/JN borders at level 1
        let cells = enumerate_cells(&rect(-1.0, 49.0, 1.0, 51.0), 1, &Geographic)?;
        let mut ids: Vec<_> = cells.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["IN", "IO", "JN", "JO"]);
        Ok(())
    }

    #[test]
    fn test_world_at_level_one() -> Result<(), BotaGridError> {
        let cells = enumerate_cells(&rect(-400.0, -100.0, 400.0, 100.0), 1, &Geographic)?;
        assert_eq!(cells.len(), 18 * 18);
        Ok(())
    }

    #[test]
    fn test_containment() -> Result<(), BotaGridError> {
        for level in 1..=5 {
            let step = cell_step(level)?;
            let extent = rect(-2.3, 53.4, -2.3 + 5.0 * step, 53.4 + 3.0 * step);
            for cell in enumerate_cells(&extent, level, &Geographic)? {
                let c = cell.center();
                assert_eq!(encode(c.x(), c.y(), level)?, cell.id, "level {level}");
                assert_eq!(cell.id.len(), 2 * level as usize);
            }
        }
        Ok(())
    }

    #[test]
    fn test_no_duplicates() -> Result<(), BotaGridError> {
        let cells = enumerate_cells(&rect(-5.0, 49.0, 2.0, 56.0), 2, &Geographic)?;
        let mut ids: Vec<_> = cells.iter().map(|c| c.id.clone()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert_eq!(before, 4 * 7);
        Ok(())
    }

    #[test]
    fn test_adjacent_cells_share_edge() -> Result<(), BotaGridError> {
        let cells = enumerate_cells(&rect(0.5, 51.5, 3.5, 51.6), 2, &Geographic)?;
        assert_eq!(cells.len(), 2);

        let (west, east) = if cells[0].col < cells[1].col {
            (&cells[0], &cells[1])
        } else {
            (&cells[1], &cells[0])
        };
        assert_eq!(west.id, "JO01");
        assert_eq!(east.id, "JO11");
        assert_eq!(west.bounds.max().x, east.bounds.min().x);
        assert_eq!(west.bounds.min().y, east.bounds.min().y);
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result<(), BotaGridError> {
        let extent = rect(-300000.0, 6500000.0, 300000.0, 7000000.0);
        let a = enumerate_cells(&extent, 2, &WebMercator)?;
        let b = enumerate_cells(&extent, 2, &WebMercator)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_degenerate_extent() -> Result<(), BotaGridError> {
        let grid = MaidenheadGrid::from_extent(10.0, 10.0, 0.0, 0.0, 1, &Geographic)?;
        assert!(grid.is_empty());

        // A zero-area extent on a cell corner covers nothing
        let cells = enumerate_cells(&rect(0.0, 50.0, 0.0, 50.0), 1, &Geographic)?;
        assert!(cells.is_empty());
        Ok(())
    }

    #[test]
    fn test_whole_world_at_finest_level_is_refused() {
        let result = enumerate_cells(&rect(-180.0, -90.0, 180.0, 90.0), 10, &Geographic);
        assert_eq!(
            result.err(),
            Some(BotaGridError::TooManyCells { level: 10, limit: MAX_CELLS })
        );

        let result = enumerate_cells(&rect(-180.0, -90.0, 180.0, 90.0), 4, &Geographic);
        assert!(matches!(result, Err(BotaGridError::TooManyCells { level: 4, .. })));
    }

    #[test]
    fn test_builder_cell_limit() -> Result<(), BotaGridError> {
        let builder = || {
            MaidenheadGrid::builder()
                .level(1)
                .extent(-180.0, -90.0, 180.0, 90.0)
                .projection(Geographic)
        };
        assert_eq!(builder().max_cells(324).build()?.len(), 324);
        assert!(matches!(
            builder().max_cells(323).build(),
            Err(BotaGridError::TooManyCells { level: 1, limit: 323 })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_level() {
        let result = enumerate_cells(&rect(0.0, 0.0, 1.0, 1.0), 0, &Geographic);
        assert!(matches!(result, Err(BotaGridError::InvalidLevel(0))));
    }

    #[test]
    fn test_builder() -> Result<(), BotaGridError> {
        let grid = MaidenheadGrid::builder()
            .level(2)
            .extent(0.5, 51.5, 3.5, 51.6)
            .projection(Geographic)
            .build()?;

        assert_eq!(grid.level(), 2);
        assert_eq!(grid.len(), 2);
        assert!(grid.get_cell_at(&(1.0, 51.55)).is_some());
        assert!(grid.get_cell_at(&(10.0, 51.55)).is_none());
        Ok(())
    }

    #[test]
    fn test_builder_requires_level() {
        let result = MaidenheadGrid::builder().extent(0.0, 0.0, 1.0, 1.0).build();
        assert!(matches!(result, Err(BotaGridError::ConfigError(_))));
    }

    #[test]
    fn test_filter_and_polygons() -> Result<(), BotaGridError> {
        let grid = MaidenheadGrid::from_extent(-5.0, 49.0, 2.0, 56.0, 2, &Geographic)?;
        let east = grid.filter(|cell| cell.bounds.min().x >= 0.0);
        assert_eq!(east.len(), 7);
        assert_eq!(grid.to_polygons().len(), grid.len());
        Ok(())
    }

    #[test]
    fn test_layers_pick_level_by_zoom() {
        let layers = GridLayers::default();
        assert_eq!(layers.level_for_zoom(0.0), None);
        assert_eq!(layers.level_for_zoom(5.0), Some(1));
        assert_eq!(layers.level_for_zoom(6.0), Some(1));
        assert_eq!(layers.level_for_zoom(6.5), Some(2));
        assert_eq!(layers.level_for_zoom(12.0), Some(3));
        assert_eq!(layers.level_for_zoom(21.0), None);
    }

    #[test]
    fn test_layers_overlay() -> Result<(), BotaGridError> {
        let layers = GridLayers::default();
        let extent = rect(-300000.0, 6500000.0, 300000.0, 7000000.0);

        let overlay = layers.overlay(&extent, 8.0, &WebMercator)?;
        assert!(overlay.is_some_and(|grid| grid.level() == 2 && !grid.is_empty()));
        assert!(layers.overlay(&extent, 25.0, &WebMercator)?.is_none());
        Ok(())
    }
}
