use crate::core::geometry::create_rectangle;
use crate::core::locator::{cell_step, decode, encode};
use crate::util::coord::{Coordinate, Projection};
use crate::util::error::BotaGridError;
use geo_types::{Point, Polygon, Rect, coord};

/// A single Maidenhead grid square at one subdivision level.
///
/// `bounds` is always geographic (lon/lat degrees). `boundary` is the same
/// rectangle reprojected into the map's working coordinate system, ready to
/// hand to a vector layer.
///
/// # Example
///
/// ```
/// use bota_grid_rs::{GridCell, WebMercator};
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// let cell = GridCell::from_wgs84(&(-2.248, 53.481), 3, &WebMercator)?;
/// assert_eq!(cell.id, "IO83VL");
/// assert_eq!(cell.boundary.exterior().coords().count(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Maidenhead locator, `2 * level` characters
    pub id: String,
    /// Subdivision level, 1 = 20°x10° field
    pub level: u8,
    /// Column index; the west edge is at `col * 2 * step` degrees
    pub col: i64,
    /// Row index; the south edge is at `row * step` degrees
    pub row: i64,
    /// Geographic extent of the cell
    pub bounds: Rect<f64>,
    /// Closed ring in working coordinates
    pub boundary: Polygon<f64>,
}

impl GridCell {
    /// Builds the cell at grid position (`col`, `row`).
    ///
    /// The identifier is derived from a point nudged just inside the south-west
    /// corner so float error on the edge cannot pick the neighbouring cell.
    pub(crate) fn at<P: Projection + ?Sized>(
        col: i64,
        row: i64,
        level: u8,
        step: f64,
        nudge: f64,
        projection: &P,
    ) -> Result<Self, BotaGridError> {
        let x = col as f64 * 2.0 * step;
        let y = row as f64 * step;
        let id = encode(x + nudge, y + nudge, level)?;

        let bounds = Rect::new(
            coord! { x: x, y: y },
            coord! { x: x + 2.0 * step, y: y + step },
        );
        let boundary =
            projection.polygon_from_geographic(&create_rectangle(x, y, 2.0 * step, step))?;

        Ok(Self {
            id,
            level,
            col,
            row,
            bounds,
            boundary,
        })
    }

    /// Create the cell containing a WGS84 (lon/lat) coordinate.
    pub fn from_wgs84(
        coord: &impl Coordinate,
        level: u8,
        projection: &impl Projection,
    ) -> Result<Self, BotaGridError> {
        let id = encode(coord.x(), coord.y(), level)?;
        Self::from_locator(&id, projection)
    }

    /// Create a cell from a Maidenhead locator such as `"JO01"`.
    ///
    /// # Example
    /// ```
    /// use bota_grid_rs::{Geographic, GridCell};
    ///
    /// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
    /// let cell = GridCell::from_locator("jo01", &Geographic)?;
    /// assert_eq!(cell.id, "JO01");
    /// assert_eq!(cell.level, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_locator(locator: &str, projection: &impl Projection) -> Result<Self, BotaGridError> {
        let bounds = decode(locator)?;
        let level = (locator.len() / 2) as u8;
        let step = cell_step(level)?;

        let col = (bounds.min().x / (2.0 * step)).round() as i64;
        let row = (bounds.min().y / step).round() as i64;
        let boundary = projection.polygon_from_geographic(&create_rectangle(
            bounds.min().x,
            bounds.min().y,
            bounds.width(),
            bounds.height(),
        ))?;

        Ok(Self {
            id: locator.to_ascii_uppercase(),
            level,
            col,
            row,
            bounds,
            boundary,
        })
    }

    /// Geographic center of the cell.
    pub fn center(&self) -> Point<f64> {
        Point::from(self.bounds.center())
    }

    /// Converts the geographic bounds to a closed polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        create_rectangle(
            self.bounds.min().x,
            self.bounds.min().y,
            self.bounds.width(),
            self.bounds.height(),
        )
    }

    /// True when the lon/lat point lies in this cell (south/west edges inclusive).
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        coord.x() >= min.x && coord.x() < max.x && coord.y() >= min.y && coord.y() < max.y
    }
}
