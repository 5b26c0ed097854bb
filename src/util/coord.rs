use crate::util::error::BotaGridError;
use geo_types::{Coord, LineString, Point, Polygon, Rect, coord};
use proj::Proj;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Equatorial radius of the spherical Web Mercator model, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which Web Mercator becomes a square world.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

const HALF_SIZE: f64 = PI * EARTH_RADIUS;

pub trait Coordinate {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for Coord<f64> {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// Transform between the map's working coordinate system and geographic
/// longitude/latitude in degrees.
pub trait Projection {
    /// Working coordinates to (lon, lat).
    fn to_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError>;

    /// (lon, lat) to working coordinates.
    fn from_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError>;

    /// Whether working units are linear (meters, feet) rather than degrees.
    /// Ground distances are only applied to metric working systems.
    fn is_metric(&self) -> bool {
        true
    }

    /// Bounding box of a working-system extent in geographic coordinates.
    ///
    /// Only the four corners are transformed, which is exact for cylindrical
    /// projections.
    fn extent_to_geographic(&self, extent: &Rect<f64>) -> Result<Rect<f64>, BotaGridError> {
        let (min, max) = (extent.min(), extent.max());
        let corners = [
            coord! { x: min.x, y: min.y },
            coord! { x: max.x, y: min.y },
            coord! { x: max.x, y: max.y },
            coord! { x: min.x, y: max.y },
        ];

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for corner in corners {
            let c = self.to_geographic(corner)?;
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }

        Ok(Rect::new(
            coord! { x: min_x, y: min_y },
            coord! { x: max_x, y: max_y },
        ))
    }

    /// Reprojects a geographic polygon's exterior ring into working coordinates.
    fn polygon_from_geographic(
        &self,
        polygon: &Polygon<f64>,
    ) -> Result<Polygon<f64>, BotaGridError> {
        let coords = polygon
            .exterior()
            .coords()
            .map(|c| self.from_geographic(*c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(LineString::from(coords), vec![]))
    }
}

/// Working coordinates are already longitude/latitude (EPSG:4326).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geographic;

impl Projection for Geographic {
    fn to_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        Ok(coord)
    }

    fn from_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        Ok(coord)
    }

    fn is_metric(&self) -> bool {
        false
    }
}

/// Spherical Web Mercator (EPSG:3857).
///
/// Latitudes beyond ±85.0511° are clamped onto the edge of the square world
/// so that cell rings touching the poles stay finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn to_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        let lon = (coord.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (coord.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
        Ok(coord! { x: lon, y: lat })
    }

    fn from_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        let lat = coord.y.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
        let x = EARTH_RADIUS * coord.x.to_radians();
        let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        Ok(coord! { x: x, y: y.clamp(-HALF_SIZE, HALF_SIZE) })
    }
}

/// Arbitrary working system backed by PROJ, built from a CRS code such as
/// `"EPSG:3857"` or `"EPSG:27700"`.
pub struct ProjTransform {
    inverse: Proj,
    forward: Proj,
    metric: bool,
}

impl ProjTransform {
    /// A working system is treated as metric when one degree of longitude at
    /// the equator spans more than 1000 working units.
    pub fn new(working_crs: &str) -> Result<Self, BotaGridError> {
        let inverse = Proj::new_known_crs(working_crs, "EPSG:4326", None)
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;
        let forward = Proj::new_known_crs("EPSG:4326", working_crs, None)
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;

        let (x0, _) = forward
            .convert((0.0, 0.0))
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;
        let (x1, _) = forward
            .convert((1.0, 0.0))
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;
        let metric = (x1 - x0).abs() > 1000.0;

        Ok(Self {
            inverse,
            forward,
            metric,
        })
    }
}

impl Projection for ProjTransform {
    fn to_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        let (lon, lat) = self
            .inverse
            .convert((coord.x, coord.y))
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;
        Ok(coord! { x: lon, y: lat })
    }

    fn from_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>, BotaGridError> {
        let (x, y) = self
            .forward
            .convert((coord.x, coord.y))
            .map_err(|e| BotaGridError::ProjectionError(e.to_string()))?;
        Ok(coord! { x: x, y: y })
    }

    fn is_metric(&self) -> bool {
        self.metric
    }
}

/// Converts a WGS84 point to Web Mercator.
pub fn wgs84_to_mercator<C: Coordinate>(coord: &C) -> Result<Point<f64>, BotaGridError> {
    let c = WebMercator.from_geographic(coord! { x: coord.x(), y: coord.y() })?;
    Ok(Point::from(c))
}

/// Converts a Web Mercator point to WGS84.
pub fn mercator_to_wgs84<C: Coordinate>(coord: &C) -> Result<Point<f64>, BotaGridError> {
    let c = WebMercator.to_geographic(coord! { x: coord.x(), y: coord.y() })?;
    Ok(Point::from(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_to_mercator() -> Result<(), BotaGridError> {
        let m = wgs84_to_mercator(&(2.0, 53.0))?;

        // Roughly the North Sea off the Dutch coast
        assert!((m.x() - 222638.98).abs() < 1.0);
        assert!((m.y() - 6_982_997.92).abs() < 1.0);
        Ok(())
    }

    #[test]
    fn test_roundtrip() -> Result<(), BotaGridError> {
        let lon = -2.2479699500757597;
        let lat = 53.48082746395233;

        let m = wgs84_to_mercator(&(lon, lat))?;
        let back = mercator_to_wgs84(&m)?;

        assert!((lon - back.x()).abs() < 1e-9);
        assert!((lat - back.y()).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_pole_is_clamped() -> Result<(), BotaGridError> {
        let north = wgs84_to_mercator(&(0.0, 90.0))?;
        assert!(north.y().is_finite());
        assert!((north.y() - HALF_SIZE).abs() < 1.0);
        Ok(())
    }

    #[test]
    fn test_extent_to_geographic() -> Result<(), BotaGridError> {
        let extent = Rect::new(
            coord! { x: -HALF_SIZE, y: -HALF_SIZE },
            coord! { x: HALF_SIZE, y: HALF_SIZE },
        );
        let geo = WebMercator.extent_to_geographic(&extent)?;

        assert!((geo.min().x + 180.0).abs() < 1e-9);
        assert!((geo.max().x - 180.0).abs() < 1e-9);
        assert!((geo.max().y - MERCATOR_MAX_LATITUDE).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_geographic_is_identity() -> Result<(), BotaGridError> {
        let c = coord! { x: 12.5, y: -33.25 };
        assert_eq!(Geographic.to_geographic(c)?, c);
        assert_eq!(Geographic.from_geographic(c)?, c);
        Ok(())
    }

    #[test]
    fn test_proj_transform_matches_web_mercator() -> Result<(), BotaGridError> {
        let proj = ProjTransform::new("EPSG:3857")?;
        let c = coord! { x: 2.0, y: 53.0 };

        let from_proj = proj.from_geographic(c)?;
        let analytic = WebMercator.from_geographic(c)?;

        assert!((from_proj.x - analytic.x).abs() < 0.01);
        assert!((from_proj.y - analytic.y).abs() < 0.01);
        Ok(())
    }

    #[test]
    fn test_metric_units() -> Result<(), BotaGridError> {
        assert!(WebMercator.is_metric());
        assert!(!Geographic.is_metric());
        assert!(ProjTransform::new("EPSG:3857")?.is_metric());
        assert!(!ProjTransform::new("EPSG:4326")?.is_metric());
        Ok(())
    }

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (100.0, 200.0);
        assert_eq!(tuple.x(), 100.0);
        assert_eq!(tuple.y(), 200.0);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(100.0, 200.0);
        assert_eq!(point.x(), 100.0);
        assert_eq!(point.y(), 200.0);
    }
}
