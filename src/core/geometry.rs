use geo_types::{Coord, LineString, Point, Polygon, Rect};
use std::f64::consts::TAU;

/// Closed 5-point ring around an axis-aligned rectangle, counter-clockwise
/// from the south-west corner.
pub fn create_rectangle(min_x: f64, min_y: f64, width: f64, height: f64) -> Polygon<f64> {
    let coords = vec![
        Coord { x: min_x, y: min_y },
        Coord { x: min_x + width, y: min_y },
        Coord { x: min_x + width, y: min_y + height },
        Coord { x: min_x, y: min_y + height },
        Coord { x: min_x, y: min_y },
    ];

    Polygon::new(LineString::from(coords), vec![])
}

pub fn create_rectangle_from_rect(rect: &Rect<f64>) -> Polygon<f64> {
    create_rectangle(rect.min().x, rect.min().y, rect.width(), rect.height())
}

/// Circle approximated by `steps` segments, walked clockwise from east.
///
/// The ring has `steps + 1` vertices and the last one equals the first.
pub fn create_circle(center: &Point<f64>, radius: f64, steps: usize) -> Polygon<f64> {
    let steps = steps.max(3);
    let mut coords = Vec::with_capacity(steps + 1);

    for i in 0..=steps {
        let angle = (TAU * (i as f64 / steps as f64)) % TAU;
        let x = center.x() + (-angle).cos() * radius;
        let y = center.y() + (-angle).sin() * radius;
        coords.push(Coord { x, y });
    }

    Polygon::new(LineString::from(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    #[test]
    fn test_create_rectangle() {
        let rect = create_rectangle(0.0, 50.0, 2.0, 1.0);
        let exterior = rect.exterior();
        assert_eq!(exterior.coords().count(), 5);
        assert_eq!(exterior.0[0], exterior.0[4]);
        assert_eq!(exterior.0[2], coord! { x: 2.0, y: 51.0 });
    }

    #[test]
    fn test_create_rectangle_from_rect() {
        let r = Rect::new(coord! { x: -2.0, y: 53.0 }, coord! { x: 0.0, y: 54.0 });
        let poly = create_rectangle_from_rect(&r);
        assert_eq!(poly.exterior().0[1], coord! { x: 0.0, y: 53.0 });
    }

    #[test]
    fn test_create_circle() {
        let center = point! { x: 100.0, y: 100.0 };
        let circle = create_circle(&center, 10.0, 128);
        let exterior = circle.exterior();

        assert_eq!(exterior.coords().count(), 129);
        assert_eq!(exterior.0[0], exterior.0[128]);
        for c in exterior.coords() {
            let d = ((c.x - 100.0).powi(2) + (c.y - 100.0).powi(2)).sqrt();
            assert!((d - 10.0).abs() < 1e-9);
        }
    }
}
