//! # bota-grid-rs
//!
//! Maidenhead grid and marker-radius core for a Bunkers on the Air map.
//!
//! ### 1. Locators
//!
//! ```
//! use bota_grid_rs::{decode, encode};
//!
//! # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
//! assert_eq!(encode(-2.248, 53.481, 3)?, "IO83VL");
//! let bounds = decode("IO83VL")?;
//! assert!(bounds.width() < 0.1);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `MaidenheadGrid` - Cells covering a viewport
//!
//! ```
//! use bota_grid_rs::{MaidenheadGrid, WebMercator};
//!
//! # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
//! let grid = MaidenheadGrid::builder()
//!     .level(2)
//!     .extent(-300_000.0, 6_500_000.0, 300_000.0, 7_000_000.0)
//!     .projection(WebMercator)
//!     .build()?;
//!
//! if let Some(cell) = grid.get_cell_at(&(0.5, 51.5)) {
//!     println!("{}", cell.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Marker radius and styling
//!
//! ```
//! use bota_grid_rs::{screen_radius, StyleCache, StylePolicy};
//!
//! # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
//! // 1 km at 60° N is 2 km of Mercator map, 20 px at 100 m/px
//! let px = screen_radius(1000.0, 60.0, 100.0)?;
//! assert!((px - 20.0).abs() < 1e-9);
//!
//! let policy = StylePolicy::default();
//! let mut cache = StyleCache::default();
//! let style = policy.point_style_for_radius(None, "rgba(122, 174, 0, 1)".parse()?, px, &mut cache)?;
//! assert_eq!(style.image.radius, px);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod core;
pub mod util;

pub use api::{
    CircleStyle, DisplayConfig, GridCell, GridLayerConfig, GridLayers, MaidenheadGrid,
    MaidenheadGridBuilder, MapConfig, MarkerKind, PointStyle, PolygonStyle, Reference,
    ReferenceDisplay, ReferenceSet, SchemeConfig, SchemeStyle, Stroke, StyleCache, StyleConfig,
    StylePolicy, TextStyle, assign_ids, enumerate_cells,
};
pub use core::{
    CLAMPED_MAX_LATITUDE, DEFAULT_RADIUS_METERS, FOOTPRINT_STEPS, MAX_CELLS, MAX_LEVEL,
    PolePolicy, RadiusProjector, cell_step, create_circle, create_rectangle, decode, encode,
    projected_radius, scale_factor, screen_radius,
};
pub use util::{
    BotaGridError, Coordinate, Geographic, ProjTransform, Projection, Rgba, WebMercator,
};

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Point, Rect, coord};

    #[test]
    fn test_viewport_workflow() -> Result<(), BotaGridError> {
        let config = MapConfig::default();
        let layers = GridLayers::new(config.grid_layers.clone());

        // Roughly Manchester to Leeds in Web Mercator
        let lower = WebMercator.from_geographic(coord! { x: -2.5, y: 53.3 })?;
        let upper = WebMercator.from_geographic(coord! { x: -1.5, y: 53.9 })?;
        let extent = Rect::new(lower, upper);

        let grid = layers
            .overlay(&extent, 12.0, &WebMercator)?
            .expect("level 3 is visible at zoom 12");
        assert_eq!(grid.level(), 3);
        let cell = grid
            .get_cell_at(&(-2.248, 53.481))
            .expect("viewport contains Manchester");
        assert_eq!(cell.id, "IO83VL");

        let policy = StylePolicy::new(config.style.clone());
        assert_eq!(policy.grid_style(cell).text.map(|t| t.text), Some("IO83VL".to_string()));
        Ok(())
    }

    #[test]
    fn test_reference_workflow() -> Result<(), BotaGridError> {
        let config = MapConfig::default();
        let policy = StylePolicy::new(config.style.clone());
        let mut cache = StyleCache::new(config.style.cache_capacity);

        let reference = Reference::new("B/G-0001", "Pillbox", "UKBOTA", Point::new(-2.248, 53.481));
        let color = config.schemes.color(&reference.scheme).expect("UKBOTA is configured");
        let radius_m = config.schemes.radius_m(&reference.scheme);

        // Zoomed out: 1 km is well under the dot radius
        let far = policy.point_style(&reference, 349.0, color, radius_m, &mut cache)?;
        assert_eq!(far.marker, MarkerKind::Dot);
        assert_eq!(far.text.map(|t| t.text), Some("B/G-0001".to_string()));

        // Zoomed in: circle grows with the Mercator secant
        let near = policy.point_style(&reference, 10.0, color, radius_m, &mut cache)?;
        assert_eq!(near.marker, MarkerKind::Circle);
        assert!((near.image.radius - screen_radius(radius_m, 53.481, 10.0)?).abs() < 1e-9);

        assert_eq!(
            ReferenceDisplay::for_zoom(12.0, &config.display),
            ReferenceDisplay::Footprints
        );
        let footprint = reference.footprint(&WebMercator, radius_m)?;
        assert_eq!(footprint.exterior().0.len(), FOOTPRINT_STEPS + 1);
        Ok(())
    }

    #[test]
    fn test_pole_policies() -> Result<(), BotaGridError> {
        let reference = Reference::new("B/X-0001", "Pole", "UKBOTA", Point::new(0.0, 90.0));
        let color = Rgba::new(122, 174, 0, 1.0);
        let mut cache = StyleCache::default();

        let propagate = StylePolicy::default();
        assert!(matches!(
            propagate.point_style(&reference, 10.0, color, 1000.0, &mut cache),
            Err(BotaGridError::DegenerateRadius(_))
        ));

        let clamp = StylePolicy::new(StyleConfig::new().pole_policy(PolePolicy::Clamp));
        let style = clamp.point_style(&reference, 10.0, color, 1000.0, &mut cache)?;
        assert!(style.image.radius.is_finite());
        Ok(())
    }
}
