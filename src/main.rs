use bota_grid_rs::{
    BotaGridError, GridLayers, MapConfig, Projection, Reference, StyleCache, StylePolicy,
    WebMercator,
};
use geo_types::{Point, Rect, coord};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), BotaGridError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MapConfig::from_path(path)?,
        None => MapConfig::default(),
    };

    let lon = -2.2479699500757597;
    let lat = 53.48082746395233;
    let reference = Reference::new("B/G-0001", "Example Pillbox", "UKBOTA", Point::new(lon, lat));

    for level in 1..=4 {
        println!("Level {} locator: {}", level, reference.locator(level)?);
    }

    let lower = WebMercator.from_geographic(coord! { x: lon - 0.5, y: lat - 0.25 })?;
    let upper = WebMercator.from_geographic(coord! { x: lon + 0.5, y: lat + 0.25 })?;
    let extent = Rect::new(lower, upper);

    let layers = GridLayers::new(config.grid_layers.clone());
    let zoom = 11.0;
    match layers.overlay(&extent, zoom, &WebMercator)? {
        Some(grid) => {
            info!(zoom, cells = grid.len(), "grid overlay");
            for cell in grid.iter().take(5) {
                println!("Cell {} ({}, {})", cell.id, cell.col, cell.row);
            }
        }
        None => println!("No grid at zoom {}", zoom),
    }
    println!(
        "Country outlines at zoom {}: {}",
        zoom,
        config.display.country_visible(zoom)
    );

    let policy = StylePolicy::new(config.style.clone());
    let mut cache = StyleCache::new(config.style.cache_capacity);
    let color = config
        .schemes
        .color(&reference.scheme)
        .ok_or_else(|| BotaGridError::ConfigError(format!("Unknown scheme {}", reference.scheme)))?;
    let radius_m = config.schemes.radius_m(&reference.scheme);

    for resolution in [300.0, 30.0, 3.0] {
        let style = policy.point_style(&reference, resolution, color, radius_m, &mut cache)?;
        println!(
            "Resolution {}: {:?} radius {:.1}px label {:?}",
            resolution,
            style.marker,
            style.image.radius,
            style.text.map(|t| t.text)
        );
    }

    Ok(())
}
