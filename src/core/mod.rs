pub mod constants;
pub mod geometry;
pub mod locator;
pub mod radius;

pub use constants::{
    CLAMPED_MAX_LATITUDE, DEFAULT_RADIUS_METERS, FIELD_HEIGHT, FIELD_WIDTH, FOOTPRINT_STEPS,
    MAX_CELLS, MAX_LEVEL,
};
pub use geometry::{create_circle, create_rectangle, create_rectangle_from_rect};
pub use locator::{cell_step, decode, encode};
pub use radius::{PolePolicy, RadiusProjector, projected_radius, scale_factor, screen_radius};
