pub mod color;
pub mod coord;
pub mod error;

pub use color::Rgba;
pub use coord::{
    Coordinate, Geographic, ProjTransform, Projection, WebMercator, mercator_to_wgs84,
    wgs84_to_mercator,
};
pub use error::BotaGridError;
