pub mod cache;
pub mod cell;
pub mod config;
pub mod grid;
pub mod reference;
pub mod style;

pub use cache::StyleCache;
pub use cell::GridCell;
pub use config::{DisplayConfig, GridLayerConfig, MapConfig, SchemeConfig, SchemeStyle, StyleConfig};
pub use grid::{GridLayers, MaidenheadGrid, MaidenheadGridBuilder, enumerate_cells};
pub use reference::{Reference, ReferenceDisplay, ReferenceSet, assign_ids};
pub use style::{
    CircleStyle, MarkerKind, PointStyle, PolygonStyle, Stroke, StylePolicy, TextStyle,
};
