use crate::core::constants::DEFAULT_RADIUS_METERS;
use crate::core::radius::PolePolicy;
use crate::util::color::Rgba;
use crate::util::error::BotaGridError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Thresholds and offsets for point marker styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Radius of the solid dot, in pixels
    pub dot_radius: f64,
    /// Label offset below a solid dot
    pub dot_text_offset: f64,
    /// Label offset inside an enlarged circle
    pub circle_text_offset: f64,
    /// Fill opacity of enlarged circles and stroked polygons
    pub circle_opacity: f64,
    /// Fill opacity of unstroked polygons
    pub unstroked_opacity: f64,
    /// Below this resolution the name is appended to the reference
    pub name_label_max_resolution: f64,
    /// At or above this resolution no label is drawn
    pub label_max_resolution: f64,
    /// Number of circle styles kept in a [`StyleCache`](crate::StyleCache)
    pub cache_capacity: usize,
    pub pole_policy: PolePolicy,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            dot_radius: 5.0,
            dot_text_offset: 15.0,
            circle_text_offset: 1.5,
            circle_opacity: 0.2,
            unstroked_opacity: 0.5,
            name_label_max_resolution: 40.0,
            label_max_resolution: 350.0,
            cache_capacity: 32,
            pole_policy: PolePolicy::Propagate,
        }
    }
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dot_radius(mut self, radius: f64) -> Self {
        self.dot_radius = radius;
        self
    }

    pub fn label_thresholds(mut self, name_max: f64, label_max: f64) -> Self {
        self.name_label_max_resolution = name_max;
        self.label_max_resolution = label_max;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn pole_policy(mut self, policy: PolePolicy) -> Self {
        self.pole_policy = policy;
        self
    }
}

/// Binds a zoom range to a grid level. The layer is visible for
/// `min_zoom < zoom <= max_zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayerConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub level: u8,
}

impl GridLayerConfig {
    pub fn new(min_zoom: f64, max_zoom: f64, level: u8) -> Self {
        Self {
            min_zoom,
            max_zoom,
            level,
        }
    }

    /// Fields up to zoom 6, squares up to 10, subsquares up to 20.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(0.0, 6.0, 1),
            Self::new(6.0, 10.0, 2),
            Self::new(10.0, 20.0, 3),
        ]
    }

    pub fn is_visible(&self, zoom: f64) -> bool {
        zoom > self.min_zoom && zoom <= self.max_zoom
    }
}

/// Colour and default marker radius of a BOTA scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeStyle {
    pub color: Rgba,
    #[serde(default = "default_radius")]
    pub radius_m: f64,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_METERS
}

/// Scheme colours plus the country (ISO 3166 alpha-3) to scheme mapping
/// used to tint country outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    pub schemes: BTreeMap<String, SchemeStyle>,
    pub countries: BTreeMap<String, String>,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        let scheme = |r, g, b| SchemeStyle {
            color: Rgba::new(r, g, b, 1.0),
            radius_m: DEFAULT_RADIUS_METERS,
        };
        let schemes = BTreeMap::from([
            ("UKBOTA".to_string(), scheme(122, 174, 0)),
            ("ONBOTA".to_string(), scheme(244, 197, 36)),
            ("OKBOTA".to_string(), scheme(13, 71, 160)),
        ]);
        let countries = [
            ("GBR", "UKBOTA"),
            ("IMN", "UKBOTA"),
            ("JEY", "UKBOTA"),
            ("GGY", "UKBOTA"),
            ("BEL", "ONBOTA"),
            ("CZE", "OKBOTA"),
        ]
        .into_iter()
        .map(|(c, s)| (c.to_string(), s.to_string()))
        .collect();

        Self { schemes, countries }
    }
}

impl SchemeConfig {
    pub fn color(&self, scheme: &str) -> Option<Rgba> {
        self.schemes.get(scheme).map(|s| s.color)
    }

    pub fn radius_m(&self, scheme: &str) -> f64 {
        self.schemes
            .get(scheme)
            .map_or(DEFAULT_RADIUS_METERS, |s| s.radius_m)
    }

    /// Colour of the scheme operating in a country, if any.
    pub fn country_color(&self, iso_a3: &str) -> Option<Rgba> {
        self.countries
            .get(iso_a3)
            .and_then(|scheme| self.color(scheme))
    }
}

/// Zoom thresholds for the reference and country layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// References are hidden at or below this zoom
    pub point_min_zoom: f64,
    /// Above this zoom references are drawn as footprints
    pub footprint_min_zoom: f64,
    /// Country outlines are drawn up to this zoom
    pub country_max_zoom: f64,
}

impl DisplayConfig {
    /// Country outlines show up to and including `country_max_zoom`.
    pub fn country_visible(&self, zoom: f64) -> bool {
        zoom <= self.country_max_zoom
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            point_min_zoom: 8.0,
            footprint_min_zoom: 11.0,
            country_max_zoom: 8.0,
        }
    }
}

/// Complete configuration of the map core.
///
/// # Example
/// ```
/// use bota_grid_rs::MapConfig;
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// let config = MapConfig::from_json_str(r#"{ "style": { "dot_radius": 4.0 } }"#)?;
/// assert_eq!(config.style.dot_radius, 4.0);
/// assert_eq!(config.grid_layers.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub style: StyleConfig,
    pub grid_layers: Vec<GridLayerConfig>,
    pub schemes: SchemeConfig,
    pub display: DisplayConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            grid_layers: GridLayerConfig::defaults(),
            schemes: SchemeConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    pub fn grid_layers(mut self, layers: Vec<GridLayerConfig>) -> Self {
        self.grid_layers = layers;
        self
    }

    pub fn schemes(mut self, schemes: SchemeConfig) -> Self {
        self.schemes = schemes;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, BotaGridError> {
        let config: MapConfig =
            serde_json::from_str(s).map_err(|e| BotaGridError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BotaGridError> {
        let s = std::fs::read_to_string(path).map_err(|e| BotaGridError::IoError(e.to_string()))?;
        Self::from_json_str(&s)
    }

    fn validate(&self) -> Result<(), BotaGridError> {
        if self.style.cache_capacity == 0 {
            return Err(BotaGridError::ConfigError(
                "cache_capacity must be positive".to_string(),
            ));
        }
        if let Some(layer) = self.grid_layers.iter().find(|l| l.min_zoom > l.max_zoom) {
            return Err(BotaGridError::ConfigError(format!(
                "grid layer for level {} has min_zoom above max_zoom",
                layer.level
            )));
        }
        Ok(())
    }
}
