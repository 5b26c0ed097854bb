use crate::api::cache::StyleCache;
use crate::api::cell::GridCell;
use crate::api::config::{SchemeConfig, StyleConfig};
use crate::api::reference::Reference;
use crate::core::radius::RadiusProjector;
use crate::util::color::Rgba;
use crate::util::error::BotaGridError;
use std::sync::Arc;

const LABEL_FONT: &str = "bold ui-rounded";
const GRID_FONT: &str = "bold 25px ui-rounded";
const GRID_STROKE: Rgba = Rgba::new(255, 100, 100, 0.2);
const GRID_TEXT_STROKE: Rgba = Rgba::new(255, 100, 100, 0.5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// Circle image drawn for a point feature.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub radius: f64,
    pub fill: Rgba,
    pub stroke: Stroke,
}

/// Centered label text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font: &'static str,
    pub fill: Option<Rgba>,
    pub stroke: Option<Stroke>,
    pub offset_y: f64,
    /// Draw even when the label overflows its geometry
    pub overflow: bool,
}

/// Whether a point renders as a fixed dot or a radius-scaled circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Dot,
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub marker: MarkerKind,
    pub image: Arc<CircleStyle>,
    pub text: Option<TextStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub stroke: Option<Stroke>,
    pub fill: Option<Rgba>,
    pub text: Option<TextStyle>,
}

/// Resolves feature styles from the map resolution and scheme colours.
#[derive(Debug, Clone, Default)]
pub struct StylePolicy {
    config: StyleConfig,
    projector: RadiusProjector,
}

impl StylePolicy {
    pub fn new(config: StyleConfig) -> Self {
        let projector = RadiusProjector::new(config.pole_policy);
        Self { config, projector }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn projector(&self) -> &RadiusProjector {
        &self.projector
    }

    /// Label for a reference at `resolution`: the reference alone when zoomed
    /// out, with the name appended when zoomed in, nothing when far out.
    pub fn label(&self, reference: &str, name: &str, resolution: f64) -> Option<String> {
        if resolution >= self.config.label_max_resolution {
            return None;
        }
        if resolution < self.config.name_label_max_resolution && !name.is_empty() {
            Some(format!("{} {}", reference, name))
        } else {
            Some(reference.to_string())
        }
    }

    fn text(&self, text: String, color: Rgba, offset_y: f64) -> TextStyle {
        TextStyle {
            text,
            font: LABEL_FONT,
            fill: Some(Rgba::BLACK),
            stroke: Some(Stroke::new(color, 1.0)),
            offset_y,
            overflow: true,
        }
    }

    /// Style for a point marker with an already computed screen radius.
    ///
    /// Radii above the dot radius become a translucent circle of that radius
    /// with the label pulled into it; anything smaller is a solid dot.
    pub fn point_style_for_radius(
        &self,
        label: Option<String>,
        color: Rgba,
        screen_radius: f64,
        cache: &mut StyleCache,
    ) -> Result<PointStyle, BotaGridError> {
        if !screen_radius.is_finite() {
            return Err(BotaGridError::DegenerateRadius(screen_radius));
        }

        let (marker, radius, fill, offset) = if screen_radius > self.config.dot_radius {
            (
                MarkerKind::Circle,
                screen_radius,
                color.with_opacity(self.config.circle_opacity),
                self.config.circle_text_offset,
            )
        } else {
            (
                MarkerKind::Dot,
                self.config.dot_radius,
                color,
                self.config.dot_text_offset,
            )
        };

        let key = format!("{}{}", radius, fill);
        let image = cache.get_or_insert_with(&key, || CircleStyle {
            radius,
            fill,
            stroke: Stroke::new(Rgba::BLACK, 1.0),
        });

        Ok(PointStyle {
            marker,
            image,
            text: label.map(|t| self.text(t, color, offset)),
        })
    }

    /// Style for a reference point at `resolution` map units per pixel.
    ///
    /// `radius_m` is the nominal ground radius of the marker; it is scaled for
    /// the reference's latitude before conversion to pixels. Fails with
    /// [`BotaGridError::DegenerateRadius`] at the poles unless the policy
    /// clamps them, so the caller can skip the feature.
    pub fn point_style(
        &self,
        reference: &Reference,
        resolution: f64,
        color: Rgba,
        radius_m: f64,
        cache: &mut StyleCache,
    ) -> Result<PointStyle, BotaGridError> {
        let screen_radius = self
            .projector
            .screen_radius(radius_m, reference.location.y(), resolution)?;
        let label = self.label(&reference.reference, &reference.name, resolution);
        self.point_style_for_radius(label, color, screen_radius, cache)
    }

    /// Filled polygon, stroked black (width 1) or in `color` (width 3).
    pub fn polygon_style(
        &self,
        text: Option<String>,
        color: Rgba,
        black_stroke: bool,
        stroke: bool,
    ) -> PolygonStyle {
        let opacity = if stroke {
            self.config.circle_opacity
        } else {
            self.config.unstroked_opacity
        };

        PolygonStyle {
            stroke: stroke.then(|| {
                if black_stroke {
                    Stroke::new(Rgba::BLACK, 1.0)
                } else {
                    Stroke::new(color, 3.0)
                }
            }),
            fill: Some(color.with_opacity(opacity)),
            text: text.map(|t| self.text(t, color, 0.0)),
        }
    }

    /// Footprint polygon of a reference, labelled with reference and name.
    pub fn footprint_style(&self, reference: &Reference, color: Rgba) -> PolygonStyle {
        let text = format!("{} {}", reference.reference, reference.name);
        self.polygon_style(Some(text.trim_end().to_string()), color, true, true)
    }

    /// Outline of a country, tinted by the scheme operating there.
    pub fn country_style(&self, iso_a3: &str, schemes: &SchemeConfig) -> Option<PolygonStyle> {
        schemes
            .country_color(iso_a3)
            .map(|color| self.polygon_style(None, color, true, true))
    }

    /// Unfilled outline of a grid cell labelled with its locator.
    pub fn grid_style(&self, cell: &GridCell) -> PolygonStyle {
        PolygonStyle {
            stroke: Some(Stroke::new(GRID_STROKE, 3.0)),
            fill: None,
            text: Some(TextStyle {
                text: cell.id.clone(),
                font: GRID_FONT,
                fill: None,
                stroke: Some(Stroke::new(GRID_TEXT_STROKE, 2.0)),
                offset_y: 0.0,
                overflow: false,
            }),
        }
    }
}
