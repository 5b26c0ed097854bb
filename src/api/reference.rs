use crate::api::config::DisplayConfig;
use crate::core::constants::FOOTPRINT_STEPS;
use crate::core::geometry::create_circle;
use crate::core::locator::encode;
use crate::core::radius::RadiusProjector;
use crate::util::coord::Projection;
use crate::util::error::BotaGridError;
use geo::Intersects;
use geo_types::{Geometry, Point, Polygon, Rect, coord};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, JsonObject};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Property copied into each feature's id when loading references.
pub const REFERENCE_PROPERTY: &str = "reference";

/// A BOTA reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Feature id, equal to `reference` for parsed features
    pub id: String,
    /// Programme reference, e.g. `B/G-0001`
    pub reference: String,
    pub name: String,
    /// Scheme code selecting colour and radius, e.g. `UKBOTA`
    pub scheme: String,
    /// Location in lon/lat degrees
    pub location: Point<f64>,
    /// Remaining feature properties
    pub properties: JsonObject,
}

impl Reference {
    pub fn new(
        reference: impl Into<String>,
        name: impl Into<String>,
        scheme: impl Into<String>,
        location: Point<f64>,
    ) -> Self {
        let reference = reference.into();
        Self {
            id: reference.clone(),
            reference,
            name: name.into(),
            scheme: scheme.into(),
            location,
            properties: JsonObject::new(),
        }
    }

    /// Builds a reference from a point feature whose id has already been
    /// assigned. Returns `None` for features without an id or a point geometry.
    fn from_feature(feature: Feature) -> Option<Self> {
        let id = match feature.id.as_ref()? {
            Id::String(s) => s.clone(),
            Id::Number(n) => n.to_string(),
        };
        let location = match Geometry::<f64>::try_from(feature.geometry?).ok()? {
            Geometry::Point(pt) => pt,
            _ => return None,
        };

        let properties = feature.properties.unwrap_or_default();
        let text = |key: &str| {
            properties
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let reference = text(REFERENCE_PROPERTY);
        let name = text("name");
        let scheme = text("scheme");

        Some(Self {
            id,
            reference,
            name,
            scheme,
            location,
            properties,
        })
    }

    /// Maidenhead locator of the reference.
    pub fn locator(&self, level: u8) -> Result<String, BotaGridError> {
        encode(self.location.x(), self.location.y(), level)
    }

    /// Circle of `radius_m` ground meters around the reference, in working
    /// coordinates.
    ///
    /// `projection` must be metric; degree-based systems are rejected with
    /// [`BotaGridError::ProjectionError`]. The radius is scaled by the Mercator
    /// secant at the reference's latitude, so the circle is true to the ground
    /// only in Mercator working systems.
    pub fn footprint(
        &self,
        projection: &impl Projection,
        radius_m: f64,
    ) -> Result<Polygon<f64>, BotaGridError> {
        self.footprint_with(projection, &RadiusProjector::default(), radius_m, FOOTPRINT_STEPS)
    }

    pub fn footprint_with(
        &self,
        projection: &impl Projection,
        projector: &RadiusProjector,
        radius_m: f64,
        steps: usize,
    ) -> Result<Polygon<f64>, BotaGridError> {
        if !projection.is_metric() {
            return Err(BotaGridError::ProjectionError(
                "footprint radius needs a metric working projection".to_string(),
            ));
        }
        let radius = projector.projected_radius(radius_m, self.location.y())?;
        if !radius.is_finite() {
            return Err(BotaGridError::DegenerateRadius(radius));
        }
        let center = Point::from(projection.from_geographic(self.location.0)?);
        Ok(create_circle(&center, radius, steps))
    }
}

/// Copies a string property into each feature's id.
///
/// Features lacking the property keep whatever id they had.
pub fn assign_ids(features: &mut [Feature], property: &str) {
    for feature in features.iter_mut() {
        let id = feature
            .property(property)
            .and_then(|v| v.as_str())
            .map(str::to_string);
        if let Some(id) = id {
            feature.id = Some(Id::String(id));
        }
    }
}

/// How references are drawn at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceDisplay {
    Hidden,
    Points,
    Footprints,
}

impl ReferenceDisplay {
    pub fn for_zoom(zoom: f64, config: &DisplayConfig) -> Self {
        if zoom <= config.point_min_zoom {
            ReferenceDisplay::Hidden
        } else if zoom <= config.footprint_min_zoom {
            ReferenceDisplay::Points
        } else {
            ReferenceDisplay::Footprints
        }
    }
}

/// References keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    references: Vec<Reference>,
    index: HashMap<String, usize>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a GeoJSON FeatureCollection (or single Feature) of references.
    ///
    /// Ids come from the `reference` property. Features that are not points
    /// or have no id are skipped; repeated ids keep the first feature.
    ///
    /// # Example
    /// ```
    /// use bota_grid_rs::ReferenceSet;
    ///
    /// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
    /// let json = r#"{"type":"FeatureCollection","features":[
    ///   {"type":"Feature","geometry":{"type":"Point","coordinates":[-2.0,53.0]},
    ///    "properties":{"reference":"B/G-0001","name":"Pillbox","scheme":"UKBOTA"}}]}"#;
    /// let set = ReferenceSet::from_geojson_str(json)?;
    /// assert!(set.get("B/G-0001").is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_geojson_str(s: &str) -> Result<Self, BotaGridError> {
        let geojson: GeoJson = s
            .parse()
            .map_err(|e: geojson::Error| BotaGridError::GeoJsonError(e.to_string()))?;

        let mut features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feat) => vec![feat],
            GeoJson::Geometry(_) => {
                return Err(BotaGridError::GeoJsonError(
                    "Expected a Feature or FeatureCollection".to_string(),
                ));
            }
        };
        assign_ids(&mut features, REFERENCE_PROPERTY);

        let total = features.len();
        let mut set = Self::new();
        for feature in features {
            match Reference::from_feature(feature) {
                Some(reference) => set.insert(reference),
                None => warn!("skipping feature without a reference or point geometry"),
            }
        }
        debug!(loaded = set.len(), total, "loaded references");

        Ok(set)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BotaGridError> {
        let s = std::fs::read_to_string(path).map_err(|e| BotaGridError::IoError(e.to_string()))?;
        Self::from_geojson_str(&s)
    }

    /// Adds a reference unless one with the same id exists.
    pub fn insert(&mut self, reference: Reference) {
        if self.index.contains_key(&reference.id) {
            warn!(id = %reference.id, "duplicate reference ignored");
            return;
        }
        self.index.insert(reference.id.clone(), self.references.len());
        self.references.push(reference);
    }

    pub fn get(&self, id: &str) -> Option<&Reference> {
        self.index.get(id).map(|&i| &self.references[i])
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    /// References whose projected location lies within `extent` grown by
    /// `buffer` working units on every side.
    pub fn in_extent(
        &self,
        extent: &Rect<f64>,
        buffer: f64,
        projection: &impl Projection,
    ) -> Result<Vec<&Reference>, BotaGridError> {
        let grown = Rect::new(
            coord! { x: extent.min().x - buffer, y: extent.min().y - buffer },
            coord! { x: extent.max().x + buffer, y: extent.max().y + buffer },
        );

        let mut found = Vec::new();
        for reference in &self.references {
            let p = Point::from(projection.from_geographic(reference.location.0)?);
            if grown.intersects(&p) {
                found.push(reference);
            }
        }
        Ok(found)
    }
}
