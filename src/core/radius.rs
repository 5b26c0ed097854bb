//! Latitude-aware marker radius scaling.
//!
//! Web Mercator stretches ground distance by `1 / cos(latitude)`. Multiplying a
//! nominal ground radius by that factor before dividing by the map resolution
//! keeps a marker's apparent ground coverage consistent across latitudes.
//! This is a secant approximation, adequate for radii up to a few kilometres.

use crate::core::constants::CLAMPED_MAX_LATITUDE;
use crate::util::error::BotaGridError;
use serde::{Deserialize, Serialize};

/// What to do at the ±90° singularity, where `cos(latitude)` is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolePolicy {
    /// Exactly ±90° yields an infinite scale factor and radius.
    #[default]
    Propagate,
    /// Latitude is clamped to ±89.9° before scaling.
    Clamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadiusProjector {
    pub pole_policy: PolePolicy,
}

impl RadiusProjector {
    pub fn new(pole_policy: PolePolicy) -> Self {
        Self { pole_policy }
    }

    /// Mercator secant scale at `lat_deg`.
    pub fn scale_factor(&self, lat_deg: f64) -> Result<f64, BotaGridError> {
        if !lat_deg.is_finite() || lat_deg.abs() > 90.0 {
            return Err(BotaGridError::InvalidLatitude(lat_deg));
        }

        let lat = match self.pole_policy {
            PolePolicy::Propagate => lat_deg,
            PolePolicy::Clamp => lat_deg.clamp(-CLAMPED_MAX_LATITUDE, CLAMPED_MAX_LATITUDE),
        };

        // cos(90°) is 6e-17 in floating point, not zero
        if lat.abs() == 90.0 {
            return Ok(f64::INFINITY);
        }
        Ok(1.0 / lat.to_radians().cos())
    }

    /// Radius in projected map units, for building circle geometry.
    pub fn projected_radius(&self, nominal_m: f64, lat_deg: f64) -> Result<f64, BotaGridError> {
        if !nominal_m.is_finite() || nominal_m <= 0.0 {
            return Err(BotaGridError::InvalidRadius(nominal_m));
        }
        Ok(nominal_m * self.scale_factor(lat_deg)?)
    }

    /// Radius in screen pixels at `resolution` map units per pixel.
    pub fn screen_radius(
        &self,
        nominal_m: f64,
        lat_deg: f64,
        resolution: f64,
    ) -> Result<f64, BotaGridError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(BotaGridError::InvalidResolution(resolution));
        }
        Ok(self.projected_radius(nominal_m, lat_deg)? / resolution)
    }
}

/// Mercator secant scale at `lat_deg`, infinite at the poles.
pub fn scale_factor(lat_deg: f64) -> Result<f64, BotaGridError> {
    RadiusProjector::default().scale_factor(lat_deg)
}

/// Nominal ground radius scaled into projected map units.
pub fn projected_radius(nominal_m: f64, lat_deg: f64) -> Result<f64, BotaGridError> {
    RadiusProjector::default().projected_radius(nominal_m, lat_deg)
}

/// Nominal ground radius scaled into screen pixels.
///
/// # Example
/// ```
/// use bota_grid_rs::screen_radius;
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// assert_eq!(screen_radius(1000.0, 0.0, 10.0)?, 100.0);
/// assert!((screen_radius(1000.0, 60.0, 10.0)? - 200.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub fn screen_radius(nominal_m: f64, lat_deg: f64, resolution: f64) -> Result<f64, BotaGridError> {
    RadiusProjector::default().screen_radius(nominal_m, lat_deg, resolution)
}
