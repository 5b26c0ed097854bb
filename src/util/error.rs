/// Error type for bota-grid-rs operations.
#[derive(Debug, PartialEq)]
pub enum BotaGridError {
    /// The subdivision level is outside the valid range (1-10).
    InvalidLevel(u8),
    /// A longitude/latitude pair lies outside [-180, 180] x [-90, 90] or is not finite.
    CoordinateOutOfRange { lon: f64, lat: f64 },
    /// Latitude is not finite or lies outside [-90, 90].
    InvalidLatitude(f64),
    /// A locator string could not be decoded.
    InvalidLocator(String),
    /// Map resolution must be positive and finite.
    InvalidResolution(f64),
    /// Nominal marker radius must be positive and finite.
    InvalidRadius(f64),
    /// An extent would enumerate more cells than the limit allows.
    TooManyCells { level: u8, limit: usize },
    /// The computed radius is infinite or NaN (latitude at a pole).
    DegenerateRadius(f64),
    /// Coordinate projection failed.
    ProjectionError(String),
    /// File I/O error.
    IoError(String),
    /// Failed to read a GeoJSON reference collection.
    GeoJsonError(String),
    /// Invalid or unreadable configuration.
    ConfigError(String),
}

impl std::fmt::Display for BotaGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotaGridError::InvalidLevel(l) => write!(f, "Invalid grid level: {}", l),
            BotaGridError::CoordinateOutOfRange { lon, lat } => {
                write!(f, "Coordinate out of range: ({}, {})", lon, lat)
            }
            BotaGridError::InvalidLatitude(lat) => write!(f, "Invalid latitude: {}", lat),
            BotaGridError::InvalidLocator(s) => write!(f, "Invalid locator: {}", s),
            BotaGridError::InvalidResolution(r) => write!(f, "Invalid resolution: {}", r),
            BotaGridError::InvalidRadius(r) => write!(f, "Invalid radius: {}", r),
            BotaGridError::TooManyCells { level, limit } => {
                write!(f, "Extent covers more than {} cells at level {}", limit, level)
            }
            BotaGridError::DegenerateRadius(r) => write!(f, "Degenerate radius: {}", r),
            BotaGridError::ProjectionError(msg) => write!(f, "Projection error: {}", msg),
            BotaGridError::IoError(msg) => write!(f, "IO error: {}", msg),
            BotaGridError::GeoJsonError(msg) => write!(f, "GeoJSON error: {}", msg),
            BotaGridError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for BotaGridError {}
