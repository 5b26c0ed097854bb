/// Longitude span of a level-1 field, in degrees
pub const FIELD_WIDTH: f64 = 20.0;

/// Latitude span of a level-1 field, in degrees
pub const FIELD_HEIGHT: f64 = 10.0;

/// Number of fields along each axis (A-R)
pub const FIELD_COUNT: u32 = 18;

/// Divisor for odd subdivision steps (digit pairs)
pub const SQUARE_DIVISIONS: u32 = 10;

/// Divisor for even subdivision steps (letter pairs)
pub const SUBSQUARE_DIVISIONS: u32 = 24;

/// Finest supported subdivision level
pub const MAX_LEVEL: u8 = 10;

/// Fraction of a cell's height used to nudge its corner inside before encoding
pub(crate) const CELL_NUDGE_FRACTION: f64 = 1e-3;

/// Pole clamp used by [`PolePolicy::Clamp`](crate::core::radius::PolePolicy)
pub const CLAMPED_MAX_LATITUDE: f64 = 89.9;

/// Nominal marker radius in meters when a scheme does not define one
pub const DEFAULT_RADIUS_METERS: f64 = 1000.0;

/// Vertices used to approximate a reference footprint circle
pub const FOOTPRINT_STEPS: usize = 128;

/// Most cells a single enumeration may produce
pub const MAX_CELLS: usize = 100_000;
