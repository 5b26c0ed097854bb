use crate::core::constants::{
    FIELD_COUNT, FIELD_HEIGHT, FIELD_WIDTH, MAX_LEVEL, SQUARE_DIVISIONS, SUBSQUARE_DIVISIONS,
};
use crate::util::error::BotaGridError;
use geo_types::{Rect, coord};

fn check_level(level: u8) -> Result<(), BotaGridError> {
    if level == 0 || level > MAX_LEVEL {
        return Err(BotaGridError::InvalidLevel(level));
    }
    Ok(())
}

/// Divisor applied when moving from subdivision `n` to `n + 1`.
fn divisions(n: u8) -> u32 {
    if n % 2 == 1 {
        SQUARE_DIVISIONS
    } else {
        SUBSQUARE_DIVISIONS
    }
}

/// Splits `value` into its integer digit (capped at `base - 1`) and remainder.
///
/// The cap keeps the eastern edge and the north pole inside the last cell;
/// the remainder then stays at 1.0 and carries the maximum digit down.
fn split(value: f64, base: u32) -> (u32, f64) {
    let digit = (value.floor() as u32).min(base - 1);
    (digit, value - digit as f64)
}

fn letter(index: u32) -> char {
    char::from(b'A' + index as u8)
}

fn digit(index: u32) -> char {
    char::from(b'0' + index as u8)
}

/// Height of a cell at `level`, in degrees latitude. Width is twice this.
pub fn cell_step(level: u8) -> Result<f64, BotaGridError> {
    check_level(level)?;
    let mut step = FIELD_HEIGHT;
    for n in 1..level {
        step /= divisions(n) as f64;
    }
    Ok(step)
}

/// Encodes a longitude/latitude into a Maidenhead locator of `level` pairs.
///
/// Level 1 is the field (`JO`), level 2 adds the square (`JO03`), level 3
/// the subsquare (`JO03BB`), alternating digits and letters beyond that.
/// Digits are taken with floor semantics, never rounded.
///
/// # Example
/// ```
/// use bota_grid_rs::encode;
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// assert_eq!(encode(2.0, 53.0, 1)?, "JO");
/// assert_eq!(encode(-2.248, 53.481, 3)?, "IO83VL");
/// # Ok(())
/// # }
/// ```
pub fn encode(lon: f64, lat: f64, level: u8) -> Result<String, BotaGridError> {
    check_level(level)?;
    if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
        return Err(BotaGridError::CoordinateOutOfRange { lon, lat });
    }

    let mut locator = String::with_capacity(2 * level as usize);

    let (x, mut xg) = split((lon + 180.0) / FIELD_WIDTH, FIELD_COUNT);
    let (y, mut yg) = split((lat + 90.0) / FIELD_HEIGHT, FIELD_COUNT);
    locator.push(letter(x));
    locator.push(letter(y));

    for n in 1..level {
        let base = divisions(n);
        let (x, x_rem) = split(xg * base as f64, base);
        let (y, y_rem) = split(yg * base as f64, base);
        xg = x_rem;
        yg = y_rem;

        if base == SQUARE_DIVISIONS {
            locator.push(digit(x));
            locator.push(digit(y));
        } else {
            locator.push(letter(x));
            locator.push(letter(y));
        }
    }

    Ok(locator)
}

/// Decodes a locator into the geographic bounds of its cell.
///
/// Letters are accepted in either case.
///
/// # Example
/// ```
/// use bota_grid_rs::decode;
///
/// # fn main() -> Result<(), bota_grid_rs::BotaGridError> {
/// let bounds = decode("JO")?;
/// assert_eq!(bounds.min().x, 0.0);
/// assert_eq!(bounds.min().y, 50.0);
/// # Ok(())
/// # }
/// ```
pub fn decode(locator: &str) -> Result<Rect<f64>, BotaGridError> {
    let invalid = || BotaGridError::InvalidLocator(locator.to_string());

    let bytes = locator.as_bytes();
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return Err(invalid());
    }
    let level = u8::try_from(bytes.len() / 2).map_err(|_| invalid())?;
    check_level(level).map_err(|_| invalid())?;

    let mut lon = -180.0;
    let mut lat = -90.0;
    let mut width = FIELD_WIDTH;
    let mut height = FIELD_HEIGHT;

    for (n, pair) in bytes.chunks(2).enumerate() {
        let n = n as u8;
        let base = if n == 0 { FIELD_COUNT } else { divisions(n) };
        if n > 0 {
            width /= base as f64;
            height /= base as f64;
        }

        let (x, y) = if base == SQUARE_DIVISIONS {
            (digit_value(pair[0]), digit_value(pair[1]))
        } else {
            (letter_value(pair[0]), letter_value(pair[1]))
        };
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) if x < base && y < base => (x, y),
            _ => return Err(invalid()),
        };

        lon += x as f64 * width;
        lat += y as f64 * height;
    }

    Ok(Rect::new(
        coord! { x: lon, y: lat },
        coord! { x: lon + width, y: lat + height },
    ))
}

fn letter_value(b: u8) -> Option<u32> {
    b.is_ascii_alphabetic()
        .then(|| (b.to_ascii_uppercase() - b'A') as u32)
}

fn digit_value(b: u8) -> Option<u32> {
    b.is_ascii_digit().then(|| (b - b'0') as u32)
}
