//! Strongly-typed angular and color primitives (zero-cost newtypes).
//!
//! Design goals:
//! - Longitudes are always normalized to `[0, 360)` before any lookup
//! - Colors carry their opacity so draw commands never juggle strings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Check that a user-provided size is finite and strictly positive.
pub fn positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Ecliptic longitude in degrees, normalized to `[0, 360)`.
///
/// 0° is tropical Aries 0° and is drawn at 12 o'clock; longitude grows
/// clockwise on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Longitude(f64);

impl Longitude {
    pub const ZERO: Longitude = Longitude(0.0);

    /// Normalize any finite angle into `[0, 360)`.
    ///
    /// Non-finite input is passed through unchanged; callers that accept
    /// user values should go through [`Longitude::try_new`].
    #[inline]
    pub fn new(deg: f64) -> Longitude {
        let wrapped = deg.rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to exactly 360
        if wrapped >= 360.0 {
            Longitude(0.0)
        } else {
            Longitude(wrapped)
        }
    }

    /// Normalize with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(deg: f64) -> Result<Longitude, NumericError> {
        if deg.is_nan() {
            Err(NumericError::NaN)
        } else if deg.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Longitude::new(deg))
        }
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Index of the 30° band this longitude falls in (0 = Aries).
    #[inline]
    pub fn band(self) -> usize {
        ((self.0 / 30.0).floor() as usize) % 12
    }

    /// Start of the 30° band, i.e. `floor(lon / 30) * 30`.
    #[inline]
    pub fn band_start(self) -> f64 {
        self.band() as f64 * 30.0
    }

    /// Degrees past the start of the band, in `[0, 30)`.
    #[inline]
    pub fn within_band(self) -> f64 {
        self.0 - self.band_start()
    }

    /// Rotate clockwise by `delta` degrees.
    #[inline]
    pub fn offset(self, delta: f64) -> Longitude {
        Longitude::new(self.0 + delta)
    }

    /// Whole degrees and arcminutes, both truncated.
    pub fn degree_minute(self) -> DegreeMinute {
        DegreeMinute::of(self.0)
    }

    /// True on the left half of the wheel, where labels must read right-to-left.
    #[inline]
    pub fn on_left_half(self) -> bool {
        self.0 > 90.0 && self.0 < 270.0
    }
}

impl fmt::Display for Longitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degree_minute())
    }
}

/// A truncated degree/arcminute pair, printed as `12°34'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DegreeMinute {
    pub degrees: u32,
    pub minutes: u32,
}

impl DegreeMinute {
    /// `⌊v⌋°⌊(v mod 1)·60⌋'` for a non-negative value.
    pub fn of(value: f64) -> DegreeMinute {
        let value = value.max(0.0);
        let degrees = value.floor();
        let minutes = ((value - degrees) * 60.0).floor().min(59.0);
        DegreeMinute {
            degrees: degrees as u32,
            minutes: minutes as u32,
        }
    }
}

impl fmt::Display for DegreeMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°{}'", self.degrees, self.minutes)
    }
}

/// An sRGB color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(value: u32) -> Rgba {
        Rgba::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb` without alpha, for `fill`/`stroke` attributes.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex_string())
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}`", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r,g,b)` and `rgba(r,g,b,a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return Err(err()),
            };
            let value = u32::from_str_radix(&expanded, 16).map_err(|_| err())?;
            return Ok(Rgba::hex(value));
        }

        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(err());
        };
        let body = body.strip_suffix(')').ok_or_else(err)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(err());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| err());
        let mut color = Rgba::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        if has_alpha {
            let a: f64 = parts[3].parse().map_err(|_| err())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(err());
            }
            color.a = a;
        }
        Ok(color)
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
