//! Static lookup tables: signs, elements, modalities, dignities, aspects and glyphs.
//!
//! Everything here is a pure function over `'static` data; nothing is
//! computed or cached at runtime.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{Longitude, Rgba};

// ============================================================================
// Zodiac
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// The sign owning `[i*30, i*30+30)` for `i = floor(lon/30) mod 12`.
    pub fn of(lon: Longitude) -> ZodiacSign {
        ZodiacSign::ALL[lon.band()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn glyph(self) -> &'static str {
        const GLYPHS: [&str; 12] = [
            "♈", "♉", "♊", "♋", "♌", "♍", "♎", "♏", "♐", "♑", "♒", "♓",
        ];
        GLYPHS[self.index()]
    }

    /// Signs cycle Fire, Earth, Air, Water starting at Aries.
    pub fn element(self) -> Element {
        Element::ALL[self.index() % 4]
    }

    /// Signs cycle Cardinal, Fixed, Mutable starting at Aries.
    pub fn modality(self) -> Modality {
        Modality::ALL[self.index() % 3]
    }

    /// Traditional ruler, shown in the ring just inside the sign glyphs.
    pub fn ruler(self) -> Body {
        match self {
            ZodiacSign::Aries | ZodiacSign::Scorpio => Body::Mars,
            ZodiacSign::Taurus | ZodiacSign::Libra => Body::Venus,
            ZodiacSign::Gemini | ZodiacSign::Virgo => Body::Mercury,
            ZodiacSign::Cancer => Body::Moon,
            ZodiacSign::Leo => Body::Sun,
            ZodiacSign::Sagittarius | ZodiacSign::Pisces => Body::Jupiter,
            ZodiacSign::Capricorn | ZodiacSign::Aquarius => Body::Saturn,
        }
    }

    /// Pastel background of the sign's wedge.
    pub fn segment_color(self) -> Rgba {
        const COLORS: [u32; 12] = [
            0xFFE5E5, 0xE5FFE5, 0xE5E5FF, 0xFFE5FF, 0xFFFFE5, 0xE5FFFF, //
            0xFFE5E5, 0xE5FFE5, 0xFFE5FF, 0xFFFFE5, 0xE5FFFF, 0xFFE5E5,
        ];
        Rgba::hex(COLORS[self.index()])
    }

    pub fn start(self) -> Longitude {
        Longitude::new(self.index() as f64 * 30.0)
    }

    pub fn midpoint(self) -> Longitude {
        Longitude::new(self.index() as f64 * 30.0 + 15.0)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zodiac sign of a raw longitude in degrees (normalized first).
pub fn sign_of(longitude: f64) -> ZodiacSign {
    ZodiacSign::of(Longitude::new(longitude))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn name(self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }

    /// Color of the dignity ring drawn around a body in a sign of this element.
    pub fn color(self) -> Rgba {
        match self {
            Element::Fire => Rgba::hex(0xFF6B6B),
            Element::Earth => Rgba::hex(0x38D9A9),
            Element::Air => Rgba::hex(0x74C0FC),
            Element::Water => Rgba::hex(0x748FFC),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];

    pub fn name(self) -> &'static str {
        match self {
            Modality::Cardinal => "Cardinal",
            Modality::Fixed => "Fixed",
            Modality::Mutable => "Mutable",
        }
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// Bodies and chart points with a dedicated glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
    PartOfFortune,
    Vertex,
}

impl Body {
    /// Case-insensitive lookup; spaces and underscores are ignored, so
    /// `"SUN"`, `"Sun"` and `"north_node"` all resolve.
    pub fn from_name(name: &str) -> Option<Body> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        let body = match key.as_str() {
            "sun" => Body::Sun,
            "moon" => Body::Moon,
            "mercury" => Body::Mercury,
            "venus" => Body::Venus,
            "mars" => Body::Mars,
            "jupiter" => Body::Jupiter,
            "saturn" => Body::Saturn,
            "uranus" => Body::Uranus,
            "neptune" => Body::Neptune,
            "pluto" => Body::Pluto,
            "northnode" => Body::NorthNode,
            "southnode" => Body::SouthNode,
            "chiron" => Body::Chiron,
            "partoffortune" => Body::PartOfFortune,
            "vertex" => Body::Vertex,
            _ => return None,
        };
        Some(body)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Body::Sun => "☉",
            Body::Moon => "☽",
            Body::Mercury => "☿",
            Body::Venus => "♀",
            Body::Mars => "♂",
            Body::Jupiter => "♃",
            Body::Saturn => "♄",
            Body::Uranus => "♅",
            Body::Neptune => "♆",
            Body::Pluto => "♇",
            Body::NorthNode => "☊",
            Body::SouthNode => "☋",
            Body::Chiron => "⚷",
            Body::PartOfFortune => "⊗",
            Body::Vertex => "Vx",
        }
    }

    /// Classical rulership entry. Outer planets and chart points have none.
    pub fn rulership(self) -> Option<&'static Rulership> {
        use ZodiacSign::*;

        static SUN: Rulership = Rulership::new(&[Leo], Aries, Libra, &[Aquarius]);
        static MOON: Rulership = Rulership::new(&[Cancer], Taurus, Scorpio, &[Capricorn]);
        static MERCURY: Rulership =
            Rulership::new(&[Gemini, Virgo], Virgo, Pisces, &[Sagittarius, Pisces]);
        static VENUS: Rulership = Rulership::new(&[Taurus, Libra], Pisces, Virgo, &[Aries, Scorpio]);
        static MARS: Rulership = Rulership::new(&[Aries, Scorpio], Capricorn, Cancer, &[Taurus, Libra]);
        static JUPITER: Rulership =
            Rulership::new(&[Sagittarius, Pisces], Cancer, Capricorn, &[Gemini, Virgo]);
        static SATURN: Rulership =
            Rulership::new(&[Capricorn, Aquarius], Libra, Aries, &[Cancer, Leo]);

        match self {
            Body::Sun => Some(&SUN),
            Body::Moon => Some(&MOON),
            Body::Mercury => Some(&MERCURY),
            Body::Venus => Some(&VENUS),
            Body::Mars => Some(&MARS),
            Body::Jupiter => Some(&JUPITER),
            Body::Saturn => Some(&SATURN),
            _ => None,
        }
    }
}

/// Display glyph for a body name; unknown names display as themselves.
pub fn glyph_for(name: &str) -> &str {
    match Body::from_name(name) {
        Some(body) => body.glyph(),
        None => name,
    }
}

// ============================================================================
// Dignities
// ============================================================================

/// Signs where a body is strengthened or weakened.
#[derive(Debug)]
pub struct Rulership {
    pub domicile: &'static [ZodiacSign],
    pub exaltation: ZodiacSign,
    pub fall: ZodiacSign,
    pub detriment: &'static [ZodiacSign],
}

impl Rulership {
    const fn new(
        domicile: &'static [ZodiacSign],
        exaltation: ZodiacSign,
        fall: ZodiacSign,
        detriment: &'static [ZodiacSign],
    ) -> Rulership {
        Rulership {
            domicile,
            exaltation,
            fall,
            detriment,
        }
    }

    /// Every status that applies, in precedence order.
    fn matches(&self, sign: ZodiacSign) -> impl Iterator<Item = Dignity> + '_ {
        [
            (self.domicile.contains(&sign), Dignity::Domicile),
            (self.exaltation == sign, Dignity::Exaltation),
            (self.fall == sign, Dignity::Fall),
            (self.detriment.contains(&sign), Dignity::Detriment),
        ]
        .into_iter()
        .filter_map(|(hit, dignity)| hit.then_some(dignity))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dignity {
    Domicile,
    Exaltation,
    Fall,
    Detriment,
    None,
}

impl Dignity {
    pub fn name(self) -> &'static str {
        match self {
            Dignity::Domicile => "domicile",
            Dignity::Exaltation => "exaltation",
            Dignity::Fall => "fall",
            Dignity::Detriment => "detriment",
            Dignity::None => "none",
        }
    }

    pub fn symbol(self) -> Option<char> {
        match self {
            Dignity::Domicile => Some('⌂'),
            Dignity::Exaltation => Some('⇈'),
            Dignity::Detriment => Some('⌒'),
            Dignity::Fall => Some('⇊'),
            Dignity::None => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Dignity::None
    }
}

/// Single dignity of `body` in `sign`, first match of domicile, exaltation,
/// fall, detriment. Bodies outside the classical table report `None`.
pub fn dignity(body: &str, sign: ZodiacSign) -> Dignity {
    Body::from_name(body)
        .and_then(Body::rulership)
        .and_then(|r| r.matches(sign).next())
        .unwrap_or(Dignity::None)
}

/// All dignities of `body` in `sign`; empty when none apply.
pub fn dignities(body: &str, sign: ZodiacSign) -> Vec<Dignity> {
    Body::from_name(body)
        .and_then(Body::rulership)
        .map(|r| r.matches(sign).collect())
        .unwrap_or_default()
}

// ============================================================================
// Aspects
// ============================================================================

/// Draw-priority tier; tiers are drawn in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AspectTier {
    Minor,
    Major,
}

impl AspectTier {
    /// Draw order, bottom to top.
    pub const ORDER: [AspectTier; 2] = [AspectTier::Minor, AspectTier::Major];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
}

/// Stroke of one aspect line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectStyle {
    pub color: Rgba,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
}

/// Opacity every aspect line is drawn with.
pub const ASPECT_OPACITY: f64 = 0.7;

/// Orb, in degrees, within which an angle counts as an aspect.
pub const ASPECT_ORB: f64 = 5.0;

impl AspectType {
    pub const ALL: [AspectType; 5] = [
        AspectType::Conjunction,
        AspectType::Sextile,
        AspectType::Square,
        AspectType::Trine,
        AspectType::Opposition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Opposition => "opposition",
            AspectType::Trine => "trine",
            AspectType::Square => "square",
            AspectType::Sextile => "sextile",
        }
    }

    pub fn exact_angle(self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Opposition => 180.0,
        }
    }

    pub fn tier(self) -> AspectTier {
        match self {
            AspectType::Conjunction | AspectType::Opposition => AspectTier::Major,
            AspectType::Trine | AspectType::Square | AspectType::Sextile => AspectTier::Minor,
        }
    }

    /// Classify a separation angle with a 5° orb.
    pub fn classify(angle: f64) -> Option<AspectType> {
        let angle = angle.abs();
        AspectType::ALL
            .into_iter()
            .find(|kind| (angle - kind.exact_angle()).abs() < ASPECT_ORB)
    }

    pub fn style(self) -> AspectStyle {
        let color = aspect_color(Some(self), ASPECT_OPACITY);
        let (width, dash) = match self {
            AspectType::Conjunction => (2.0, None),
            AspectType::Opposition => (2.0, Some([5.0, 3.0])),
            AspectType::Trine => (1.5, None),
            AspectType::Square => (1.5, Some([4.0, 2.0])),
            AspectType::Sextile => (1.0, Some([2.0, 2.0])),
        };
        AspectStyle { color, width, dash }
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an aspect label outside the five known types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAspect(pub String);

impl fmt::Display for UnknownAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aspect type `{}`", self.0)
    }
}

impl std::error::Error for UnknownAspect {}

impl FromStr for AspectType {
    type Err = UnknownAspect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectType::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAspect(s.to_string()))
    }
}

/// Display color of an aspect at the given opacity. Oppositions are drawn
/// at 80% of it; unknown types fall back to gray.
pub fn aspect_color(kind: Option<AspectType>, alpha: f64) -> Rgba {
    match kind {
        Some(AspectType::Conjunction) => Rgba::rgba(255, 0, 0, alpha),
        Some(AspectType::Opposition) => Rgba::rgba(255, 0, 0, alpha * 0.8),
        Some(AspectType::Trine) => Rgba::rgba(0, 0, 255, alpha),
        Some(AspectType::Square) => Rgba::rgba(255, 69, 0, alpha),
        Some(AspectType::Sextile) => Rgba::rgba(0, 128, 0, alpha),
        None => Rgba::rgba(128, 128, 128, alpha),
    }
}
