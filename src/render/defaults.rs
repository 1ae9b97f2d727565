//! Default canvas settings and the fixed palette of the wheel.

use crate::types::Rgba;

pub const CANVAS_SIZE: f64 = 800.0;
pub const MARGIN: f64 = 40.0;
pub const SEGMENT_OPACITY: f64 = 0.6;
pub const FONT_FAMILY: &str = "Arial, sans-serif";

pub const BACKGROUND: Rgba = Rgba::WHITE;

// Structural rings
pub const OUTER_STROKE: Rgba = Rgba::hex(0x666666);
pub const OUTER_GRADIENT_END: Rgba = Rgba::hex(0xF0F0F0);
pub const INNER_STROKE: Rgba = Rgba::hex(0x999999);
pub const INNER_GRADIENT_END: Rgba = Rgba::hex(0xF8F8F8);
pub const BODY_RING_FILL: Rgba = Rgba::hex(0xF8F8F8);
pub const BODY_RING_STROKE: Rgba = Rgba::hex(0xDDDDDD);
pub const HOUSE_RING_STROKE: Rgba = Rgba::hex(0x666666);

// Text
pub const GLYPH_TEXT: Rgba = Rgba::hex(0x333333);
pub const LABEL_TEXT: Rgba = Rgba::hex(0x444444);
pub const MUTED_TEXT: Rgba = Rgba::hex(0x666666);
pub const FAINT_TEXT: Rgba = Rgba::hex(0x888888);
pub const RETROGRADE: Rgba = Rgba::hex(0xFF4444);
pub const SHADOW: Rgba = Rgba::rgba(0, 0, 0, 0.3);

// Body markers
pub const MARKER_RADIUS: f64 = 6.0;
pub const DIGNITY_RING_RADIUS: f64 = 8.0;
pub const CONNECTOR: Rgba = Rgba::rgba(102, 102, 102, 0.5);
