//! Render configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::RenderError;
use crate::types::{Rgba, positive};

/// Knobs for one render. Every field has a default, so a partial JSON object
/// (or `{}`) deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of the square canvas.
    pub size: f64,
    /// Gap between the canvas edge and the outer ring.
    pub margin: f64,
    /// Fill opacity of the zodiac wedges.
    pub segment_opacity: f64,
    pub background: Rgba,
    /// Draw the traditional ruler glyph inside each sign.
    pub show_rulers: bool,
    /// Tag each layer group in the SVG with a `class` attribute.
    pub css_classes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: defaults::CANVAS_SIZE,
            margin: defaults::MARGIN,
            segment_opacity: defaults::SEGMENT_OPACITY,
            background: defaults::BACKGROUND,
            show_rulers: true,
            css_classes: true,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), RenderError> {
        positive(self.size).map_err(|reason| RenderError::InvalidCanvas {
            value: self.size,
            reason,
        })?;
        if !self.margin.is_finite() || self.margin < 0.0 || self.margin * 2.0 >= self.size {
            return Err(RenderError::InvalidMargin {
                margin: self.margin,
                size: self.size,
            });
        }
        if !(0.0..=1.0).contains(&self.segment_opacity) {
            return Err(RenderError::InvalidOpacity {
                value: self.segment_opacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericError;

    #[test]
    fn defaults_validate() {
        assert!(RenderOptions::default().validate().is_ok());
    }

    #[test]
    fn partial_json() {
        let opts: RenderOptions =
            serde_json::from_str(r##"{"size": 400, "background": "#fafafa"}"##).unwrap();
        assert_eq!(opts.size, 400.0);
        assert_eq!(opts.margin, defaults::MARGIN);
        assert_eq!(opts.background, Rgba::hex(0xFAFAFA));
    }

    #[test]
    fn rejects_bad_canvas() {
        let opts = RenderOptions {
            size: 0.0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(RenderError::InvalidCanvas {
                reason: NumericError::Zero,
                ..
            })
        ));

        let opts = RenderOptions {
            margin: 400.0,
            ..RenderOptions::default()
        };
        assert!(matches!(opts.validate(), Err(RenderError::InvalidMargin { .. })));

        let opts = RenderOptions {
            segment_opacity: 1.5,
            ..RenderOptions::default()
        };
        assert!(matches!(opts.validate(), Err(RenderError::InvalidOpacity { .. })));
    }
}
