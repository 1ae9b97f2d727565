//! Natal chart wheels as draw commands and SVG.
//!
//! A [`ChartData`] snapshot (body positions, house cusps, aspects) is turned
//! into an ordered list of typed [`DrawCommand`]s, one layer at a time, and
//! executed against a [`Surface`]: the recording [`Scene`] or the SVG backend.

pub mod chart;
pub mod errors;
pub mod geometry;
pub mod layers;
mod log;
pub mod render;
pub mod scene;
pub mod summary;
pub mod tables;
pub mod types;

pub use chart::{BodyPosition, ChartData, sample_chart};
pub use errors::{InputError, RenderError};
pub use render::{RenderOptions, SvgSurface, render, render_scene, render_svg};
pub use scene::{DrawCommand, Scene, Surface};
pub use summary::ChartSummary;

/// Render chart JSON to SVG with default options.
///
/// Returns the SVG string on success, or an error with diagnostics.
pub fn chart_to_svg(source: &str) -> Result<String, miette::Report> {
    chart_to_svg_with(source, &RenderOptions::default())
}

/// Like [`chart_to_svg`], with explicit render options.
pub fn chart_to_svg_with(source: &str, options: &RenderOptions) -> Result<String, miette::Report> {
    let chart = ChartData::from_json("chart.json", source)?;
    Ok(render_svg(&chart, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_to_svg() {
        let svg = chart_to_svg(r#"{"planetPositions": {"Sun": [10.0]}}"#).unwrap();
        assert!(svg.starts_with("<svg"));
        let sun = regex_lite::Regex::new(r">\s*☉\s*</text>").unwrap();
        assert!(sun.is_match(&svg), "{svg}");
    }

    #[test]
    fn bad_json_is_a_diagnostic() {
        let err = chart_to_svg(r#"{"planetPositions": ["#).unwrap_err();
        assert!(err.to_string().contains("chart"), "{err}");
    }

    #[test]
    fn bad_options_are_reported() {
        let options = RenderOptions {
            margin: 500.0,
            ..RenderOptions::default()
        };
        assert!(chart_to_svg_with("{}", &options).is_err());
    }
}
