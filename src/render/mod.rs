//! Chart rendering
//!
//! This module is organized into submodules:
//! - `defaults`: Canvas defaults and the fixed palette
//! - `options`: `RenderOptions`, the serde-configurable knobs
//! - `svg`: `SvgSurface`, the SVG backend for draw commands
//!
//! [`render`] is the orchestrator: it clears the surface once and runs every
//! layer of [`LAYER_ORDER`] against it. Nothing is cached between calls, so
//! the same chart always yields the same command sequence.

pub mod defaults;
pub mod options;
pub mod svg;

pub use options::RenderOptions;
pub use svg::SvgSurface;

use crate::chart::ChartData;
use crate::errors::RenderError;
use crate::geometry::ChartGeometry;
use crate::layers::{LAYER_ORDER, Layer, LayerContext};
use crate::log::debug;
use crate::scene::{DrawCommand, Scene, Surface};

/// Counts the commands a layer issues, for the per-layer log line.
struct Counting<'s> {
    inner: &'s mut dyn Surface,
    count: usize,
}

impl Surface for Counting<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.inner.clear(width, height);
    }

    fn draw(&mut self, command: DrawCommand) {
        self.count += 1;
        self.inner.draw(command);
    }
}

/// Draw the whole chart onto `surface`.
///
/// Only invalid options fail; bad chart entries are skipped one at a time and
/// the rest of the chart is still drawn.
pub fn render(
    chart: &ChartData,
    options: &RenderOptions,
    surface: &mut dyn Surface,
) -> Result<(), RenderError> {
    options.validate()?;
    let geometry = ChartGeometry::new(options);
    let ctx = LayerContext {
        chart,
        geometry: &geometry,
        options,
    };

    surface.clear(geometry.width, geometry.height);
    surface.draw(DrawCommand::Fill {
        color: options.background,
    });

    for layer in LAYER_ORDER {
        surface.begin_layer(layer.name());
        let mut counting = Counting {
            inner: &mut *surface,
            count: 0,
        };
        layer.draw(&ctx, &mut counting);
        let _count = counting.count;
        debug!(layer = layer.name(), commands = _count, "layer drawn");
        surface.end_layer();
    }
    Ok(())
}

/// Render into a fresh [`Scene`].
pub fn render_scene(chart: &ChartData, options: &RenderOptions) -> Result<Scene, RenderError> {
    let mut scene = Scene::new();
    render(chart, options, &mut scene)?;
    Ok(scene)
}

/// Render to an SVG document string.
pub fn render_svg(chart: &ChartData, options: &RenderOptions) -> Result<String, RenderError> {
    let mut surface = SvgSurface::new(options);
    render(chart, options, &mut surface)?;
    Ok(surface.finish())
}
