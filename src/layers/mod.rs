//! The chart is drawn as a fixed stack of layers, bottom to top.
//!
//! Each layer is a pure function of the chart snapshot and the geometry; it
//! only emits draw commands. Skipped entries (unknown aspect labels, missing
//! bodies) cost one log line and nothing else.

pub mod aspects;
pub mod bodies;
pub mod houses;
pub mod rings;
pub mod rulers;

use enum_dispatch::enum_dispatch;

use crate::chart::ChartData;
use crate::geometry::ChartGeometry;
use crate::render::RenderOptions;
use crate::scene::Surface;
use crate::tables::AspectTier;

pub use aspects::AspectLayer;
pub use bodies::BodyLayer;
pub use houses::HouseLayer;
pub use rings::RingLayer;
pub use rulers::RulerLayer;

/// Read-only inputs shared by every layer of one render.
#[derive(Debug, Clone, Copy)]
pub struct LayerContext<'a> {
    pub chart: &'a ChartData,
    pub geometry: &'a ChartGeometry,
    pub options: &'a RenderOptions,
}

#[enum_dispatch]
pub trait Layer {
    /// Stable name, used for SVG groups and log lines.
    fn name(&self) -> &'static str;

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface);
}

#[enum_dispatch(Layer)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLayer {
    Rings(RingLayer),
    Rulers(RulerLayer),
    Houses(HouseLayer),
    Aspects(AspectLayer),
    Bodies(BodyLayer),
}

/// Draw order. Later layers are never hidden by earlier ones.
pub const LAYER_ORDER: [ChartLayer; 6] = [
    ChartLayer::Rings(RingLayer),
    ChartLayer::Rulers(RulerLayer),
    ChartLayer::Houses(HouseLayer),
    ChartLayer::Aspects(AspectLayer {
        tier: AspectTier::Minor,
    }),
    ChartLayer::Aspects(AspectLayer {
        tier: AspectTier::Major,
    }),
    ChartLayer::Bodies(BodyLayer),
];
