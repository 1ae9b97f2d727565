//! Traditional ruler glyph of each sign, just inside the sign glyph.

use super::{Layer, LayerContext};
use crate::geometry::upright_rotation;
use crate::render::defaults;
use crate::scene::{DrawCommand, Surface, TextStyle};
use crate::tables::ZodiacSign;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulerLayer;

impl Layer for RulerLayer {
    fn name(&self) -> &'static str {
        "rulers"
    }

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface) {
        if !ctx.options.show_rulers {
            return;
        }
        let g = ctx.geometry;
        let style = TextStyle::new(12.0 * g.scale, defaults::MUTED_TEXT);
        for sign in ZodiacSign::ALL {
            let mid = sign.midpoint();
            surface.draw(DrawCommand::rotated_text(
                g.point(g.ruler_radius(), mid),
                upright_rotation(mid),
                0.0,
                sign.ruler().glyph(),
                style,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::geometry::ChartGeometry;
    use crate::render::RenderOptions;
    use crate::scene::Scene;

    fn draw(options: RenderOptions) -> Scene {
        let chart = ChartData::default();
        let geometry = ChartGeometry::new(&options);
        let ctx = LayerContext {
            chart: &chart,
            geometry: &geometry,
            options: &options,
        };
        let mut scene = Scene::new();
        RulerLayer.draw(&ctx, &mut scene);
        scene
    }

    #[test]
    fn one_ruler_per_sign() {
        let scene = draw(RenderOptions::default());
        let text: String = scene.texts().map(|t| t.content.as_str()).collect();
        assert_eq!(text, "♂♀☿☽☉☿♀♂♃♄♄♃");
    }

    #[test]
    fn can_be_disabled() {
        let scene = draw(RenderOptions {
            show_rulers: false,
            ..RenderOptions::default()
        });
        assert!(scene.is_empty());
    }
}
