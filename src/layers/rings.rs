//! Static structure of the wheel: boundary circles, the body and house bands,
//! and the twelve zodiac wedges with their glyphs and degree ticks.

use glam::DVec2;

use super::{Layer, LayerContext};
use crate::geometry::{ChartGeometry, upright_rotation};
use crate::render::defaults;
use crate::scene::{DrawCommand, Paint, Shadow, Stroke, Surface, TextStyle};
use crate::tables::ZodiacSign;
use crate::types::{Longitude, Rgba};

/// Spacing of the degree ticks inside each sign.
const TICK_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayer;

impl Layer for RingLayer {
    fn name(&self) -> &'static str {
        "rings"
    }

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface) {
        let g = ctx.geometry;
        draw_circles(g, surface);
        draw_body_band(g, surface);
        draw_house_band(g, surface);
        for sign in ZodiacSign::ALL {
            draw_sign(g, sign, ctx.options.segment_opacity, surface);
        }
    }
}

fn radial(g: &ChartGeometry, inner: f64, outer: f64, start: Rgba, end: Rgba) -> Paint {
    Paint::Radial {
        center: g.center,
        inner_radius: inner.max(0.0),
        outer_radius: outer,
        start,
        end,
    }
}

fn draw_circles(g: &ChartGeometry, surface: &mut dyn Surface) {
    let r = g.outer_radius;
    surface.draw(DrawCommand::Circle {
        center: g.center,
        radius: r,
        fill: Some(radial(g, r - 10.0 * g.scale, r, Rgba::WHITE, defaults::OUTER_GRADIENT_END)),
        stroke: Some(Stroke::new(defaults::OUTER_STROKE, 2.0)),
    });

    for radius in g.decorative_radii() {
        surface.draw(DrawCommand::Circle {
            center: g.center,
            radius,
            fill: Some(radial(
                g,
                radius - 5.0 * g.scale,
                radius,
                Rgba::WHITE,
                defaults::INNER_GRADIENT_END,
            )),
            stroke: Some(Stroke::new(defaults::INNER_STROKE, 1.0)),
        });
    }
}

fn draw_body_band(g: &ChartGeometry, surface: &mut dyn Surface) {
    surface.draw(DrawCommand::Circle {
        center: g.center,
        radius: g.body_ring_radius,
        fill: Some(Paint::Solid(defaults::BODY_RING_FILL)),
        stroke: Some(Stroke::new(defaults::BODY_RING_STROKE, 1.0)),
    });
    surface.draw(DrawCommand::stroked_circle(
        g.center,
        g.body_ring_radius - g.body_ring_width,
        Stroke::new(defaults::BODY_RING_STROKE, 1.0),
    ));
}

fn draw_house_band(g: &ChartGeometry, surface: &mut dyn Surface) {
    let outer = g.house_ring_radius;
    let inner = g.house_ring_inner();
    surface.draw(DrawCommand::Annulus {
        center: g.center,
        outer,
        inner,
        fill: radial(g, inner, outer, defaults::INNER_GRADIENT_END, defaults::OUTER_GRADIENT_END),
    });
    for radius in [outer, inner] {
        surface.draw(DrawCommand::stroked_circle(
            g.center,
            radius,
            Stroke::new(defaults::HOUSE_RING_STROKE, 2.0),
        ));
    }

    // one divider per sign boundary across the house band
    for sign in ZodiacSign::ALL {
        let from = g.point(inner, sign.start());
        let to = g.point(outer, sign.start());
        let paint = Paint::Linear {
            from,
            to,
            start: Rgba::rgba(102, 102, 102, 0.3),
            end: Rgba::rgba(102, 102, 102, 0.6),
        };
        surface.draw(DrawCommand::line(from, to, Stroke::new(paint, 0.8)));
    }
}

fn draw_sign(g: &ChartGeometry, sign: ZodiacSign, opacity: f64, surface: &mut dyn Surface) {
    surface.draw(DrawCommand::Wedge {
        center: g.center,
        radius: g.outer_radius,
        start: sign.start(),
        end: sign.start().offset(30.0),
        fill: Paint::Solid(sign.segment_color().with_alpha(opacity)),
    });

    let mid = sign.midpoint();
    let style = TextStyle::new(24.0 * g.scale, defaults::GLYPH_TEXT)
        .bold()
        .with_shadow(Shadow {
            color: defaults::SHADOW,
            blur: 3.0,
            offset: DVec2::ONE,
        });
    surface.draw(DrawCommand::rotated_text(
        g.point(g.sign_glyph_radius(), mid),
        upright_rotation(mid),
        0.0,
        sign.glyph(),
        style,
    ));

    for deg in (0..30).step_by(TICK_STEP) {
        let lon = sign.start().offset(deg as f64);
        let (len, stroke) = tick(deg, g.scale);
        surface.draw(DrawCommand::line(
            g.point(g.outer_radius, lon),
            g.point(g.outer_radius - len, lon),
            stroke,
        ));
        if deg == 0 {
            draw_degree_label(g, lon, surface);
        }
    }
}

/// Length and stroke of the tick `deg` degrees into a sign.
fn tick(deg: usize, scale: f64) -> (f64, Stroke) {
    let len = match deg {
        0 => 15.0,
        d if d % 10 == 0 => 10.0,
        _ => 5.0,
    };
    let stroke = if deg == 0 {
        Stroke::new(defaults::LABEL_TEXT, 2.0)
    } else {
        Stroke::new(defaults::FAINT_TEXT, 0.5)
    };
    (len * scale, stroke)
}

/// Sign boundaries are labeled with their absolute longitude.
fn draw_degree_label(g: &ChartGeometry, lon: Longitude, surface: &mut dyn Surface) {
    let style = TextStyle::new(12.0 * g.scale, defaults::LABEL_TEXT).bold();
    surface.draw(DrawCommand::rotated_text(
        g.point(g.degree_label_radius(), lon),
        upright_rotation(lon),
        0.0,
        format!("{}", lon.degrees().round() as i64),
        style,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::render::RenderOptions;
    use crate::scene::Scene;

    fn draw(options: &RenderOptions) -> Scene {
        let chart = ChartData::default();
        let geometry = ChartGeometry::new(options);
        let ctx = LayerContext {
            chart: &chart,
            geometry: &geometry,
            options,
        };
        let mut scene = Scene::new();
        RingLayer.draw(&ctx, &mut scene);
        scene
    }

    #[test]
    fn twelve_wedges_and_glyphs() {
        let scene = draw(&RenderOptions::default());
        let wedges = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Wedge { .. }))
            .count();
        assert_eq!(wedges, 12);
        let glyphs: String = scene
            .texts()
            .filter(|t| t.style.size == 24.0)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(glyphs, "♈♉♊♋♌♍♎♏♐♑♒♓");
    }

    #[test]
    fn ticks_every_five_degrees() {
        let scene = draw(&RenderOptions::default());
        let lines = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // 12 house dividers plus 6 ticks per sign
        assert_eq!(lines, 12 + 12 * 6);
    }

    #[test]
    fn boundary_labels_are_absolute() {
        let scene = draw(&RenderOptions::default());
        let labels: Vec<&str> = scene
            .texts()
            .filter(|t| t.style.size == 12.0)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(labels.first(), Some(&"0"));
        assert_eq!(labels.last(), Some(&"330"));
        assert_eq!(labels.len(), 12);
    }

    #[test]
    fn tick_lengths() {
        assert_eq!(tick(0, 1.0).0, 15.0);
        assert_eq!(tick(10, 1.0).0, 10.0);
        assert_eq!(tick(20, 1.0).0, 10.0);
        assert_eq!(tick(5, 1.0).0, 5.0);
        assert_eq!(tick(25, 2.0).0, 10.0);
    }

    #[test]
    fn segment_opacity_applies_to_wedges() {
        let scene = draw(&RenderOptions {
            segment_opacity: 0.25,
            ..RenderOptions::default()
        });
        for cmd in scene.commands() {
            if let DrawCommand::Wedge { fill: Paint::Solid(c), .. } = cmd {
                assert_eq!(c.a, 0.25);
            }
        }
    }
}
