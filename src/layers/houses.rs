//! House cusps: a line across the house band per cusp, with the house number
//! (or angle name) and the cusp degree set just clockwise of the line.

use std::borrow::Cow;

use super::{Layer, LayerContext};
use crate::geometry::{ChartGeometry, label_rotation};
use crate::log::warn;
use crate::render::defaults;
use crate::scene::{DrawCommand, Paint, Stroke, Surface, TextStyle};
use crate::types::{Longitude, Rgba};

/// How far clockwise of the cusp the label sits, in degrees.
const LABEL_LEAD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseLayer;

impl Layer for HouseLayer {
    fn name(&self) -> &'static str {
        "houses"
    }

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface) {
        for (idx, &cusp) in ctx.chart.houses.iter().enumerate() {
            let number = idx + 1;
            match Longitude::try_new(cusp) {
                Ok(lon) => draw_house(ctx.geometry, number, lon, surface),
                Err(_err) => {
                    warn!(house = number, error = %_err, "skipping house with invalid cusp");
                }
            }
        }
    }
}

/// Label of a house: the four angles by name, the rest by number.
pub fn house_label(number: usize) -> Cow<'static, str> {
    match number {
        1 => Cow::Borrowed("ASC"),
        4 => Cow::Borrowed("IC"),
        7 => Cow::Borrowed("DSC"),
        10 => Cow::Borrowed("MC"),
        n => Cow::Owned(n.to_string()),
    }
}

fn draw_house(g: &ChartGeometry, number: usize, cusp: Longitude, surface: &mut dyn Surface) {
    let outer = g.house_ring_radius;
    let width = g.house_ring_width;

    if number == 1 {
        let contour = Stroke::new(defaults::LABEL_TEXT, 1.5);
        surface.draw(DrawCommand::stroked_circle(g.center, outer, contour));
        surface.draw(DrawCommand::stroked_circle(g.center, outer - width * 1.7, contour));
    }

    let from = g.point(outer - width * 1.2, cusp);
    let to = g.point(outer, cusp);
    let paint = Paint::Linear {
        from,
        to,
        start: Rgba::rgba(0, 0, 0, 0.4),
        end: Rgba::rgba(0, 0, 0, 0.8),
    };
    // every third house closes a quadrant
    let line_width = if number % 3 == 0 { 1.5 } else { 0.8 };
    surface.draw(DrawCommand::line(from, to, Stroke::new(paint, line_width)));

    let label_lon = cusp.offset(LABEL_LEAD);
    let at = g.point(outer - width * 0.9, label_lon);
    let rotation = label_rotation(label_lon);
    surface.draw(DrawCommand::rotated_text(
        at,
        rotation,
        0.0,
        house_label(number),
        TextStyle::new(14.0 * g.scale, defaults::LABEL_TEXT).bold(),
    ));
    surface.draw(DrawCommand::rotated_text(
        at,
        rotation,
        14.0 * g.scale,
        cusp.degree_minute().to_string(),
        TextStyle::new(12.0 * g.scale, defaults::MUTED_TEXT),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::render::RenderOptions;
    use crate::scene::Scene;

    fn draw(houses: Vec<f64>) -> Scene {
        let chart = ChartData {
            houses,
            ..ChartData::default()
        };
        let options = RenderOptions::default();
        let geometry = ChartGeometry::new(&options);
        let ctx = LayerContext {
            chart: &chart,
            geometry: &geometry,
            options: &options,
        };
        let mut scene = Scene::new();
        HouseLayer.draw(&ctx, &mut scene);
        scene
    }

    #[test]
    fn angle_labels() {
        let labels: Vec<_> = (1..=12).map(house_label).collect();
        assert_eq!(
            labels,
            ["ASC", "2", "3", "IC", "5", "6", "DSC", "8", "9", "MC", "11", "12"]
        );
    }

    #[test]
    fn contours_drawn_once() {
        let scene = draw((0..12).map(|i| i as f64 * 30.0 + 7.5).collect());
        let circles = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 2);
        assert_eq!(scene.texts().count(), 24);
    }

    #[test]
    fn cusp_degree_text() {
        let scene = draw(vec![105.42, 127.87]);
        let texts: Vec<_> = scene.texts().map(|t| t.content.as_str()).collect();
        insta::assert_snapshot!(texts.join(" | "), @"ASC | 105°25' | 2 | 127°52'");
    }

    #[test]
    fn quadrant_lines_are_heavier() {
        let scene = draw((0..12).map(|i| i as f64 * 30.0).collect());
        let widths: Vec<f64> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { stroke, .. } => Some(stroke.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths[2], 1.5);
        assert_eq!(widths[0], 0.8);
        assert_eq!(widths[11], 1.5);
    }

    #[test]
    fn invalid_cusp_is_skipped() {
        let scene = draw(vec![f64::NAN, 40.0]);
        let texts: Vec<_> = scene.texts().map(|t| t.content.as_str()).collect();
        assert_eq!(texts, ["2", "40°0'"]);
    }
}
