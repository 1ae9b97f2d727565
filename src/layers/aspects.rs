//! Aspect lines between bodies, drawn one tier per layer.
//!
//! Two [`AspectLayer`]s run in [`AspectTier::ORDER`], so every major aspect is
//! stroked after (on top of) every minor one. Inside a tier, aspects keep
//! their input order.

use std::fmt;

use super::{Layer, LayerContext};
use crate::chart::{AspectEntry, ChartData};
use crate::log::{debug, warn};
use crate::scene::{DrawCommand, Stroke, Surface};
use crate::tables::{AspectTier, AspectType};
use crate::types::Longitude;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectLayer {
    pub tier: AspectTier,
}

/// An aspect ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAspect {
    pub kind: AspectType,
    pub from: Longitude,
    pub to: Longitude,
}

/// Why an aspect entry produced no line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AspectSkip {
    /// Key does not split into two body names.
    MalformedKey,
    /// Key names a body absent from the positions.
    MissingBody(String),
    /// The body's longitude is NaN or infinite.
    InvalidLongitude(String),
    /// No label in `aspectsDetails`.
    Unlabeled,
    UnknownType(String),
}

impl fmt::Display for AspectSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectSkip::MalformedKey => write!(f, "key is not of the form `A-B`"),
            AspectSkip::MissingBody(name) => write!(f, "no position for `{name}`"),
            AspectSkip::InvalidLongitude(name) => write!(f, "longitude of `{name}` is not finite"),
            AspectSkip::Unlabeled => write!(f, "no aspect type given"),
            AspectSkip::UnknownType(label) => write!(f, "unknown aspect type `{label}`"),
        }
    }
}

/// Look up both bodies and the aspect type of one entry.
pub fn resolve_aspect(chart: &ChartData, entry: &AspectEntry<'_>) -> Result<ResolvedAspect, AspectSkip> {
    let (a, b) = entry.bodies().ok_or(AspectSkip::MalformedKey)?;
    let label = entry.label.ok_or(AspectSkip::Unlabeled)?;
    let kind: AspectType = label
        .parse()
        .map_err(|_| AspectSkip::UnknownType(label.to_string()))?;
    let locate = |name: &str| {
        let position = chart
            .position(name)
            .ok_or_else(|| AspectSkip::MissingBody(name.to_string()))?;
        Longitude::try_new(position.longitude)
            .map_err(|_| AspectSkip::InvalidLongitude(name.to_string()))
    };
    Ok(ResolvedAspect {
        kind,
        from: locate(a)?,
        to: locate(b)?,
    })
}

impl Layer for AspectLayer {
    fn name(&self) -> &'static str {
        match self.tier {
            AspectTier::Minor => "aspects-minor",
            AspectTier::Major => "aspects-major",
        }
    }

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface) {
        let g = ctx.geometry;
        let radius = g.aspect_radius();
        // skips are reported once, by the first tier
        let report = self.tier == AspectTier::ORDER[0];

        for entry in ctx.chart.aspect_entries() {
            let aspect = match resolve_aspect(ctx.chart, &entry) {
                Ok(aspect) => aspect,
                Err(skip) => {
                    if report {
                        match skip {
                            AspectSkip::UnknownType(_) | AspectSkip::Unlabeled => {
                                debug!(key = entry.key, reason = %skip, "aspect not drawn");
                            }
                            AspectSkip::MalformedKey
                            | AspectSkip::MissingBody(_)
                            | AspectSkip::InvalidLongitude(_) => {
                                warn!(key = entry.key, reason = %skip, "aspect not drawn");
                            }
                        }
                    }
                    continue;
                }
            };
            if aspect.kind.tier() != self.tier {
                continue;
            }
            let style = aspect.kind.style();
            surface.draw(DrawCommand::line(
                g.point(radius, aspect.from),
                g.point(radius, aspect.to),
                Stroke::new(style.color, style.width).dashed(style.dash),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::BodyPosition;
    use crate::geometry::ChartGeometry;
    use crate::render::RenderOptions;
    use crate::scene::{Paint, Scene};
    use crate::types::Rgba;

    fn chart(aspects: &[(&str, f64, &str)]) -> ChartData {
        ChartData {
            planet_positions: [("Sun", 10.0), ("Moon", 100.0), ("Mars", 190.0)]
                .into_iter()
                .map(|(n, lon)| (n, BodyPosition::at(lon)))
                .collect(),
            aspects: aspects.iter().map(|&(k, a, _)| (k, a)).collect(),
            aspects_details: aspects.iter().map(|&(k, _, l)| (k, l.to_string())).collect(),
            ..ChartData::default()
        }
    }

    fn draw_all(chart: &ChartData) -> Scene {
        let options = RenderOptions::default();
        let geometry = ChartGeometry::new(&options);
        let ctx = LayerContext {
            chart,
            geometry: &geometry,
            options: &options,
        };
        let mut scene = Scene::new();
        for tier in AspectTier::ORDER {
            AspectLayer { tier }.draw(&ctx, &mut scene);
        }
        scene
    }

    fn colors(scene: &Scene) -> Vec<Rgba> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line {
                    stroke:
                        Stroke {
                            paint: Paint::Solid(color),
                            ..
                        },
                    ..
                } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn major_after_minor() {
        // opposition listed first, square second
        let chart = chart(&[("Sun-Mars", 180.0, "opposition"), ("Sun-Moon", 90.0, "square")]);
        let scene = draw_all(&chart);
        assert_eq!(
            colors(&scene),
            [AspectType::Square.style().color, AspectType::Opposition.style().color]
        );
    }

    #[test]
    fn conjunction_drawn_after_square() {
        let chart = chart(&[("Sun-Moon", 2.0, "conjunction"), ("Moon-Mars", 90.0, "square")]);
        let scene = draw_all(&chart);
        assert_eq!(
            colors(&scene),
            [AspectType::Square.style().color, AspectType::Conjunction.style().color]
        );
    }

    #[test]
    fn unknown_type_and_missing_body_draw_nothing() {
        let chart = chart(&[
            ("Sun-Moon", 150.0, "quincunx"),
            ("Sun-Pluto", 60.0, "sextile"),
            ("Moon-Mars", 90.0, "trine"),
        ]);
        let scene = draw_all(&chart);
        assert_eq!(scene.len(), 1);
        assert_eq!(colors(&scene), [AspectType::Trine.style().color]);
    }

    #[test]
    fn resolve_reasons() {
        let chart = chart(&[]);
        let entry = |key, label| AspectEntry {
            key,
            angle: 0.0,
            label,
        };
        assert_eq!(
            resolve_aspect(&chart, &entry("SunMoon", Some("trine"))),
            Err(AspectSkip::MalformedKey)
        );
        assert_eq!(
            resolve_aspect(&chart, &entry("Sun-Moon", None)),
            Err(AspectSkip::Unlabeled)
        );
        assert_eq!(
            resolve_aspect(&chart, &entry("Sun-Vesta", Some("trine"))),
            Err(AspectSkip::MissingBody("Vesta".into()))
        );
        let ok = resolve_aspect(&chart, &entry("Sun-Moon", Some("square"))).unwrap();
        assert_eq!(ok.kind, AspectType::Square);
        assert_eq!(ok.to.degrees(), 100.0);
    }

    #[test]
    fn non_finite_longitude_is_skipped() {
        let mut chart = chart(&[("Sun-Venus", 120.0, "trine"), ("Sun-Moon", 90.0, "square")]);
        chart.planet_positions.insert("Venus", BodyPosition::at(f64::NAN));
        let entry = AspectEntry {
            key: "Venus-Sun",
            angle: 120.0,
            label: Some("trine"),
        };
        assert_eq!(
            resolve_aspect(&chart, &entry),
            Err(AspectSkip::InvalidLongitude("Venus".into()))
        );
        let scene = draw_all(&chart);
        assert_eq!(colors(&scene), [AspectType::Square.style().color]);
    }

    #[test]
    fn dashes_follow_style() {
        let chart = chart(&[("Sun-Moon", 60.0, "sextile")]);
        let scene = draw_all(&chart);
        match &scene.commands()[0] {
            DrawCommand::Line { stroke, .. } => {
                assert_eq!(stroke.dash, Some([2.0, 2.0]));
                assert_eq!(stroke.width, 1.0);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }
}
