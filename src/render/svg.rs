//! SVG generation
//!
//! [`SvgSurface`] is the SVG backend for draw commands. Gradients and drop
//! shadows become `<defs>` entries with ids numbered in draw order, so the
//! same command sequence always serializes to the same bytes.

use std::fmt::Write as _;

use glam::DVec2;
use svg::Document;
use svg::node::element::{
    Circle, Definitions, Filter, FilterEffectDropShadow, Group, Line, LinearGradient, Path,
    RadialGradient, Rectangle, Stop, Text,
};

use super::RenderOptions;
use super::defaults;
use crate::scene::{Anchor, DrawCommand, Paint, Shadow, Stroke, Surface, TextRun, Weight};
use crate::types::{Longitude, Rgba};

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // float noise from sin/cos around zero
    if value.abs() < 1e-9 {
        return "0".to_string();
    }

    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if decimals == 0 {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn anchor_name(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    }
}

/// SVG backend. Each layer becomes one `<g>`.
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    css_classes: bool,
    defs: Definitions,
    groups: Vec<Group>,
    current: Option<Group>,
    next_gradient: usize,
    shadows: Vec<Shadow>,
}

impl SvgSurface {
    pub fn new(options: &RenderOptions) -> SvgSurface {
        SvgSurface {
            width: options.size,
            height: options.size,
            css_classes: options.css_classes,
            defs: Definitions::new(),
            groups: Vec::new(),
            current: None,
            next_gradient: 0,
            shadows: Vec::new(),
        }
    }

    /// Assemble the document drawn so far.
    pub fn document(&self) -> Document {
        let mut doc = Document::new()
            .set("width", fmt_num(self.width))
            .set("height", fmt_num(self.height))
            .set(
                "viewBox",
                format!("0 0 {} {}", fmt_num(self.width), fmt_num(self.height)),
            )
            .set("font-family", defaults::FONT_FAMILY)
            .add(self.defs.clone());
        for group in self.groups.iter().chain(self.current.as_ref()) {
            doc = doc.add(group.clone());
        }
        doc
    }

    pub fn finish(mut self) -> String {
        self.end_layer();
        self.document().to_string()
    }

    fn push<N>(&mut self, node: N)
    where
        N: Into<Box<dyn svg::Node>>,
    {
        let group = self.current.take().unwrap_or_default();
        self.current = Some(group.add(node));
    }

    /// `url(#id)` for gradients, the color itself otherwise, plus an opacity
    /// when the color is translucent.
    fn paint_ref(&mut self, paint: &Paint) -> (String, Option<f64>) {
        match *paint {
            Paint::Solid(color) => {
                let opacity = (!color.is_opaque()).then_some(color.a);
                (color.to_hex_string(), opacity)
            }
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => {
                let id = self.gradient_id();
                let gradient = LinearGradient::new()
                    .set("id", id.as_str())
                    .set("gradientUnits", "userSpaceOnUse")
                    .set("x1", fmt_num(from.x))
                    .set("y1", fmt_num(from.y))
                    .set("x2", fmt_num(to.x))
                    .set("y2", fmt_num(to.y))
                    .add(stop(0.0, start))
                    .add(stop(1.0, end));
                self.defs = std::mem::take(&mut self.defs).add(gradient);
                (format!("url(#{id})"), None)
            }
            Paint::Radial {
                center,
                inner_radius,
                outer_radius,
                start,
                end,
            } => {
                let id = self.gradient_id();
                // both circles share a center, so the inner radius is just the first stop
                let first = if outer_radius > 0.0 {
                    (inner_radius / outer_radius).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let gradient = RadialGradient::new()
                    .set("id", id.as_str())
                    .set("gradientUnits", "userSpaceOnUse")
                    .set("cx", fmt_num(center.x))
                    .set("cy", fmt_num(center.y))
                    .set("r", fmt_num(outer_radius))
                    .add(stop(first, start))
                    .add(stop(1.0, end));
                self.defs = std::mem::take(&mut self.defs).add(gradient);
                (format!("url(#{id})"), None)
            }
        }
    }

    fn gradient_id(&mut self) -> String {
        let id = format!("g{}", self.next_gradient);
        self.next_gradient += 1;
        id
    }

    /// Id of the drop-shadow filter for `shadow`, defined on first use.
    fn shadow_id(&mut self, shadow: Shadow) -> String {
        if let Some(idx) = self.shadows.iter().position(|s| *s == shadow) {
            return format!("shadow{idx}");
        }
        let id = format!("shadow{}", self.shadows.len());
        self.shadows.push(shadow);
        let mut effect = FilterEffectDropShadow::new()
            .set("dx", fmt_num(shadow.offset.x))
            .set("dy", fmt_num(shadow.offset.y))
            .set("stdDeviation", fmt_num(shadow.blur / 2.0))
            .set("flood-color", shadow.color.to_hex_string());
        if !shadow.color.is_opaque() {
            effect = effect.set("flood-opacity", fmt_num(shadow.color.a));
        }
        let filter = Filter::new()
            .set("id", id.as_str())
            .set("x", "-50%")
            .set("y", "-50%")
            .set("width", "200%")
            .set("height", "200%")
            .add(effect);
        self.defs = std::mem::take(&mut self.defs).add(filter);
        id
    }

    fn fill_attrs<N: svg::Node>(&mut self, mut node: N, fill: Option<&Paint>) -> N {
        match fill {
            Some(paint) => {
                let (value, opacity) = self.paint_ref(paint);
                node.assign("fill", value);
                if let Some(a) = opacity {
                    node.assign("fill-opacity", fmt_num(a));
                }
            }
            None => node.assign("fill", "none"),
        }
        node
    }

    fn stroke_attrs<N: svg::Node>(&mut self, mut node: N, stroke: Option<&Stroke>) -> N {
        if let Some(stroke) = stroke {
            let (value, opacity) = self.paint_ref(&stroke.paint);
            node.assign("stroke", value);
            if let Some(a) = opacity {
                node.assign("stroke-opacity", fmt_num(a));
            }
            node.assign("stroke-width", fmt_num(stroke.width));
            if let Some([dash, gap]) = stroke.dash {
                node.assign("stroke-dasharray", format!("{} {}", fmt_num(dash), fmt_num(gap)));
            }
        }
        node
    }

    fn text(&mut self, run: &TextRun) -> Text {
        let style = &run.style;
        let mut text = Text::new(run.content.as_str())
            .set("font-size", fmt_num(style.size))
            .set("text-anchor", anchor_name(style.anchor))
            .set("dominant-baseline", "middle");
        if style.weight == Weight::Bold {
            text = text.set("font-weight", "bold");
        }
        if run.rotation == 0.0 {
            text = text
                .set("x", fmt_num(run.at.x))
                .set("y", fmt_num(run.at.y + run.dy));
        } else {
            text = text.set("x", "0").set("y", fmt_num(run.dy)).set(
                "transform",
                format!(
                    "translate({} {}) rotate({})",
                    fmt_num(run.at.x),
                    fmt_num(run.at.y),
                    fmt_num(run.rotation.to_degrees())
                ),
            );
        }
        if let Some(shadow) = style.shadow {
            let id = self.shadow_id(shadow);
            text = text.set("filter", format!("url(#{id})"));
        }
        self.fill_attrs(text, Some(&Paint::Solid(style.color)))
    }
}

fn stop(offset: f64, color: Rgba) -> Stop {
    let stop = Stop::new()
        .set("offset", fmt_num(offset))
        .set("stop-color", color.to_hex_string());
    if color.is_opaque() {
        stop
    } else {
        stop.set("stop-opacity", fmt_num(color.a))
    }
}

fn point(d: &mut String, cmd: char, p: DVec2) {
    let _ = write!(d, "{cmd}{},{} ", fmt_num(p.x), fmt_num(p.y));
}

/// Two opposite half-circle arcs, so even-odd filling can punch holes.
fn full_circle(d: &mut String, center: DVec2, r: f64) {
    let right = center + DVec2::new(r, 0.0);
    let left = center - DVec2::new(r, 0.0);
    let r = fmt_num(r);
    point(d, 'M', right);
    let _ = write!(d, "A{r},{r} 0 1 1 {},{} ", fmt_num(left.x), fmt_num(left.y));
    let _ = write!(d, "A{r},{r} 0 1 1 {},{} Z ", fmt_num(right.x), fmt_num(right.y));
}

/// Path of a pie slice swept clockwise from `start` to `end`.
fn wedge_path(center: DVec2, radius: f64, start: Longitude, end: Longitude) -> String {
    let mut d = String::new();
    let sweep = (end.degrees() - start.degrees()).rem_euclid(360.0);
    if sweep == 0.0 {
        full_circle(&mut d, center, radius);
        return d.trim_end().to_string();
    }
    let from = crate::geometry::to_point(center, radius, start);
    let to = crate::geometry::to_point(center, radius, end);
    let large = if sweep > 180.0 { 1 } else { 0 };
    point(&mut d, 'M', center);
    point(&mut d, 'L', from);
    let r = fmt_num(radius);
    let _ = write!(d, "A{r},{r} 0 {large} 1 {},{} Z", fmt_num(to.x), fmt_num(to.y));
    d
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.defs = Definitions::new();
        self.groups.clear();
        self.current = None;
        self.next_gradient = 0;
        self.shadows.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Fill { color } => {
                let rect = Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", fmt_num(self.width))
                    .set("height", fmt_num(self.height));
                let rect = self.fill_attrs(rect, Some(&Paint::Solid(color)));
                self.push(rect);
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let circle = Circle::new()
                    .set("cx", fmt_num(center.x))
                    .set("cy", fmt_num(center.y))
                    .set("r", fmt_num(radius));
                let circle = self.fill_attrs(circle, fill.as_ref());
                let circle = self.stroke_attrs(circle, stroke.as_ref());
                self.push(circle);
            }
            DrawCommand::Annulus {
                center,
                outer,
                inner,
                fill,
            } => {
                let mut d = String::new();
                full_circle(&mut d, center, outer);
                full_circle(&mut d, center, inner);
                let path = Path::new()
                    .set("d", d.trim_end())
                    .set("fill-rule", "evenodd");
                let path = self.fill_attrs(path, Some(&fill));
                self.push(path);
            }
            DrawCommand::Wedge {
                center,
                radius,
                start,
                end,
                fill,
            } => {
                let path = Path::new().set("d", wedge_path(center, radius, start, end));
                let path = self.fill_attrs(path, Some(&fill));
                self.push(path);
            }
            DrawCommand::Line { from, to, stroke } => {
                let line = Line::new()
                    .set("x1", fmt_num(from.x))
                    .set("y1", fmt_num(from.y))
                    .set("x2", fmt_num(to.x))
                    .set("y2", fmt_num(to.y));
                let line = self.stroke_attrs(line, Some(&stroke));
                self.push(line);
            }
            DrawCommand::Text(run) => {
                let text = self.text(&run);
                self.push(text);
            }
        }
    }

    fn begin_layer(&mut self, name: &'static str) {
        self.end_layer();
        let group = if self.css_classes {
            Group::new().set("class", name)
        } else {
            Group::new()
        };
        self.current = Some(group);
    }

    fn end_layer(&mut self) {
        if let Some(group) = self.current.take() {
            self.groups.push(group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextStyle;
    use glam::dvec2;

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(400.0), "400");
        assert_eq!(fmt_num(241.99999999999997), "242");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-1e-15), "0");
        assert_eq!(fmt_num(123.456789), "123.457");
        assert_eq!(fmt_num(1_200_000.0), "1200000");
    }

    #[test]
    fn wedge_arcs_clockwise() {
        let d = wedge_path(dvec2(400.0, 400.0), 100.0, Longitude::new(0.0), Longitude::new(90.0));
        assert_eq!(d, "M400,400 L400,300 A100,100 0 0 1 500,400 Z");
    }

    #[test]
    fn wedge_wraps_past_zero() {
        let d = wedge_path(dvec2(0.0, 0.0), 10.0, Longitude::new(330.0), Longitude::new(0.0));
        assert!(d.ends_with("A10,10 0 0 1 0,-10 Z"), "{d}");
    }

    #[test]
    fn translucent_colors_use_opacity() {
        let mut surface = SvgSurface::new(&RenderOptions::default());
        surface.clear(100.0, 100.0);
        surface.begin_layer("test");
        surface.draw(DrawCommand::line(
            dvec2(0.0, 0.0),
            dvec2(10.0, 10.0),
            Stroke::new(Rgba::rgba(255, 0, 0, 0.7), 2.0).dashed(Some([5.0, 3.0])),
        ));
        let svg = surface.finish();
        assert!(svg.contains(r##"stroke="#ff0000""##), "{svg}");
        assert!(svg.contains(r#"stroke-opacity="0.7""#), "{svg}");
        assert!(svg.contains(r#"stroke-dasharray="5 3""#), "{svg}");
        assert!(svg.contains(r#"<g class="test">"#), "{svg}");
    }

    #[test]
    fn shadows_are_shared() {
        let mut surface = SvgSurface::new(&RenderOptions::default());
        surface.clear(100.0, 100.0);
        let shadow = Shadow {
            color: defaults::SHADOW,
            blur: 2.0,
            offset: DVec2::ONE,
        };
        for label in ["a", "b"] {
            surface.draw(DrawCommand::text(
                dvec2(1.0, 1.0),
                label,
                TextStyle::new(10.0, Rgba::BLACK).with_shadow(shadow),
            ));
        }
        let svg = surface.finish();
        assert_eq!(svg.matches("<filter").count(), 1);
        assert_eq!(svg.matches("url(#shadow0)").count(), 2);
    }

    #[test]
    fn rotated_text_uses_transform() {
        let mut surface = SvgSurface::new(&RenderOptions::default());
        surface.clear(100.0, 100.0);
        surface.draw(DrawCommand::rotated_text(
            dvec2(50.0, 20.0),
            std::f64::consts::FRAC_PI_2,
            14.0,
            "ASC",
            TextStyle::new(14.0, Rgba::BLACK).bold(),
        ));
        let svg = surface.finish();
        assert!(svg.contains(r#"transform="translate(50 20) rotate(90)""#), "{svg}");
        assert!(svg.contains(r#"y="14""#), "{svg}");
        let label = regex_lite::Regex::new(r">\s*ASC\s*</text>").unwrap();
        assert!(label.is_match(&svg), "{svg}");
    }
}
