//! Typed draw instructions and the surfaces that consume them.
//!
//! Layers never touch a backend directly. They emit [`DrawCommand`]s into a
//! [`Surface`]; [`Scene`] records them for inspection and
//! [`crate::render::svg::SvgSurface`] turns them into an SVG document.

use std::ops::Range;

use glam::DVec2;

use crate::types::{Longitude, Rgba};

/// How an area or a stroke is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Gradient along the segment `from → to`.
    Linear {
        from: DVec2,
        to: DVec2,
        start: Rgba,
        end: Rgba,
    },
    /// Gradient between two concentric circles.
    Radial {
        center: DVec2,
        inner_radius: f64,
        outer_radius: f64,
        start: Rgba,
        end: Rgba,
    },
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    /// Dash and gap lengths; `None` is a solid line.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f64) -> Stroke {
        Stroke {
            paint: paint.into(),
            width,
            dash: None,
        }
    }

    pub fn dashed(self, dash: Option<[f64; 2]>) -> Stroke {
        Stroke { dash, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Text runs left to right from the anchor point.
    Start,
    #[default]
    Middle,
    /// Text runs right to left, ending at the anchor point.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset: DVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub weight: Weight,
    pub color: Rgba,
    pub anchor: Anchor,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgba) -> TextStyle {
        TextStyle {
            size,
            weight: Weight::Normal,
            color,
            anchor: Anchor::Middle,
            shadow: None,
        }
    }

    pub fn bold(self) -> TextStyle {
        TextStyle {
            weight: Weight::Bold,
            ..self
        }
    }

    pub fn anchored(self, anchor: Anchor) -> TextStyle {
        TextStyle { anchor, ..self }
    }

    pub fn with_shadow(self, shadow: Shadow) -> TextStyle {
        TextStyle {
            shadow: Some(shadow),
            ..self
        }
    }
}

/// A text label, vertically centered on its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub at: DVec2,
    /// Rotation around `at`, in radians.
    pub rotation: f64,
    /// Shift along the rotated y axis, for stacked labels.
    pub dy: f64,
    pub content: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Paint the whole surface.
    Fill { color: Rgba },
    Circle {
        center: DVec2,
        radius: f64,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
    },
    /// Filled band between two radii.
    Annulus {
        center: DVec2,
        outer: f64,
        inner: f64,
        fill: Paint,
    },
    /// Pie slice from the center out to `radius`, clockwise from `start` to `end`.
    Wedge {
        center: DVec2,
        radius: f64,
        start: Longitude,
        end: Longitude,
        fill: Paint,
    },
    Line {
        from: DVec2,
        to: DVec2,
        stroke: Stroke,
    },
    Text(TextRun),
}

impl DrawCommand {
    pub fn line(from: DVec2, to: DVec2, stroke: Stroke) -> DrawCommand {
        DrawCommand::Line { from, to, stroke }
    }

    pub fn stroked_circle(center: DVec2, radius: f64, stroke: Stroke) -> DrawCommand {
        DrawCommand::Circle {
            center,
            radius,
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn text(at: DVec2, content: impl Into<String>, style: TextStyle) -> DrawCommand {
        DrawCommand::Text(TextRun {
            at,
            rotation: 0.0,
            dy: 0.0,
            content: content.into(),
            style,
        })
    }

    pub fn rotated_text(
        at: DVec2,
        rotation: f64,
        dy: f64,
        content: impl Into<String>,
        style: TextStyle,
    ) -> DrawCommand {
        DrawCommand::Text(TextRun {
            at,
            rotation,
            dy,
            content: content.into(),
            style,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Fill { .. } => "fill",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Annulus { .. } => "annulus",
            DrawCommand::Wedge { .. } => "wedge",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Text(_) => "text",
        }
    }
}

/// A drawing target owned by one render call at a time.
pub trait Surface {
    /// Reset to an empty surface of the given size.
    fn clear(&mut self, width: f64, height: f64);

    fn draw(&mut self, command: DrawCommand);

    /// Mark the start of a named layer. Backends may group what follows.
    fn begin_layer(&mut self, _name: &'static str) {}

    fn end_layer(&mut self) {}
}

/// The commands one layer issued, by index into [`Scene::commands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpan {
    pub name: &'static str,
    pub range: Range<usize>,
}

/// A surface that records every command in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    commands: Vec<DrawCommand>,
    layers: Vec<LayerSpan>,
    open: Option<(&'static str, usize)>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn layers(&self) -> &[LayerSpan] {
        &self.layers
    }

    /// Commands issued by every layer with this name, in order.
    pub fn layer(&self, name: &str) -> Vec<&DrawCommand> {
        self.layers
            .iter()
            .filter(|span| span.name == name)
            .flat_map(|span| &self.commands[span.range.clone()])
            .collect()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for Scene {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.layers.clear();
        self.open = None;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn begin_layer(&mut self, name: &'static str) {
        self.end_layer();
        self.open = Some((name, self.commands.len()));
    }

    fn end_layer(&mut self) {
        if let Some((name, start)) = self.open.take() {
            self.layers.push(LayerSpan {
                name,
                range: start..self.commands.len(),
            });
        }
    }
}
