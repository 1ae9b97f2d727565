//! Body placement: grouping, fan-out offsets and per-body annotations.
//!
//! Bodies are bucketed by their 30° band. Inside a bucket they are sorted by
//! longitude and fanned out along the offset direction so crowded signs stay
//! legible; a thin connector leads back to the exact longitude.
//!
//! Bodies at 29° and 31° land in different buckets and get no mutual offset.
//! That is a known limit of fixed bins.

use std::collections::BTreeMap;

use glam::{DVec2, dvec2};

use super::{Layer, LayerContext};
use crate::chart::ChartData;
use crate::geometry::{ChartGeometry, offset_direction};
use crate::log::{trace, warn};
use crate::render::defaults;
use crate::scene::{Anchor, DrawCommand, Paint, Shadow, Stroke, Surface, TextStyle};
use crate::tables::{Dignity, ZodiacSign, dignity, glyph_for};
use crate::types::{Longitude, Rgba};

/// Bodies drawn with latitude and speed only in groups smaller than this.
const DETAIL_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLayer;

/// One body inside a [`PositionGroup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMember<'a> {
    pub name: &'a str,
    pub longitude: Longitude,
}

/// Bodies sharing one 30° bucket, sorted by longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionGroup<'a> {
    /// Start of the bucket, `floor(lon / 30) * 30`.
    pub bucket: u16,
    pub members: Vec<GroupMember<'a>>,
}

/// Bucket every body with a finite longitude, buckets in ascending order.
///
/// The sort is stable, so equal longitudes keep input order.
pub fn group_bodies(chart: &ChartData) -> Vec<PositionGroup<'_>> {
    let mut buckets: BTreeMap<u16, Vec<GroupMember<'_>>> = BTreeMap::new();
    for (name, position) in chart.planet_positions.iter() {
        let longitude = match Longitude::try_new(position.longitude) {
            Ok(lon) => lon,
            Err(_err) => {
                warn!(body = name, error = %_err, "skipping body with invalid longitude");
                continue;
            }
        };
        let bucket = longitude.band_start() as u16;
        buckets
            .entry(bucket)
            .or_default()
            .push(GroupMember { name, longitude });
    }

    buckets
        .into_iter()
        .map(|(bucket, mut members)| {
            members.sort_by(|a, b| a.longitude.degrees().total_cmp(&b.longitude.degrees()));
            PositionGroup { bucket, members }
        })
        .collect()
}

/// Fan-out distance of the `index`-th of `total` bodies in a group.
///
/// Spacing compresses as the group grows; very large groups lose spacing
/// accuracy but never fail.
pub fn label_offset(index: usize, total: usize) -> f64 {
    let index = index as f64;
    match total {
        0 | 1 => 25.0,
        2 => index * 60.0 - 20.0,
        n => index * (60.0 - 5.0 * n as f64) - 50.0,
    }
}

/// Where one body and its labels go.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlacement<'a> {
    pub name: &'a str,
    pub longitude: Longitude,
    pub index: usize,
    pub group_size: usize,
    pub offset: f64,
    /// Exact-longitude point on the body ring.
    pub base: DVec2,
    /// Marker position after the fan-out offset.
    pub marker: DVec2,
    pub anchor: Anchor,
}

impl BodyPlacement<'_> {
    pub fn has_connector(&self) -> bool {
        self.offset != 0.0
    }

    pub fn shows_details(&self) -> bool {
        self.group_size < DETAIL_LIMIT
    }
}

/// Pure layout of every body, in draw order.
pub fn layout_bodies<'a>(chart: &'a ChartData, g: &ChartGeometry) -> Vec<BodyPlacement<'a>> {
    let radius = g.body_radius();
    let mut placements = Vec::with_capacity(chart.planet_positions.len());
    for group in group_bodies(chart) {
        let total = group.members.len();
        for (index, member) in group.members.into_iter().enumerate() {
            let offset = label_offset(index, total);
            let base = g.point(radius, member.longitude);
            let marker = base + offset_direction(member.longitude) * (offset * g.scale);
            // labels on the left half read right-to-left so they never point inward
            let anchor = if member.longitude.on_left_half() {
                Anchor::End
            } else {
                Anchor::Start
            };
            placements.push(BodyPlacement {
                name: member.name,
                longitude: member.longitude,
                index,
                group_size: total,
                offset,
                base,
                marker,
                anchor,
            });
        }
    }
    placements
}

/// `+1.23` for positive values, `-1.23` for negative, `0.00` for zero.
fn signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{value:.decimals$}")
    } else {
        format!("{value:.decimals$}")
    }
}

impl Layer for BodyLayer {
    fn name(&self) -> &'static str {
        "bodies"
    }

    fn draw(&self, ctx: &LayerContext<'_>, surface: &mut dyn Surface) {
        for placement in layout_bodies(ctx.chart, ctx.geometry) {
            trace!(
                body = placement.name,
                index = placement.index,
                group = placement.group_size,
                offset = placement.offset,
                "placing body"
            );
            draw_body(ctx.chart, ctx.geometry, &placement, surface);
        }
    }
}

fn draw_body(chart: &ChartData, g: &ChartGeometry, p: &BodyPlacement<'_>, surface: &mut dyn Surface) {
    let s = g.scale;
    let at = p.marker;

    if p.has_connector() {
        surface.draw(DrawCommand::line(p.base, at, Stroke::new(defaults::CONNECTOR, 0.5)));
    }

    surface.draw(DrawCommand::Circle {
        center: at,
        radius: defaults::MARKER_RADIUS * s,
        fill: Some(Paint::Radial {
            center: at,
            inner_radius: 0.0,
            outer_radius: defaults::MARKER_RADIUS * s,
            start: Rgba::WHITE,
            end: defaults::MUTED_TEXT,
        }),
        stroke: Some(Stroke::new(defaults::LABEL_TEXT, 1.0)),
    });

    let shadow = Shadow {
        color: defaults::SHADOW,
        blur: 2.0,
        offset: DVec2::ONE,
    };
    let text = |size: f64, color: Rgba| {
        TextStyle::new(size * s, color)
            .anchored(p.anchor)
            .with_shadow(shadow)
    };
    let (side, lead) = match p.anchor {
        Anchor::End => (-1.0, -10.0 * s),
        _ => (1.0, 10.0 * s),
    };
    let x = at.x + lead;

    surface.draw(DrawCommand::text(
        dvec2(x, at.y),
        glyph_for(p.name),
        text(20.0, Rgba::BLACK).bold(),
    ));
    surface.draw(DrawCommand::text(
        dvec2(x, at.y + 20.0 * s),
        p.longitude.degree_minute().to_string(),
        text(12.0, defaults::MUTED_TEXT),
    ));

    let speed = chart.speed_of(p.name);
    if speed.is_some_and(|v| v < 0.0) {
        surface.draw(DrawCommand::text(
            dvec2(x + side * 15.0 * s, at.y - 8.0 * s),
            "℞",
            text(14.0, defaults::RETROGRADE),
        ));
    }

    let latitude = chart.position(p.name).map_or(0.0, |pos| pos.latitude);
    if p.shows_details() && latitude != 0.0 {
        let speed = speed.unwrap_or(0.0);
        surface.draw(DrawCommand::text(
            dvec2(x, at.y + 32.0 * s),
            format!("{}°", signed(latitude, 2)),
            text(10.0, defaults::FAINT_TEXT),
        ));
        let color = if speed < 0.0 {
            defaults::RETROGRADE
        } else {
            defaults::LABEL_TEXT
        };
        surface.draw(DrawCommand::text(
            dvec2(x, at.y + 44.0 * s),
            format!("{}°/d", signed(speed, 3)),
            text(11.0, color),
        ));
    }

    let sign = ZodiacSign::of(p.longitude);
    if dignity(p.name, sign) != Dignity::None {
        surface.draw(DrawCommand::stroked_circle(
            at,
            defaults::DIGNITY_RING_RADIUS * s,
            Stroke::new(sign.element().color(), 2.0),
        ));
    }
}
