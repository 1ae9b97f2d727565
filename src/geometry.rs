//! Polar layout: longitude to canvas point, label rotation and ring radii.
//!
//! Longitude 0 points up and grows clockwise:
//! `x = cx + r·sin θ`, `y = cy − r·cos θ`. Every ring uses this one
//! convention so a body, its house and its sign line up radially.

use std::f64::consts::FRAC_PI_2;

use glam::{DVec2, dvec2};

use crate::render::RenderOptions;
use crate::types::Longitude;

/// Outer radius the fixed pixel insets below were tuned for.
const REFERENCE_RADIUS: f64 = 360.0;

/// Point at `radius` from `center` in the direction of `lon`.
#[inline]
pub fn to_point(center: DVec2, radius: f64, lon: Longitude) -> DVec2 {
    let theta = lon.radians();
    center + dvec2(radius * theta.sin(), -radius * theta.cos())
}

/// Rotation (radians) that makes text read tangentially at `lon`.
#[inline]
pub fn label_rotation(lon: Longitude) -> f64 {
    lon.radians() + FRAC_PI_2
}

/// Rotation (radians) that keeps a glyph upright relative to the rim: its top
/// points away from the center.
#[inline]
pub fn upright_rotation(lon: Longitude) -> f64 {
    lon.radians()
}

/// Screen-space unit vector `(cos, sin)` of the label rotation.
///
/// With y pointing down this runs radially inward, so a positive offset pulls
/// a body label from the body ring toward the house ring.
#[inline]
pub fn offset_direction(lon: Longitude) -> DVec2 {
    let angle = label_rotation(lon);
    dvec2(angle.cos(), angle.sin())
}

/// Ring radii and insets for one canvas size.
///
/// All radii derive from the outer radius `min(w, h)/2 − margin`; the pixel
/// insets are scaled by `outer / 360` so changing the canvas size rescales
/// the whole wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub center: DVec2,
    pub outer_radius: f64,
    /// Multiplier applied to fixed pixel sizes (1.0 on the default canvas).
    pub scale: f64,
    pub body_ring_radius: f64,
    pub body_ring_width: f64,
    pub house_ring_radius: f64,
    pub house_ring_width: f64,
}

impl ChartGeometry {
    pub fn new(options: &RenderOptions) -> ChartGeometry {
        let width = options.size;
        let height = options.size;
        let outer_radius = width.min(height) / 2.0 - options.margin;
        let scale = outer_radius / REFERENCE_RADIUS;
        ChartGeometry {
            width,
            height,
            center: dvec2(width / 2.0, height / 2.0),
            outer_radius,
            scale,
            body_ring_radius: outer_radius * 0.7,
            body_ring_width: 20.0 * scale,
            house_ring_radius: outer_radius * 0.45,
            house_ring_width: 25.0 * scale,
        }
    }

    /// Point on a ring of the given radius.
    #[inline]
    pub fn point(&self, radius: f64, lon: Longitude) -> DVec2 {
        to_point(self.center, radius, lon)
    }

    /// Radii of the three thin decorative circles inside the outer boundary.
    pub fn decorative_radii(&self) -> [f64; 3] {
        [0.8, 0.6, 0.4].map(|k| self.outer_radius * k)
    }

    pub fn sign_glyph_radius(&self) -> f64 {
        self.outer_radius - 45.0 * self.scale
    }

    pub fn degree_label_radius(&self) -> f64 {
        self.outer_radius - 25.0 * self.scale
    }

    pub fn ruler_radius(&self) -> f64 {
        self.outer_radius - 65.0 * self.scale
    }

    pub fn house_ring_inner(&self) -> f64 {
        self.house_ring_radius - self.house_ring_width
    }

    /// Exact-longitude radius of body markers: the middle of the body band.
    pub fn body_radius(&self) -> f64 {
        self.body_ring_radius - self.body_ring_width / 2.0
    }

    /// Endpoint radius of aspect lines, just inside the house ring contour.
    pub fn aspect_radius(&self) -> f64 {
        (self.outer_radius * 0.47 - self.house_ring_width * 1.7) * 0.9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn zero_points_up_and_grows_clockwise() {
        let c = dvec2(400.0, 400.0);
        assert!(close(to_point(c, 100.0, Longitude::new(0.0)), dvec2(400.0, 300.0)));
        assert!(close(to_point(c, 100.0, Longitude::new(90.0)), dvec2(500.0, 400.0)));
        assert!(close(to_point(c, 100.0, Longitude::new(180.0)), dvec2(400.0, 500.0)));
        assert!(close(to_point(c, 100.0, Longitude::new(270.0)), dvec2(300.0, 400.0)));
    }

    #[test]
    fn offset_direction_points_inward() {
        let c = dvec2(0.0, 0.0);
        for lon in [0.0, 45.0, 133.0, 270.0] {
            let lon = Longitude::new(lon);
            let outward = to_point(c, 1.0, lon);
            assert!(close(offset_direction(lon), -outward));
        }
    }

    #[test]
    fn default_canvas_radii() {
        let g = ChartGeometry::new(&RenderOptions::default());
        assert_eq!(g.outer_radius, 360.0);
        assert_eq!(g.scale, 1.0);
        assert_eq!(g.center, dvec2(400.0, 400.0));
        assert!((g.body_radius() - 242.0).abs() < 1e-9);
        assert!((g.house_ring_radius - 162.0).abs() < 1e-9);
        assert!((g.house_ring_inner() - 137.0).abs() < 1e-9);
        assert!((g.aspect_radius() - (360.0 * 0.47 - 42.5) * 0.9).abs() < 1e-9);
    }

    #[test]
    fn rings_scale_with_canvas() {
        let small = ChartGeometry::new(&RenderOptions {
            size: 400.0,
            margin: 20.0,
            ..RenderOptions::default()
        });
        let big = ChartGeometry::new(&RenderOptions::default());
        assert!((small.outer_radius * 2.0 - big.outer_radius).abs() < 1e-9);
        assert!((small.house_ring_inner() * 2.0 - big.house_ring_inner()).abs() < 1e-9);
        assert!((small.aspect_radius() * 2.0 - big.aspect_radius()).abs() < 1e-9);
    }
}
