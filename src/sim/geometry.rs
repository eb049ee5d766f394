//! Tube geometry
//!
//! A level's playfield is a tube seen end-on: a rim polygon on the view
//! plane connected to a single vanishing point at the view center. Every
//! entity lives in tube coordinates, a fractional `segment` around the rim
//! and a `radial` depth (0.0 at the center, 1.0 on the rim). `get_point`
//! maps tube coordinates onto the view plane for presentation.

use glam::Vec2;

use crate::consts::{
    OUTER_RADIUS, OUTER_RADIUS_X, OUTER_RADIUS_Y, TUNNEL_HOLE_RADIUS, VIEW_CENTER_X, VIEW_CENTER_Y,
};

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Cross-section family for a level's tube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    WideRectangle,
    Star,
    Hexagon,
    Octagon,
    Figure8,
    Bowtie,
    Plus,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::WideRectangle => "widerectangle",
            ShapeKind::Star => "star",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Figure8 => "figure8",
            ShapeKind::Bowtie => "bowtie",
            ShapeKind::Plus => "plus",
        }
    }

    /// Parse a shape name, falling back to a circle for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name {
            "circle" => ShapeKind::Circle,
            "square" => ShapeKind::Square,
            "widerectangle" => ShapeKind::WideRectangle,
            "star" => ShapeKind::Star,
            "hexagon" => ShapeKind::Hexagon,
            "octagon" => ShapeKind::Octagon,
            "figure8" => ShapeKind::Figure8,
            "bowtie" => ShapeKind::Bowtie,
            "plus" => ShapeKind::Plus,
            other => {
                log::warn!("unknown tube shape {other:?}, using circle");
                ShapeKind::Circle
            }
        }
    }
}

/// Static description of one level's tube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub segments: u32,
    pub name: &'static str,
    /// Rim rotation in radians
    pub rotation: f32,
}

/// Precomputed rim and center vertices for one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGeometry {
    pub kind: ShapeKind,
    pub segments: u32,
    pub name: &'static str,
    pub rim_points: Vec<Vec2>,
    pub center_points: Vec<Vec2>,
    /// Radius of the tunnel mouth drawn at the vanishing point
    pub tunnel_hole_radius: f32,
}

impl LevelGeometry {
    pub fn new(spec: &ShapeSpec) -> Self {
        let center = Vec2::new(VIEW_CENTER_X, VIEW_CENTER_Y);
        let mut rim_points = Vec::with_capacity(spec.segments as usize);
        let mut center_points = Vec::with_capacity(spec.segments as usize);

        for i in 0..spec.segments {
            let angle = i as f32 / spec.segments as f32 * TAU + spec.rotation;
            let offset = match spec.kind {
                // The plain tube is an ellipse, slightly wider than tall
                ShapeKind::Circle => {
                    Vec2::new(angle.cos() * OUTER_RADIUS_X, angle.sin() * OUTER_RADIUS_Y)
                }
                ShapeKind::Square => square_point(angle, OUTER_RADIUS),
                ShapeKind::WideRectangle => wide_rectangle_point(angle, OUTER_RADIUS),
                ShapeKind::Star => {
                    // Even vertices sit on the full radius, odd ones halfway in
                    let radius = if i % 2 == 0 {
                        OUTER_RADIUS
                    } else {
                        OUTER_RADIUS * 0.5
                    };
                    Vec2::new(angle.cos(), angle.sin()) * radius
                }
                ShapeKind::Hexagon => polygon_point(angle, OUTER_RADIUS, 6),
                ShapeKind::Octagon => polygon_point(angle, OUTER_RADIUS, 8),
                ShapeKind::Figure8 => figure8_point(angle, OUTER_RADIUS),
                ShapeKind::Bowtie => bowtie_point(angle, OUTER_RADIUS),
                ShapeKind::Plus => plus_point(angle, OUTER_RADIUS),
            };
            rim_points.push(center + offset);
            center_points.push(center);
        }

        Self {
            kind: spec.kind,
            segments: spec.segments,
            name: spec.name,
            rim_points,
            center_points,
            tunnel_hole_radius: TUNNEL_HOLE_RADIUS,
        }
    }

    /// Map tube coordinates onto the view plane.
    ///
    /// `segment` may be fractional and wraps past the segment count.
    /// `radial` runs from 0.0 at the vanishing point to 1.0 on the rim.
    pub fn get_point(&self, segment: f32, radial: f32) -> Vec2 {
        let n = self.segments as i64;
        let s = (segment.floor() as i64).rem_euclid(n) as usize;
        let next = (s + 1) % self.segments as usize;
        let frac = segment - segment.floor();

        let rim = self.rim_points[s].lerp(self.rim_points[next], frac);
        let center = self.center_points[s].lerp(self.center_points[next], frac);
        center.lerp(rim, radial)
    }
}

/// Point on a square rim, max-norm projection of the unit circle
fn square_point(angle: f32, radius: f32) -> Vec2 {
    let x = angle.cos();
    let y = angle.sin();
    let scale = radius / x.abs().max(y.abs());
    Vec2::new(x, y) * scale
}

/// Point on a rectangle 1.4x wider than tall
fn wide_rectangle_point(angle: f32, radius: f32) -> Vec2 {
    let x = angle.cos();
    let y = angle.sin();
    let width_scale = 1.4;
    let scale = radius / (x.abs() / width_scale).max(y.abs());
    Vec2::new(x * scale * width_scale, y * scale)
}

/// Point on a regular polygon edge, vertices every `TAU / sides`
fn polygon_point(angle: f32, radius: f32, sides: u32) -> Vec2 {
    let side_angle = TAU / sides as f32;
    let side = (angle / side_angle).floor();
    let progress = (angle % side_angle) / side_angle;

    let a1 = side * side_angle;
    let a2 = (side + 1.0) * side_angle;
    let p1 = Vec2::new(a1.cos(), a1.sin()) * radius;
    let p2 = Vec2::new(a2.cos(), a2.sin()) * radius;
    p1.lerp(p2, progress)
}

/// Lissajous figure-eight, pinched at the view center
fn figure8_point(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.sin() * radius, angle.sin() * angle.cos() * radius)
}

fn bowtie_point(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, (angle * 2.0).sin() * radius * 0.5)
}

/// Plus sign: each quarter snaps to one of two axis-aligned arm corners
fn plus_point(angle: f32, radius: f32) -> Vec2 {
    let sector = (angle / TAU * 4.0).floor();
    let local_angle = angle % FRAC_PI_2;

    let corner = if local_angle < FRAC_PI_4 {
        sector * FRAC_PI_2
    } else {
        sector * FRAC_PI_2 + FRAC_PI_2
    };
    Vec2::new(corner.cos(), corner.sin()) * radius
}
