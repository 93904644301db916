// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Resolution of G2/G3 arcs into point sequences.
//!
//! All math happens in plane-local coordinates: the arc plane's abscissa and
//! ordinate in x and y, and the helix axis in z.  Points are generated
//! counter-clockwise around the center, starting one radius along the
//! negative abscissa and advancing by increasing angle; arcs running the
//! other way have their endpoints swapped first and the result reversed.

use std::f64::consts::PI;

use super::config::{ArcTolerance, Config};
use super::curve::CatmullRom;
use super::enums::*;
use crate::ast::Plane;
use crate::error::ErrType;

type Point2 = nalgebra::Point2<f64>;
type Vec2 = nalgebra::Vector2<f64>;

const EPSILON: f64 = 1e-9;

/// Side of the start-to-end chord a circle center lies on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Picks the side giving an arc of less than 180 degrees for a positive
    /// radius, and the reflex arc for a negative one.
    pub fn for_radius(radius: f64, counter_clockwise: bool) -> Side {
        let minor = if counter_clockwise { Side::Left } else { Side::Right };
        if radius >= 0. { minor } else { minor.other() }
    }
}

/// The two centers of circles with a given radius through two points.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CenterCandidates {
    pub left: Point2,
    pub right: Point2,
}

impl CenterCandidates {
    /// Intersects the circles of radius `radius` around `start` and `end`.
    ///
    /// A radius slightly shorter than half the chord (within `tolerance`) is
    /// stretched so both candidates meet at the chord's midpoint.
    pub fn solve(start: Point2, end: Point2, radius: f64, tolerance: &ArcTolerance)
                 -> Result<Self, ErrType> {
        let chord: Vec2 = end - start;
        let length = chord.norm();
        if length < EPSILON {
            return Err(ErrType::DegenerateArc);
        }
        let radius = radius.abs();
        let half = length / 2.;
        if half > radius && !tolerance.accepts(radius, half - radius) {
            return Err(ErrType::RadiusTooSmall { radius, chord: length });
        }
        let mid = start + chord / 2.;
        let rise = (radius * radius - half * half).max(0.).sqrt();
        let normal = Vec2::new(-chord.y, chord.x) / length;
        Ok(CenterCandidates {
            left: mid + normal * rise,
            right: mid - normal * rise,
        })
    }

    pub fn pick(&self, side: Side) -> Point2 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// An arc resolved to a center and an angular sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedArc {
    pub plane: Plane,
    pub center: Point3,
    pub radius: f64,
    /// Angle swept in radians by the first turn, in `(0, 2*pi]`.
    pub sweep: f64,
    /// Points from the true start to the true end, in program space.
    pub points: Vec<Point3>,
}

/// Resolves an arc.  `incremental` selects whether I/J/K offsets are
/// relative to the start point or absolute coordinates.
pub fn resolve(spec: &ArcSpec, incremental: bool, config: &Config) -> Result<ResolvedArc, ErrType> {
    let proj = PlaneProjection::for_plane(spec.plane)
        .ok_or(ErrType::UnsupportedPlane(spec.plane))?;
    let (center, check_radius) = match spec.center {
        HelixCenter::Offset(offset) if incremental => (spec.start + offset, true),
        HelixCenter::Offset(offset) => (Point3::from(offset), true),
        HelixCenter::Radius(radius) => (radius_center(spec, &proj, radius, config)?, false),
    };
    sweep(spec, &proj, center, check_radius, config)
}

fn radius_center(spec: &ArcSpec, proj: &PlaneProjection, radius: f64, config: &Config)
                 -> Result<Point3, ErrType> {
    if spec.start == spec.end {
        return Err(ErrType::DegenerateArc);
    }
    let start = proj.project(&spec.start);
    let end = proj.project(&spec.end);
    let candidates = CenterCandidates::solve(start.xy(), end.xy(), radius, &config.tolerance)?;
    let side = Side::for_radius(radius, !proj.needs_swap(spec.clockwise));
    let center = candidates.pick(side);
    Ok(proj.unproject(&Point3::new(center.x, center.y, start.z)))
}

fn sweep(spec: &ArcSpec, proj: &PlaneProjection, center: Point3, check_radius: bool,
         config: &Config) -> Result<ResolvedArc, ErrType> {
    let mut start = proj.project(&spec.start);
    let mut end = proj.project(&spec.end);
    let local_center = proj.project(&center);

    let radius = planar_distance(&start, &local_center);
    if radius < EPSILON {
        return Err(ErrType::ZeroRadius);
    }
    if check_radius && start.z == end.z {
        let end_radius = planar_distance(&local_center, &end);
        if !config.tolerance.accepts(radius, (end_radius - radius).abs()) {
            return Err(ErrType::RadiusMismatch { start: radius, end: end_radius });
        }
    }

    let swapped = proj.needs_swap(spec.clockwise);
    if swapped {
        std::mem::swap(&mut start, &mut end);
    }

    let reference = Point3::new(local_center.x - radius, local_center.y, start.z);
    let sign = if local_center.y > start.y { 1. } else { -1. };
    let start_angle = sign * apex_angle(planar_distance(&start, &reference), radius);

    let mut sweep = apex_angle(planar_distance(&start, &end), radius);
    if !is_right_of(&start, &local_center, &end) {
        sweep = 2. * PI - sweep;
    }

    let samples = Sampler {
        center: local_center,
        radius,
        start_angle,
        sweep,
        points_per_turn: config.points_per_turn.max(1),
    }.sample(&start, &end, spec.turns.max(1));
    let mut points = if config.smoothing {
        CatmullRom::new(&samples).points(config.curve_divisions)
    } else {
        samples
    };
    if swapped {
        points.reverse();
    }

    Ok(ResolvedArc {
        plane: spec.plane,
        center,
        radius,
        sweep,
        points: points.iter().map(|p| proj.unproject(p)).collect(),
    })
}

struct Sampler {
    center: Point3,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    points_per_turn: usize,
}

impl Sampler {
    fn on_circle(&self, angle: f64, helix: f64) -> Point3 {
        Point3::new(self.center.x - self.radius * angle.cos(),
                    self.center.y - self.radius * angle.sin(),
                    helix)
    }

    /// Samples the first turn along the sweep, then one full circle per extra
    /// turn, then the exact end point.  The helix rise is spread over all
    /// turns with the same per-sample pitch.
    fn sample(&self, start: &Point3, end: &Point3, turns: u16) -> Vec<Point3> {
        let n = self.points_per_turn;
        let pitch = (end.z - start.z) / n as f64 / turns as f64;
        let step = self.sweep / n as f64;
        let mut points = Vec::with_capacity(n * turns as usize + 1);

        let mut helix = start.z;
        for i in 0..n {
            helix = start.z + i as f64 * pitch;
            points.push(self.on_circle(self.start_angle + i as f64 * step, helix));
        }

        let full_step = 2. * PI / n as f64;
        for _ in 1..turns {
            let base = helix;
            for i in 0..n {
                helix = base + (i + 1) as f64 * pitch;
                points.push(self.on_circle(self.start_angle + self.sweep + i as f64 * full_step, helix));
            }
        }

        points.push(*end);
        points
    }
}

fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    nalgebra::distance(&a.xy(), &b.xy())
}

/// Apex angle of an isosceles triangle with legs `leg` and base `base`.
fn apex_angle(base: f64, leg: f64) -> f64 {
    (1. - base * base / (2. * leg * leg)).max(-1.).min(1.).acos()
}

/// Whether `p` lies strictly right of the directed line `from` -> `to`.
fn is_right_of(from: &Point3, to: &Point3, p: &Point3) -> bool {
    (to.x - from.x) * (p.y - from.y) - (to.y - from.y) * (p.x - from.x) < 0.
}
