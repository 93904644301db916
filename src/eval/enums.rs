// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use strum_macros::{Display, EnumIter};

use crate::ast::Plane;

/// A point in program space, in millimeters.
pub type Point3 = nalgebra::Point3<f64>;

/// A 3D offset, e.g. from an arc's start to its center.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A linear axis supported by the backplotter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter)]
pub enum Axis {
    X, Y, Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which axes act as abscissa, ordinate and helix axis of an arc plane.
///
/// Projected points store (abscissa, ordinate, helix) in (x, y, z).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlaneProjection {
    pub abscissa: Axis,
    pub ordinate: Axis,
    pub helix: Axis,
    /// Mirrored planes sweep clockwise by construction.
    pub mirrored: bool,
}

impl PlaneProjection {
    /// Returns the projection for a plane, or `None` if arcs cannot be drawn
    /// in it.
    pub fn for_plane(plane: Plane) -> Option<Self> {
        let (abscissa, ordinate, helix, mirrored) = match plane {
            Plane::XY => (Axis::X, Axis::Y, Axis::Z, false),
            Plane::XZ => (Axis::X, Axis::Z, Axis::Y, true),
            Plane::YZ => (Axis::Y, Axis::Z, Axis::X, false),
            Plane::UV | Plane::UW | Plane::VW => return None,
        };
        Some(PlaneProjection { abscissa, ordinate, helix, mirrored })
    }

    pub fn project(&self, p: &Point3) -> Point3 {
        Point3::new(p[self.abscissa.index()], p[self.ordinate.index()], p[self.helix.index()])
    }

    pub fn unproject(&self, local: &Point3) -> Point3 {
        let mut p = Point3::origin();
        p[self.abscissa.index()] = local.x;
        p[self.ordinate.index()] = local.y;
        p[self.helix.index()] = local.z;
        p
    }

    /// Whether an arc in the given direction must have its endpoints swapped
    /// to be drawn with this plane's natural winding.
    pub fn needs_swap(&self, clockwise: bool) -> bool {
        clockwise != self.mirrored
    }
}

/// Center specification for a helix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HelixCenter {
    /// I/J/K words, either relative to the start or absolute.
    Offset(Vec3),
    /// Signed R word; negative selects the arc of more than 180 degrees.
    Radius(f64),
}

/// A fully resolved arc command.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcSpec {
    pub plane: Plane,
    pub start: Point3,
    pub end: Point3,
    pub center: HelixCenter,
    pub clockwise: bool,
    /// Number of turns from the P word, at least 1.
    pub turns: u16,
}
