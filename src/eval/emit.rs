// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::ops::Range;
use itertools::Itertools;
use strum_macros::Display;

use super::enums::Point3;

/// A geometric primitive produced by one motion command.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Line { start: Point3, end: Point3 },
    Curve { points: Vec<Point3> },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum PrimitiveKind {
    Line,
    Curve,
}

/// A sub-path of the merged geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// Program line of the command that produced it.
    pub lineno: usize,
    pub kind: PrimitiveKind,
    /// Range of this sub-path in `Geometry::vertices`.
    pub range: Range<usize>,
}

/// Collects segments while a program is interpreted.
#[derive(Debug, Default)]
pub struct Emitter {
    segments: Vec<(usize, Segment)>,
}

impl Emitter {
    pub fn add_line(&mut self, lineno: usize, start: Point3, end: Point3) {
        self.segments.push((lineno, Segment::Line { start, end }));
    }

    pub fn add_curve(&mut self, lineno: usize, points: Vec<Point3>) {
        self.segments.push((lineno, Segment::Curve { points }));
    }

    /// Merges all collected segments into one geometry.
    pub fn finish(self) -> Geometry {
        let mut geometry = Geometry::default();
        for (lineno, segment) in self.segments {
            let begin = geometry.vertices.len();
            let kind = match segment {
                Segment::Line { start, end } => {
                    geometry.vertices.extend([start, end]);
                    PrimitiveKind::Line
                }
                Segment::Curve { points } => {
                    geometry.vertices.extend(points);
                    PrimitiveKind::Curve
                }
            };
            let range = begin..geometry.vertices.len();
            geometry.primitives.push(Primitive { lineno, kind, range });
        }
        geometry
    }
}

/// The merged backplot of a whole program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    vertices: Vec<Point3>,
    primitives: Vec<Primitive>,
}

impl Geometry {
    /// All vertices of all sub-paths, in program order.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// The vertices of one sub-path.
    pub fn path(&self, primitive: &Primitive) -> &[Point3] {
        &self.vertices[primitive.range.clone()]
    }

    /// Iterates over sub-paths together with their vertices.
    pub fn paths(&self) -> impl Iterator<Item = (&Primitive, &[Point3])> {
        self.primitives.iter().map(move |p| (p, self.path(p)))
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Axis-aligned bounding box as (min, max) corners.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Total length of all sub-paths; jumps between them are not counted.
    pub fn length(&self) -> f64 {
        self.paths()
            .map(|(_, path)| path.iter().tuple_windows()
                 .map(|(a, b)| nalgebra::distance(a, b)).sum::<f64>())
            .sum()
    }
}
