// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Centripetal Catmull-Rom interpolation used to smooth sampled arcs.

use super::enums::{Point3, Vec3};

/// Knot spacing exponent applied to squared distances (centripetal).
const ALPHA: f64 = 0.25;

/// Open centripetal Catmull-Rom spline through a list of points.
pub struct CatmullRom<'a> {
    points: &'a [Point3],
}

impl<'a> CatmullRom<'a> {
    pub fn new(points: &'a [Point3]) -> Self {
        CatmullRom { points }
    }

    /// Evaluates the curve at `t` in `[0, 1]`, uniform over control points.
    ///
    /// A single control point is returned as is; without any, the origin.
    pub fn point(&self, t: f64) -> Point3 {
        let pts = self.points;
        let l = pts.len();
        if l < 2 {
            return pts.first().copied().unwrap_or_else(Point3::origin);
        }
        let p = (l - 1) as f64 * t;
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f64;
        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.;
        }

        // phantom points mirror the neighbour at the open ends
        let p0 = if int_point > 0 {
            pts[int_point - 1]
        } else {
            pts[0] + (pts[0] - pts[1])
        };
        let p1 = pts[int_point];
        let p2 = pts[int_point + 1];
        let p3 = if int_point + 2 < l {
            pts[int_point + 2]
        } else {
            pts[l - 1] + (pts[l - 1] - pts[l - 2])
        };

        let mut dt0 = (p1 - p0).norm_squared().powf(ALPHA);
        let mut dt1 = (p2 - p1).norm_squared().powf(ALPHA);
        let mut dt2 = (p3 - p2).norm_squared().powf(ALPHA);
        if dt1 < 1e-4 { dt1 = 1.0; }
        if dt0 < 1e-4 { dt0 = dt1; }
        if dt2 < 1e-4 { dt2 = dt1; }

        let t1: Vec3 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2: Vec3 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        let c0 = p1.coords;
        let c2 = (p2.coords - p1.coords) * 3. - t1 * 2. - t2;
        let c3 = (p1.coords - p2.coords) * 2. + t1 + t2;
        let w2 = weight * weight;
        Point3::from(c0 + t1 * weight + c2 * w2 + c3 * w2 * weight)
    }

    /// Samples the curve at `divisions + 1` evenly spaced parameters.
    ///
    /// Fewer than two control points cannot form a curve and are returned
    /// unchanged.
    pub fn points(&self, divisions: usize) -> Vec<Point3> {
        if self.points.len() < 2 || divisions == 0 {
            return self.points.to_vec();
        }
        (0..=divisions).map(|d| self.point(d as f64 / divisions as f64)).collect()
    }
}
