// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

/// Allowed difference between the start and end radius of a center format
/// arc, in millimeters.
///
/// An arc is rejected when the difference exceeds
/// `max(absolute, max(minimum, relative * radius))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcTolerance {
    pub absolute: f64,
    pub minimum: f64,
    pub relative: f64,
}

impl ArcTolerance {
    pub fn limit(&self, radius: f64) -> f64 {
        self.absolute.max(self.minimum.max(self.relative * radius))
    }

    pub fn accepts(&self, radius: f64, delta: f64) -> bool {
        delta <= self.limit(radius)
    }
}

impl Default for ArcTolerance {
    fn default() -> Self {
        ArcTolerance { absolute: 0.5, minimum: 0.005, relative: 0.001 }
    }
}

/// Settings for turning arcs into points.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Samples taken for every (partial or extra) turn of an arc.
    pub points_per_turn: usize,
    /// Subdivisions of the smoothed curve; it has one point more.
    pub curve_divisions: usize,
    /// Emit the interpolated curve instead of the raw samples.
    pub smoothing: bool,
    pub tolerance: ArcTolerance,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            points_per_turn: 30,
            curve_divisions: 100,
            smoothing: true,
            tolerance: ArcTolerance::default(),
        }
    }
}

impl Config {
    pub fn with_points_per_turn(mut self, points: usize) -> Self {
        self.points_per_turn = points.max(1);
        self
    }

    pub fn with_curve_divisions(mut self, divisions: usize) -> Self {
        self.curve_divisions = divisions;
        self
    }

    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_tolerance(mut self, tolerance: ArcTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}
