// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use thiserror::Error;

use crate::ast::Plane;

/// A problem found on a single program line.
///
/// Diagnostics never stop a backplot: the offending line is skipped (or
/// partially applied) and processing continues with the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub lineno: usize,
    pub errtype: ErrType,
}

impl Diagnostic {
    pub fn new(lineno: usize, errtype: ErrType) -> Self {
        Diagnostic { lineno, errtype }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error in line {}: {}", self.lineno, self.errtype)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErrType {
    #[error("command {0} is not supported")]
    Unsupported(String),
    #[error("axis words without a command to continue")]
    MissingCommand,
    #[error("the value {1:?} of word {0} is not a number")]
    InvalidNumber(char, String),
    #[error("unexpected characters {0:?}")]
    InvalidToken(String),
    #[error("radius to end of arc differs from radius to start (r1: {start}, r2: {end})")]
    RadiusMismatch { start: f64, end: f64 },
    #[error("arc center coincides with its start point")]
    ZeroRadius,
    #[error("radius format arc needs distinct start and end points")]
    DegenerateArc,
    #[error("radius {radius} is too small for an arc spanning {chord}")]
    RadiusTooSmall { radius: f64, chord: f64 },
    #[error("arcs are not supported in the {0} plane")]
    UnsupportedPlane(Plane),
}
