// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

mod arc;
mod config;
mod curve;
mod emit;
mod enums;

use log::{debug, info, warn};

use crate::ast::*;
use crate::error::{Diagnostic, ErrType};

pub use self::arc::{resolve as resolve_arc, CenterCandidates, ResolvedArc, Side};
pub use self::config::*;
pub use self::curve::CatmullRom;
pub use self::emit::*;
pub use self::enums::*;

/// The modal state of the simulated machine.
///
/// Positions are in millimeters; `scale` converts program units.
#[derive(Clone, Debug, PartialEq)]
pub struct MachineState {
    pub position: Point3,
    pub extrusion: f64,
    pub feed: f64,
    pub scale: f64,
    pub relative: bool,
    pub arc_plane: Plane,
    /// Arc center offsets are relative to the start point.
    pub arc_mode_inc: bool,
    /// Last tool selected with a T word.
    pub tool: Option<u16>,
}

impl Default for MachineState {
    fn default() -> Self {
        MachineState {
            position: Point3::origin(),
            extrusion: 0.,
            feed: 0.,
            scale: Units::Millimeters.scale(),
            relative: false,
            arc_plane: Plane::XY,
            arc_mode_inc: true,
            tool: None,
        }
    }
}

impl MachineState {
    /// Resolves an axis word against the current value of that axis.
    ///
    /// Absent words keep the current value.  Note that in relative mode the
    /// unit scale applies to the sum of current value and word.
    pub fn axis(&self, current: f64, word: Option<f64>) -> f64 {
        match word {
            Some(w) if self.relative => self.scale * (current + w),
            Some(w) => self.scale * w,
            None => current,
        }
    }

    /// Like `axis`, but without unit conversion (feed, extrusion).
    pub fn unscaled(&self, current: f64, word: Option<f64>) -> f64 {
        match word {
            Some(w) if self.relative => current + w,
            Some(w) => w,
            None => current,
        }
    }

    /// The position targeted by the X/Y/Z words of a block.
    pub fn target(&self, args: &Args) -> Point3 {
        Point3::new(self.axis(self.position.x, args.get('x')),
                    self.axis(self.position.y, args.get('y')),
                    self.axis(self.position.z, args.get('z')))
    }
}

/// Picks the arc plane from which of three words are present: exactly the
/// first two give XY, first and third XZ, last two YZ.  Anything else keeps
/// the modal plane.
fn infer_plane(args: &Args, letters: [char; 3], modal: Plane) -> Plane {
    let [a, b, c] = letters;
    match (args.contains(a), args.contains(b), args.contains(c)) {
        (true, true, false) => Plane::XY,
        (true, false, true) => Plane::XZ,
        (false, true, true) => Plane::YZ,
        _ => modal,
    }
}

fn turns(p: Option<f64>) -> u16 {
    match p {
        Some(p) if p > 1. => p.round().min(u16::MAX as f64) as u16,
        _ => 1,
    }
}

/// The Interpreter runs preprocessed blocks against a `MachineState`,
/// collecting the backplot geometry.
///
/// Every invocation owns its state; nothing is shared between interpreters.
pub struct Interpreter {
    config: Config,
    state: MachineState,
    emitter: Emitter,
    diagnostics: Vec<Diagnostic>,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Interpreter {
            config,
            state: MachineState::default(),
            emitter: Emitter::default(),
            diagnostics: vec![],
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Executes all blocks of a program.
    pub fn eval(&mut self, program: &Program) {
        for block in &program.blocks {
            self.exec(block);
        }
    }

    /// Executes a single block.  Problems are recorded, never returned.
    pub fn exec(&mut self, block: &Block) {
        match &block.command {
            Command::LinearMove { .. } => self.linear_move(block),
            Command::ArcMove { clockwise } => self.arc_move(block, *clockwise),
            Command::PlaneSelect(plane) => {
                debug!("line {}: arc plane {}", block.lineno, plane);
                self.state.arc_plane = *plane;
            }
            Command::UnitSelect(units) => {
                debug!("line {}: units {}", block.lineno, units);
                self.state.scale = units.scale();
            }
            Command::DistanceModeSelect(mode) => {
                self.state.relative = *mode == DistanceMode::Incremental;
            }
            Command::ArcDistanceModeSelect(mode) => {
                debug!("line {}: arc distance mode {}", block.lineno, mode);
                self.state.arc_mode_inc = *mode == DistanceMode::Incremental;
            }
            Command::ToolSelect(tool) => {
                info!("tool-change preparation for tool {} at line {}", tool, block.lineno);
                self.state.tool = Some(*tool);
            }
            Command::NoOp(word) => debug!("line {}: ignoring {}", block.lineno, word),
            Command::Unsupported(word) => {
                self.report(block.lineno, ErrType::Unsupported(word.clone()));
            }
        }
    }

    /// Merges the collected geometry and hands out the diagnostics.
    pub fn finish(self) -> (Geometry, Vec<Diagnostic>) {
        (self.emitter.finish(), self.diagnostics)
    }

    fn report(&mut self, lineno: usize, errtype: ErrType) {
        warn!("line {}: {}", lineno, errtype);
        self.diagnostics.push(Diagnostic::new(lineno, errtype));
    }

    fn update_feed(&mut self, args: &Args) {
        self.state.feed = self.state.unscaled(self.state.feed, args.get('f'));
    }

    fn linear_move(&mut self, block: &Block) {
        let target = self.state.target(&block.args);
        self.state.extrusion = self.state.unscaled(self.state.extrusion, block.args.get('e'));
        self.update_feed(&block.args);
        self.emitter.add_line(block.lineno, self.state.position, target);
        self.state.position = target;
    }

    fn arc_move(&mut self, block: &Block, clockwise: bool) {
        let args = &block.args;
        let state = &self.state;
        let (center, plane) = match args.get('r') {
            Some(r) => (HelixCenter::Radius(state.scale * r),
                        infer_plane(args, ['x', 'y', 'z'], state.arc_plane)),
            None => {
                let offset = |letter| state.scale * args.get(letter).unwrap_or(0.);
                (HelixCenter::Offset(Vec3::new(offset('i'), offset('j'), offset('k'))),
                 infer_plane(args, ['i', 'j', 'k'], state.arc_plane))
            }
        };
        let spec = ArcSpec {
            plane,
            start: state.position,
            end: state.target(args),
            center,
            clockwise,
            turns: turns(args.get('p')),
        };

        match resolve_arc(&spec, state.arc_mode_inc, &self.config) {
            Ok(arc) => {
                debug!("line {}: arc in {} around {:?}, r={}, sweep={}",
                       block.lineno, arc.plane, arc.center, arc.radius, arc.sweep);
                self.emitter.add_curve(block.lineno, arc.points);
            }
            Err(e) => self.report(block.lineno, e),
        }

        // the position advances to the programmed end even for rejected arcs
        self.update_feed(args);
        self.state.position = spec.end;
    }
}
