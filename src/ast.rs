// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt::{self, Display, Formatter};
use fixedbitset::FixedBitSet as BitSet;
use strum_macros::{Display, EnumIter};

use crate::error::Diagnostic;
use crate::util::num_to_int;

/// A preprocessed program: one block per command, in program order.
#[derive(Debug, Default)]
pub struct Program {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A single command with its argument words.
#[derive(Clone, Debug)]
pub struct Block {
    /// 1-based line of the source text this block came from.
    pub lineno: usize,
    /// Normalized command word, e.g. `G1` for `g01`.
    pub word: String,
    pub command: Command,
    pub args: Args,
    /// Set when the line had only axis words and repeats an earlier command.
    pub implicit: bool,
}

/// The closed set of commands the backplotter understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LinearMove { rapid: bool },             // G0, G1
    ArcMove { clockwise: bool },            // G2, G3
    PlaneSelect(Plane),                     // G17-G19, G17.1-G19.1
    UnitSelect(Units),                      // G20, G21
    DistanceModeSelect(DistanceMode),       // G90, G91
    ArcDistanceModeSelect(DistanceMode),    // G90.1, G91.1
    ToolSelect(u16),                        // T
    // Accepted without effect, e.g. G40 and G64.
    NoOp(String),
    Unsupported(String),
}

impl Command {
    /// Classifies a command word given by its (uppercase) letter and value.
    pub fn from_word(letter: char, value: f64) -> Command {
        let word = format!("{}{}", letter, value);
        match letter {
            'G' => match num_to_int(value, 1) {
                Some(0)   => Command::LinearMove { rapid: true },
                Some(10)  => Command::LinearMove { rapid: false },
                Some(20)  => Command::ArcMove { clockwise: true },
                Some(30)  => Command::ArcMove { clockwise: false },
                Some(170) => Command::PlaneSelect(Plane::XY),
                Some(180) => Command::PlaneSelect(Plane::XZ),
                Some(190) => Command::PlaneSelect(Plane::YZ),
                Some(171) => Command::PlaneSelect(Plane::UV),
                Some(181) => Command::PlaneSelect(Plane::UW),
                Some(191) => Command::PlaneSelect(Plane::VW),
                Some(200) => Command::UnitSelect(Units::Inches),
                Some(210) => Command::UnitSelect(Units::Millimeters),
                Some(400) | Some(640) => Command::NoOp(word),
                Some(900) => Command::DistanceModeSelect(DistanceMode::Absolute),
                Some(910) => Command::DistanceModeSelect(DistanceMode::Incremental),
                Some(901) => Command::ArcDistanceModeSelect(DistanceMode::Absolute),
                Some(911) => Command::ArcDistanceModeSelect(DistanceMode::Incremental),
                _ => Command::Unsupported(word),
            },
            'T' => match num_to_int(value, 0) {
                Some(n) => Command::ToolSelect(n),
                None => Command::Unsupported(word),
            },
            _ => Command::Unsupported(word),
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self, Command::LinearMove { .. } | Command::ArcMove { .. })
    }
}

/// A plane as selected by G17-G19 (and their `.1` variants).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter)]
pub enum Plane {
    XY, XZ, YZ,
    UV, UW, VW,
}

impl Default for Plane {
    fn default() -> Self { Plane::XY }
}

/// Length units as selected by G20 and G21.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Units {
    Millimeters,
    Inches,
}

impl Units {
    /// Multiplier converting program units to millimeters.
    pub fn scale(self) -> f64 {
        match self {
            Units::Millimeters => 1.0,
            Units::Inches => 25.4,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum DistanceMode {
    Absolute,
    Incremental,
}

/// Argument words of a block, keyed by lowercase letter.
///
/// A letter that was not given is unset, which is different from zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Args {
    values: [f64; 26],
    present: BitSet,
}

impl Args {
    pub fn new() -> Self {
        Args { values: [0.; 26], present: BitSet::with_capacity(26) }
    }

    fn slot(letter: char) -> Option<usize> {
        let letter = letter.to_ascii_lowercase();
        if letter.is_ascii_lowercase() {
            Some((letter as u8 - b'a') as usize)
        } else {
            None
        }
    }

    /// Sets a word, replacing an earlier one with the same letter.
    pub fn insert(&mut self, letter: char, value: f64) {
        if let Some(i) = Self::slot(letter) {
            self.values[i] = value;
            self.present.insert(i);
        }
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        Self::slot(letter).filter(|&i| self.present[i]).map(|i| self.values[i])
    }

    pub fn contains(&self, letter: char) -> bool {
        self.get(letter).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.present.ones().next().is_none()
    }

    /// Iterates over set words in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.present.ones().map(move |i| ((b'a' + i as u8) as char, self.values[i]))
    }
}

impl Default for Args {
    fn default() -> Self { Args::new() }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.word)?;
        for (letter, value) in self.args.iter() {
            write!(f, " {}{}", letter.to_ascii_uppercase(), value)?;
        }
        Ok(())
    }
}
