// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! A G-code backplotter: turns a program into the straight and curved paths
//! the tool would follow, without driving any machine.
//!
//! Only a small command subset is understood: rapid and linear moves, arcs
//! in center or radius format (including helices and multiple turns), plane,
//! unit and distance mode selection, and tool selects.  Everything else is
//! reported and skipped.
//!
//! ## Basic usage
//!
//! ```rust
//! use ngc_backplot::backplot;
//!
//! let plot = backplot("G21 G90\nT1 M6\nG0 X0 Y0\nG2 X10 Y0 R5\n");
//! for (primitive, path) in plot.geometry.paths() {
//!     println!("line {}: {} with {} points", primitive.lineno, primitive.kind, path.len());
//! }
//! assert_eq!(plot.tools.get(2), Some(1));
//! ```
//!
//! The stages can also be run separately: `parse::parse` produces the
//! preprocessed `ast::Program`, which `eval::Interpreter` executes.

pub mod ast;
pub mod error;
pub mod eval;
pub mod parse;
pub mod tools;

// internal helpers
pub(crate) mod util;

pub use crate::error::{Diagnostic, ErrType};
pub use crate::eval::{Config, Geometry};
pub use crate::tools::ToolMap;

/// Everything derived from one program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Backplot {
    pub geometry: Geometry,
    pub tools: ToolMap,
    /// Problems from preprocessing and interpretation, by line.
    pub diagnostics: Vec<Diagnostic>,
}

/// Backplots a program with the default configuration.
pub fn backplot(text: &str) -> Backplot {
    backplot_with(text, &Config::default())
}

/// Backplots a program.
pub fn backplot_with(text: &str, config: &Config) -> Backplot {
    let program = parse::parse(text);
    let mut interp = eval::Interpreter::new(config.clone());
    interp.eval(&program);
    let (geometry, errors) = interp.finish();

    let mut diagnostics = program.diagnostics;
    diagnostics.extend(errors);
    diagnostics.sort_by_key(|d| d.lineno);

    Backplot { geometry, tools: ToolMap::extract(text), diagnostics }
}
