// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The preprocessor: turns program text into one block per command.
//!
//! Comments and leading line numbers are dropped, compound lines are split
//! before every G, M and T word, and lines consisting only of axis words
//! repeat the last motion command.

use itertools::Itertools;
use log::warn;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::{Diagnostic, ErrType};
use crate::util::{split_lines, strip_comment};

#[derive(Parser)]
#[grammar = "backplot.pest"]
pub struct LineParser;

/// Letters starting a line that make it continue the previous command.
const CONTINUATION_LETTERS: &[char] = &['X', 'Y', 'Z', 'R', 'F'];

/// Letters that always start a new command.
const COMMAND_LETTERS: &[char] = &['G', 'M', 'T'];

struct Word<'i> {
    letter: char,
    value: &'i str,
}

#[derive(Default)]
struct Preprocessor {
    program: Program,
    // (word, command) of the last motion command seen
    last_motion: Option<(String, Command)>,
    // (word, command) of the previous block, used before any motion
    last_command: Option<(String, Command)>,
}

impl Preprocessor {
    fn report(&mut self, lineno: usize, errtype: ErrType) {
        warn!("line {}: {}", lineno, errtype);
        self.program.diagnostics.push(Diagnostic::new(lineno, errtype));
    }

    fn tokenize<'i>(&mut self, lineno: usize, text: &'i str) -> Vec<Word<'i>> {
        let pairs = match LineParser::parse(Rule::line, text) {
            Ok(pairs) => pairs,
            Err(e) => {
                self.report(lineno, ErrType::InvalidToken(e.to_string()));
                return vec![];
            }
        };
        let mut words = vec![];
        for pair in pairs.flat_map(|line| line.into_inner()) {
            match pair.as_rule() {
                Rule::word => {
                    let (letter, value) = pair.into_inner().collect_tuple().expect("children");
                    if let Some(letter) = letter.as_str().chars().next() {
                        words.push(Word { letter: letter.to_ascii_uppercase(), value: value.as_str() });
                    }
                }
                Rule::junk => self.report(lineno, ErrType::InvalidToken(pair.as_str().into())),
                _ => (),
            }
        }
        words
    }

    fn process_line(&mut self, lineno: usize, text: &str) {
        let text = strip_comment(text);
        if text.trim().is_empty() {
            return;
        }

        let mut groups: Vec<Vec<Word>> = vec![];
        let words = self.tokenize(lineno, text);
        for word in words.into_iter().skip_while(|w| w.letter == 'N') {
            match groups.last_mut() {
                Some(group) if !COMMAND_LETTERS.contains(&word.letter) => group.push(word),
                _ => groups.push(vec![word]),
            }
        }

        for group in groups {
            self.make_block(lineno, group);
        }
    }

    fn make_block(&mut self, lineno: usize, words: Vec<Word>) {
        let first = &words[0];
        let (word, command, implicit, arg_words) = if CONTINUATION_LETTERS.contains(&first.letter) {
            match self.last_motion.as_ref().or_else(|| self.last_command.as_ref()) {
                Some((word, command)) => (word.clone(), command.clone(), true, &words[..]),
                None => return self.report(lineno, ErrType::MissingCommand),
            }
        } else {
            let (word, command) = match parse_number(first.value) {
                Some(value) => (format!("{}{}", first.letter, value),
                                Command::from_word(first.letter, value)),
                None => {
                    let raw = format!("{}{}", first.letter, first.value);
                    (raw.clone(), Command::Unsupported(raw))
                }
            };
            (word, command, false, &words[1..])
        };

        let mut args = Args::new();
        for arg in arg_words {
            match parse_number(arg.value) {
                Some(value) => args.insert(arg.letter, value),
                None => self.report(lineno, ErrType::InvalidNumber(arg.letter, arg.value.into())),
            }
        }

        if command.is_motion() {
            self.last_motion = Some((word.clone(), command.clone()));
        }
        self.last_command = Some((word.clone(), command.clone()));
        self.program.blocks.push(Block { lineno, word, command, args, implicit });
    }
}

/// Parses a word value; malformed or non-finite numbers count as unset.
fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Preprocesses program text into a sequence of command blocks.
///
/// This never fails; malformed input is reported in `Program::diagnostics`.
pub fn parse(input: &str) -> Program {
    let mut pre = Preprocessor::default();
    for (n, line) in split_lines(input).enumerate() {
        pre.process_line(n + 1, line);
    }
    pre.program
}
