// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::collections::BTreeMap;

use crate::util::strip_comment;

/// Tool numbers selected by T words, keyed by 1-based program line.
///
/// Built from the raw program text, so that T words inside comments can be
/// told apart and line numbers match what the controller reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolMap {
    tools: BTreeMap<usize, u16>,
}

impl ToolMap {
    /// Scans program text for tool selections outside of comments.
    ///
    /// Lines are separated by LF only, like the controller counts them.
    /// If a line selects several tools, the last one wins.
    pub fn extract(text: &str) -> Self {
        let tools = text.split('\n').enumerate()
            .filter_map(|(n, line)| last_tool(strip_comment(line)).map(|tool| (n + 1, tool)))
            .collect();
        ToolMap { tools }
    }

    /// The tool selected on exactly this line.
    pub fn get(&self, line: usize) -> Option<u16> {
        self.tools.get(&line).copied()
    }

    /// The most recent tool selected at or before `line`.
    ///
    /// This is what a tool change (M6) executing on `line` will load.
    pub fn tool_at(&self, line: usize) -> Option<u16> {
        self.tools.range(..=line).next_back().map(|(_, &tool)| tool)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterates over (line, tool) pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        self.tools.iter().map(|(&line, &tool)| (line, tool))
    }
}

/// Finds the last `T<digits>` token in comment-free text.
fn last_tool(text: &str) -> Option<u16> {
    let bytes = text.as_bytes();
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].eq_ignore_ascii_case(&b't') {
            let digits = bytes[i + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 {
                if let Ok(tool) = text[i + 1..i + 1 + digits].parse() {
                    found = Some(tool);
                }
                i += digits;
            }
        }
        i += 1;
    }
    found
}
