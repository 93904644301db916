// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

/// Helper for converting a floating number with at most `figures` decimal
/// places to an integer scaled by `10^figures`.
///
/// `G90.1` becomes 901 with one figure, `T12` becomes 12 with none.
pub fn num_to_int(inp: f64, figures: i32) -> Option<u16> {
    let v = inp * 10f64.powi(figures);
    if (v.round() - v).abs() < 0.0001 && v >= 0. && v <= 65535. {
        Some(v.round() as u16)
    } else {
        None
    }
}

/// Splits text into lines, accepting LF, CRLF and lone CR endings.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(|c| c == '\n' || c == '\r') {
            Some(pos) => {
                let skip = if text[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[pos + skip..]);
                Some(&text[..pos])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

/// Cuts a line at the first comment character, `;` or `(`.
pub fn strip_comment(line: &str) -> &str {
    match line.find(|c| c == ';' || c == '(') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
