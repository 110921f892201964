//! Cloze markup parser.
//!
//! A cloze passage is plain text in which each `<u>…</u>` span marks a blank;
//! the span's inner text is that blank's canonical answer. Everything else
//! is literal. The editor preview, the fill-in view, the word bank and the
//! validator all go through [`parse`], so they always agree on where the
//! blanks are.

use serde::{Deserialize, Serialize};

/// Marker opening a blank.
pub const OPEN_MARKER: &str = "<u>";
/// Marker closing a blank.
pub const CLOSE_MARKER: &str = "</u>";

/// One piece of a parsed cloze passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Text shown as-is.
    Literal(String),
    /// A blank, numbered from 0 in reading order.
    Blank { index: usize, answer: String },
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    pub fn blank(index: usize, answer: impl Into<String>) -> Self {
        Segment::Blank {
            index,
            answer: answer.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Segment::Blank { .. })
    }

    /// The canonical answer, if this is a blank.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Segment::Blank { answer, .. } => Some(answer),
            Segment::Literal(_) => None,
        }
    }
}

/// Split a passage into literal text and blanks.
///
/// A blank runs from an open marker to the nearest close marker, and its
/// answer is the exact text in between (possibly empty). A span may not
/// cross a line break. Markup that does not form a span (an open marker with
/// no close on the same line, a stray close marker) stays in the literal
/// text. Consecutive literal text is merged and empty literals are dropped.
pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut index = 0;
    let mut rest = text;

    while let Some(start) = rest.find(OPEN_MARKER) {
        let after_open = &rest[start + OPEN_MARKER.len()..];
        match span_body(after_open) {
            Some(answer) => {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::blank(index, answer));
                index += 1;
                rest = &after_open[answer.len() + CLOSE_MARKER.len()..];
            }
            None => {
                literal.push_str(&rest[..start + OPEN_MARKER.len()]);
                rest = after_open;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Inner text of a span whose open marker has just been consumed.
fn span_body(after_open: &str) -> Option<&str> {
    let end = after_open.find(CLOSE_MARKER)?;
    let body = &after_open[..end];
    if body.contains(is_line_break) {
        None
    } else {
        Some(body)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Canonical answers of every blank, in blank order.
pub fn extract_answers(text: &str) -> Vec<String> {
    parse(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Blank { answer, .. } => Some(answer),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Number of blanks in a passage.
pub fn blank_count(text: &str) -> usize {
    parse(text).iter().filter(|s| s.is_blank()).count()
}

/// Number of markers left in literal text because they did not form a span.
pub fn stray_markers(text: &str) -> usize {
    parse(text)
        .iter()
        .map(|segment| match segment {
            Segment::Literal(t) => t.matches(OPEN_MARKER).count() + t.matches(CLOSE_MARKER).count(),
            Segment::Blank { .. } => 0,
        })
        .sum()
}
