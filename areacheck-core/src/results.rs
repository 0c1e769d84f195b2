//! The results table: server-rendered rows, most recent first.
//!
//! Rows are opaque HTML. The table is the only state; whatever displays it is a
//! projection of [`ResultsTable::to_html`].

use std::collections::VecDeque;

use itertools::Itertools;

/// One `<tr>…</tr>` element exactly as the evaluator produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow(String);

impl ResultRow {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Byte offset just past the tag name if `lower[at..]` opens a `<tag` element.
fn tag_at(lower: &str, at: usize, tag: &str) -> Option<usize> {
    let end = at + tag.len();
    if !lower[at..].starts_with(tag) {
        return None;
    }
    match lower[end..].chars().next() {
        Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => Some(end),
        _ => None,
    }
}

/// Split an HTML fragment into its top-level table rows.
///
/// Text between rows is dropped; an unterminated trailing row is kept as-is.
pub fn split_rows(fragment: &str) -> Vec<ResultRow> {
    let lower = fragment.to_ascii_lowercase();
    let mut rows = Vec::new();
    let mut start = None;
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(offset) = lower[i..].find('<') {
        let at = i + offset;
        if tag_at(&lower, at, "<tr").is_some() {
            if depth == 0 {
                start = Some(at);
            }
            depth += 1;
        } else if tag_at(&lower, at, "</tr").is_some() && depth > 0 {
            depth -= 1;
            if depth == 0 {
                let close = lower[at..].find('>').map_or(lower.len(), |p| at + p + 1);
                if let Some(s) = start.take() {
                    rows.push(ResultRow(fragment[s..close].to_string()));
                }
                i = close;
                continue;
            }
        }
        i = at + 1;
    }
    if let Some(s) = start {
        rows.push(ResultRow(fragment[s..].trim_end().to_string()));
    }
    rows
}

/// The first row of a fragment, as a tbody would parse it.
pub fn first_row(fragment: &str) -> Option<ResultRow> {
    split_rows(fragment.trim()).into_iter().next()
}

/// Rows prepended by submissions, above the last history fragment as fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    added: VecDeque<ResultRow>,
    base: String,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.added.len() + split_rows(&self.base).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prepend(&mut self, row: ResultRow) {
        self.added.push_front(row);
    }

    /// Replace everything with `fragment`, kept byte for byte.
    pub fn replace(&mut self, fragment: &str) {
        self.added.clear();
        self.base = fragment.to_string();
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.base.clear();
    }

    pub fn to_html(&self) -> String {
        let mut html = self.added.iter().map(ResultRow::as_str).join("");
        html.push_str(&self.base);
        html
    }
}
