//! Indentation detection for manifest files.
//!
//! The dominant indentation unit is the most frequent non-zero change in
//! leading whitespace between consecutive lines of the same whitespace kind.

use std::collections::HashMap;

/// Indentation unit of a file; empty for single-line (compact) files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Indent(String);

impl Indent {
    /// `width` spaces.
    #[must_use]
    pub fn spaces(width: usize) -> Self {
        Self(" ".repeat(width))
    }

    /// `width` tabs.
    #[must_use]
    pub fn tabs(width: usize) -> Self {
        Self("\t".repeat(width))
    }

    /// No indentation; output is written on one line.
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Returns the indentation unit.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for compact output.
    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Space,
    Tab,
}

/// Detects the indentation unit used by `text`.
#[must_use]
pub fn detect(text: &str) -> Indent {
    // (kind, width) -> (occurrences, first line seen)
    let mut counts: HashMap<(Kind, usize), (usize, usize)> = HashMap::new();
    let mut previous = 0usize;
    let mut previous_kind: Option<Kind> = None;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let leading: &str = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        let Some(first) = leading.chars().next() else {
            previous = 0;
            previous_kind = None;
            continue;
        };

        let kind = if first == '\t' { Kind::Tab } else { Kind::Space };
        if previous_kind != Some(kind) {
            previous = 0;
        }
        previous_kind = Some(kind);

        let width = leading.len();
        let diff = width.abs_diff(previous);
        previous = width;
        if diff == 0 {
            continue;
        }

        let entry = counts.entry((kind, diff)).or_insert((0, line_no));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(a_key, a), (b_key, b)| {
            // Most frequent wins; ties go to the unit seen first.
            a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(b_key.1.cmp(&a_key.1))
        })
        .map_or_else(Indent::compact, |((kind, width), _)| match kind {
            Kind::Space => Indent::spaces(width),
            Kind::Tab => Indent::tabs(width),
        })
}
