//! Per-line syntactic classification.
//!
//! The classifier runs one left-to-right pass over the current physical line
//! with early termination. It is re-run on every line change and never
//! cached across line transitions.

use crate::store::LineFile;

/// Syntactic category of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Blank line, or a line with no decisive character.
    Empty,
    /// Target rule head (`name...: prereq...`).
    Target,
    /// Tab-led recipe line.
    Recipe,
    /// Variable assignment line.
    Variable,
    /// Directive line. Declared surface: the scan below never yields it,
    /// but the parser still skips it defensively.
    Directive,
    /// `#` comment line.
    Comment,
    /// Tab-led line containing `=`; resolution is deferred to the parser.
    AmbiguousTabOrVariable,
}

/// Classification result with the line's source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Line category.
    pub kind: LineKind,
    /// 1-based line number.
    pub line: u64,
    /// Absolute byte position of the line start.
    pub start: u64,
    /// Line length in bytes, excluding the trailing newline.
    pub len: u64,
}

impl Default for LineInfo {
    fn default() -> Self {
        Self {
            kind: LineKind::Empty,
            line: 1,
            start: 0,
            len: 0,
        }
    }
}

/// Classifies the line under the store's cursor.
pub(crate) fn classify(store: &LineFile) -> LineInfo {
    let column = store.column_offset();
    let start = store.position() - column;
    let len = (column + store.line_byte_length()).saturating_sub(1);

    let mut info = LineInfo {
        kind: LineKind::Empty,
        line: store.line_number(),
        start,
        len,
    };

    let bytes = store.read_at(start, len);
    let mut only_blanks = true;
    let mut leading_tab = false;

    for (index, &byte) in bytes.iter().enumerate() {
        if index == 0 {
            match byte {
                b'#' => {
                    info.kind = LineKind::Comment;
                    return info;
                }
                b'\t' => {
                    leading_tab = true;
                    info.kind = LineKind::Recipe;
                }
                _ => {}
            }
        }

        if byte != b' ' && byte != b'\t' && byte != b'#' {
            only_blanks = false;
        }

        if byte == b'=' {
            info.kind = if leading_tab {
                LineKind::AmbiguousTabOrVariable
            } else {
                LineKind::Variable
            };
            return info;
        }

        if byte == b'#' {
            if only_blanks {
                info.kind = LineKind::Comment;
            }
            return info;
        }

        if byte == b':' && !leading_tab && bytes.get(index + 1) != Some(&b'=') {
            info.kind = LineKind::Target;
            return info;
        }
    }

    if only_blanks {
        info.kind = LineKind::Empty;
    }
    info
}
