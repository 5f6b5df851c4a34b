//! Cell reference extraction (formula dependencies).
//!
//! A reference token is one or more ASCII letters immediately followed by
//! one or more ASCII digits, bounded by word boundaries (`A1`, `b2`,
//! `AA10`). Tokens are normalized to uppercase. `A1B2` and `A1_` are not
//! references because the boundary check fails.

use regex::{Match, Regex};
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// One reference occurrence inside formula text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefToken {
    /// Byte range of the token in the scanned text.
    pub span: Range<usize>,
    /// Uppercased token text, e.g. `"B3"`.
    pub name: String,
    /// The referenced cell, or `None` when the token names no cell
    /// (row `0`, or a column too wide to index).
    pub cell: Option<CellRef>,
}

impl RefToken {
    fn from_match(m: Match<'_>) -> RefToken {
        let name = m.as_str().to_ascii_uppercase();
        RefToken {
            span: m.range(),
            cell: CellRef::from_str(&name),
            name,
        }
    }
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z]+[0-9]+\b").expect("cell reference regex must compile")
    })
}

/// Lazily scan `text` for reference tokens, left to right, keeping duplicates.
///
/// The leading `=` of a formula may be present or not.
pub fn references(text: &str) -> impl Iterator<Item = RefToken> + '_ {
    cell_ref_re().find_iter(text).map(RefToken::from_match)
}

/// The distinct cells referenced by `text`.
pub fn referenced_cells(text: &str) -> BTreeSet<CellRef> {
    references(text).filter_map(|token| token.cell).collect()
}
