//! Parser for .grd file format

use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::CellRef;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Raw cell text keyed by cell, in row-major order.
pub type RawCells = BTreeMap<CellRef, String>;

/// Parse a .grd file into raw cell values.
pub fn parse_grd(path: &Path) -> Result<RawCells> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string.
///
/// Each line is `CELLREF: RAW`. Blank lines and `#` comments are skipped,
/// as are cells whose raw value is empty. A later line for the same cell
/// wins.
pub fn parse_grd_content(content: &str) -> Result<RawCells> {
    let mut cells = RawCells::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((cell_ref_str, value_str)) = line.split_once(':') else {
            return Err(GridcalcError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let cell_ref = CellRef::from_str(cell_ref_str).ok_or_else(|| GridcalcError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref_str),
        })?;

        let raw = parse_raw_value(value_str.trim());
        if raw.is_empty() {
            cells.remove(&cell_ref);
        } else {
            cells.insert(cell_ref, raw);
        }
    }

    Ok(cells)
}

/// Quoted values keep their exact text; anything else is taken as is.
fn parse_raw_value(value: &str) -> String {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        return unescape_grd_text(&value[1..value.len() - 1]);
    }
    value.to_string()
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
